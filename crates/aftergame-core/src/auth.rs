//! Bearer credential resolution.

use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;

/// Resolves an opaque bearer credential to the account it belongs to.
///
/// Implemented by `AccountService`; the relay only needs this narrow view.
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` means the credential is unknown or revoked.
    fn resolve(
        &self,
        credential: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RepositoryError>> + Send;
}

impl<T: IdentityResolver> IdentityResolver for std::sync::Arc<T> {
    fn resolve(
        &self,
        credential: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RepositoryError>> + Send {
        (**self).resolve(credential)
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts `Bearer <token>` with any casing of the scheme.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer ag_abc"), Some("ag_abc"));
        assert_eq!(bearer_token("bearer   ag_abc "), Some("ag_abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("ag_abc"), None);
    }
}
