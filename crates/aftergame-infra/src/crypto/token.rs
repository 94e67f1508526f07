//! Bearer tokens: `ag_` followed by 64 hex chars of OS randomness.
//!
//! Only the lowercase hex SHA-256 digest of a token is ever stored.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};

use aftergame_core::service::credential::TokenIssuer;
use aftergame_types::identity::TOKEN_PREFIX;

const TOKEN_BYTES: usize = 32;

#[derive(Default)]
pub struct Sha256TokenIssuer;

impl Sha256TokenIssuer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenIssuer for Sha256TokenIssuer {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        format!("{TOKEN_PREFIX}{hex}")
    }

    fn digest(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = Sha256TokenIssuer::new().generate();
        assert!(token.starts_with("ag_"));
        let hex = &token[3..];
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let issuer = Sha256TokenIssuer::new();
        assert_ne!(issuer.generate(), issuer.generate());
    }

    #[test]
    fn test_digest_known_value() {
        let issuer = Sha256TokenIssuer::new();
        assert_eq!(
            issuer.digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(issuer.digest("ag_abc"), issuer.digest("ag_abc"));
        assert_ne!(issuer.digest("ag_abc"), issuer.digest("ag_abd"));
    }
}
