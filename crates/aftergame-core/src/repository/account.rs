//! AccountRepository trait definition.

use chrono::{DateTime, Utc};

use aftergame_types::error::RepositoryError;
use aftergame_types::identity::{AccessToken, User, UserId};

/// A user together with the stored password hash, for login only.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Persistence for accounts and their access tokens.
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Duplicate emails yield `RepositoryError::Conflict`.
    fn create_user(
        &self,
        user: &User,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_user(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up an account by its normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredCredentials>, RepositoryError>> + Send;

    fn store_token(
        &self,
        token: &AccessToken,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Owner of the token with this digest, if it exists.
    fn find_token_owner(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserId>, RepositoryError>> + Send;

    fn touch_token(
        &self,
        token_hash: &str,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete the token. Returns whether a row was removed.
    fn revoke_token(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
