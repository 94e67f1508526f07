//! Account sign-up, login and token resolution.

use chrono::Utc;

use aftergame_types::error::{AccountError, RepositoryError};
use aftergame_types::identity::{AccessToken, Credentials, IssuedToken, User, UserId};

use crate::auth::IdentityResolver;
use crate::repository::account::AccountRepository;
use crate::service::credential::{PasswordHasher, TokenIssuer};

pub const MIN_PASSWORD_CHARS: usize = 8;

pub struct AccountService<R: AccountRepository, P: PasswordHasher, T: TokenIssuer> {
    repo: R,
    hasher: P,
    tokens: T,
}

impl<R: AccountRepository, P: PasswordHasher, T: TokenIssuer> AccountService<R, P, T> {
    pub fn new(repo: R, hasher: P, tokens: T) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    /// Create an account and issue its first token.
    pub async fn signup(&self, credentials: &Credentials) -> Result<IssuedToken, AccountError> {
        let email = normalize_email(&credentials.email)?;
        if credentials.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AccountError::WeakPassword {
                min: MIN_PASSWORD_CHARS,
            });
        }

        let password_hash = self.hasher.hash_password(&credentials.password)?;
        let user = User {
            id: UserId::new(),
            email,
            created_at: Utc::now(),
        };

        self.repo
            .create_user(&user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AccountError::EmailTaken,
                other => AccountError::Storage(other),
            })?;

        tracing::info!(user_id = %user.id, "account created");
        self.issue_token(user.id).await
    }

    /// Verify credentials and issue a new token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<IssuedToken, AccountError> {
        let email = normalize_email(&credentials.email)
            .map_err(|_| AccountError::InvalidCredentials)?;

        let Some(stored) = self.repo.find_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify_password(&credentials.password, &stored.password_hash)
        {
            tracing::debug!(user_id = %stored.user.id, "login with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        self.issue_token(stored.user.id).await
    }

    /// Revoke the presented token. Returns whether it existed.
    pub async fn logout(&self, token: &str) -> Result<bool, AccountError> {
        let hash = self.tokens.digest(token);
        Ok(self.repo.revoke_token(&hash).await?)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        Ok(self.repo.get_user(id).await?)
    }

    async fn issue_token(&self, user_id: UserId) -> Result<IssuedToken, AccountError> {
        let token = self.tokens.generate();
        let record = AccessToken::new(user_id.clone(), self.tokens.digest(&token));
        self.repo.store_token(&record).await?;
        Ok(IssuedToken { user_id, token })
    }
}

impl<R: AccountRepository, P: PasswordHasher, T: TokenIssuer> IdentityResolver
    for AccountService<R, P, T>
{
    async fn resolve(&self, credential: &str) -> Result<Option<UserId>, RepositoryError> {
        let hash = self.tokens.digest(credential);
        let owner = self.repo.find_token_owner(&hash).await?;
        if owner.is_some() {
            if let Err(e) = self.repo.touch_token(&hash, Utc::now()).await {
                tracing::warn!(error = %e, "failed to update token last_used_at");
            }
        }
        Ok(owner)
    }
}

/// Trim and lowercase an email address; it must contain `@` with text on
/// both sides.
pub fn normalize_email(raw: &str) -> Result<String, AccountError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AccountError::InvalidEmail),
    }
}
