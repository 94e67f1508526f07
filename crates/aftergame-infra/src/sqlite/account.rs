//! SQLite account and access-token repository.
//!
//! Implements `AccountRepository` from `aftergame-core`. Only token digests
//! are stored; plaintext tokens never reach the database.

use aftergame_core::repository::account::{AccountRepository, StoredCredentials};
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::{AccessToken, User, UserId};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_credentials(self) -> Result<StoredCredentials, RepositoryError> {
        Ok(StoredCredentials {
            user: User {
                id: UserId::from_uuid(parse_uuid(&self.id, "user id")?),
                email: self.email,
                created_at: parse_datetime(&self.created_at)?,
            },
            password_hash: self.password_hash,
        })
    }
}

impl SqliteAccountRepository {
    async fn fetch_user(
        &self,
        sql: &str,
        key: String,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row = sqlx::query(sql)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_credentials()?))
            }
            None => Ok(None),
        }
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create_user(&self, user: &User, password_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(password_hash)
        .bind(format_datetime(&user.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let found = self
            .fetch_user("SELECT * FROM users WHERE id = ?", id.to_string())
            .await?;
        Ok(found.map(|c| c.user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredCredentials>, RepositoryError> {
        self.fetch_user("SELECT * FROM users WHERE email = ?", email.to_string())
            .await
    }

    async fn store_token(&self, token: &AccessToken) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO access_tokens (id, user_id, token_hash, created_at, last_used_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(token.id.to_string())
        .bind(token.user_id.to_string())
        .bind(&token.token_hash)
        .bind(format_datetime(&token.created_at))
        .bind(token.last_used_at.as_ref().map(format_datetime))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_token_owner(&self, token_hash: &str) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query("SELECT user_id FROM access_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_id: String = row
                    .try_get("user_id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(UserId::from_uuid(parse_uuid(&user_id, "user id")?)))
            }
            None => Ok(None),
        }
    }

    async fn touch_token(&self, token_hash: &str, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE access_tokens SET last_used_at = ? WHERE token_hash = ?")
            .bind(format_datetime(&at))
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn revoke_token(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
