//! SQLite profile repository. One row per user, keyed by the user id.

use aftergame_core::repository::profile::ProfileRepository;
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;
use aftergame_types::profile::Profile;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_date, parse_datetime, parse_uuid};

pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ProfileRow {
    id: String,
    email: String,
    full_name: String,
    former_sport: String,
    career_end_reason: String,
    career_end_date: String,
    created_at: String,
}

impl ProfileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            former_sport: row.try_get("former_sport")?,
            career_end_reason: row.try_get("career_end_reason")?,
            career_end_date: row.try_get("career_end_date")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_profile(self) -> Result<Profile, RepositoryError> {
        Ok(Profile {
            id: UserId::from_uuid(parse_uuid(&self.id, "profile id")?),
            email: self.email,
            full_name: self.full_name,
            former_sport: self.former_sport,
            career_end_reason: self.career_end_reason,
            career_end_date: parse_date(&self.career_end_date)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO profiles (id, email, full_name, former_sport, career_end_reason, career_end_date, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(profile.id.to_string())
        .bind(&profile.email)
        .bind(&profile.full_name)
        .bind(&profile.former_sport)
        .bind(&profile.career_end_reason)
        .bind(profile.career_end_date.format("%Y-%m-%d").to_string())
        .bind(format_datetime(&profile.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let profile_row =
                    ProfileRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(profile_row.into_profile()?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, profile: &Profile) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE profiles
               SET full_name = ?, former_sport = ?, career_end_reason = ?, career_end_date = ?
               WHERE id = ?"#,
        )
        .bind(&profile.full_name)
        .bind(&profile.former_sport)
        .bind(&profile.career_end_reason)
        .bind(profile.career_end_date.format("%Y-%m-%d").to_string())
        .bind(profile.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
