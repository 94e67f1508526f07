//! SQLite career exploration repository.

use aftergame_core::repository::career::CareerRepository;
use aftergame_types::career::{CareerExploration, ExplorationStatus};
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

pub struct SqliteCareerRepository {
    pool: DatabasePool,
}

impl SqliteCareerRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ExplorationRow {
    id: String,
    user_id: String,
    career_field: String,
    interest_level: Option<i64>,
    notes: Option<String>,
    status: Option<String>,
    created_at: String,
}

impl ExplorationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            career_field: row.try_get("career_field")?,
            interest_level: row.try_get("interest_level")?,
            notes: row.try_get("notes")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_exploration(self) -> Result<CareerExploration, RepositoryError> {
        let interest_level = self
            .interest_level
            .map(|v| {
                u8::try_from(v)
                    .map_err(|_| RepositoryError::Query(format!("invalid interest_level: {v}")))
            })
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(|s| s.parse::<ExplorationStatus>().map_err(RepositoryError::Query))
            .transpose()?;

        Ok(CareerExploration {
            id: parse_uuid(&self.id, "exploration id")?,
            user_id: UserId::from_uuid(parse_uuid(&self.user_id, "user_id")?),
            career_field: self.career_field,
            interest_level,
            notes: self.notes,
            status,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl CareerRepository for SqliteCareerRepository {
    async fn save(&self, exploration: &CareerExploration) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO career_explorations (id, user_id, career_field, interest_level, notes, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(exploration.id.to_string())
        .bind(exploration.user_id.to_string())
        .bind(&exploration.career_field)
        .bind(exploration.interest_level.map(|v| v as i64))
        .bind(&exploration.notes)
        .bind(exploration.status.map(|s| s.to_string()))
        .bind(format_datetime(&exploration.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CareerExploration>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM career_explorations WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut explorations = Vec::with_capacity(rows.len());
        for row in &rows {
            let exploration_row =
                ExplorationRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            explorations.push(exploration_row.into_exploration()?);
        }

        Ok(explorations)
    }
}
