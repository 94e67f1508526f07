//! SQLite conversation repository.
//!
//! Append-only: rows are inserted once per completed chat turn and never
//! updated.

use aftergame_core::repository::conversation::ConversationRepository;
use aftergame_types::conversation::ConversationRecord;
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConversationRow {
    id: String,
    user_id: String,
    message: String,
    response: String,
    sentiment_score: f64,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            message: row.try_get("message")?,
            response: row.try_get("response")?,
            sentiment_score: row.try_get("sentiment_score")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<ConversationRecord, RepositoryError> {
        Ok(ConversationRecord {
            id: parse_uuid(&self.id, "conversation id")?,
            user_id: UserId::from_uuid(parse_uuid(&self.user_id, "user_id")?),
            message: self.message,
            response: self.response,
            sentiment_score: self.sentiment_score,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn save(&self, record: &ConversationRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO conversations (id, user_id, message, response, sentiment_score, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.message)
        .bind(&record.response)
        .bind(record.sentiment_score)
        .bind(format_datetime(&record.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let mut sql = String::from(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit.max(0)));
        }

        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let conv_row = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(conv_row.into_record()?);
        }

        Ok(records)
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversations WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
