//! SQLite journal repository.

use aftergame_core::repository::journal::JournalRepository;
use aftergame_types::error::RepositoryError;
use aftergame_types::identity::UserId;
use aftergame_types::journal::JournalEntry;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_date, parse_datetime, parse_uuid};

pub struct SqliteJournalRepository {
    pool: DatabasePool,
}

impl SqliteJournalRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct JournalRow {
    id: String,
    user_id: String,
    entry_date: String,
    mood_rating: i64,
    gratitude_1: String,
    gratitude_2: String,
    gratitude_3: String,
    challenge_faced: String,
    small_win: String,
    tomorrow_goal: String,
    private_notes: Option<String>,
    created_at: String,
}

impl JournalRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            entry_date: row.try_get("entry_date")?,
            mood_rating: row.try_get("mood_rating")?,
            gratitude_1: row.try_get("gratitude_1")?,
            gratitude_2: row.try_get("gratitude_2")?,
            gratitude_3: row.try_get("gratitude_3")?,
            challenge_faced: row.try_get("challenge_faced")?,
            small_win: row.try_get("small_win")?,
            tomorrow_goal: row.try_get("tomorrow_goal")?,
            private_notes: row.try_get("private_notes")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_entry(self) -> Result<JournalEntry, RepositoryError> {
        let mood_rating = u8::try_from(self.mood_rating)
            .map_err(|_| RepositoryError::Query(format!("invalid mood_rating: {}", self.mood_rating)))?;

        Ok(JournalEntry {
            id: parse_uuid(&self.id, "journal entry id")?,
            user_id: UserId::from_uuid(parse_uuid(&self.user_id, "user_id")?),
            entry_date: parse_date(&self.entry_date)?,
            mood_rating,
            gratitude_1: self.gratitude_1,
            gratitude_2: self.gratitude_2,
            gratitude_3: self.gratitude_3,
            challenge_faced: self.challenge_faced,
            small_win: self.small_win,
            tomorrow_goal: self.tomorrow_goal,
            private_notes: self.private_notes,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl JournalRepository for SqliteJournalRepository {
    async fn create(&self, entry: &JournalEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO journal_entries (id, user_id, entry_date, mood_rating, gratitude_1, gratitude_2, gratitude_3,
                                            challenge_faced, small_win, tomorrow_goal, private_notes, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.entry_date.format("%Y-%m-%d").to_string())
        .bind(entry.mood_rating as i64)
        .bind(&entry.gratitude_1)
        .bind(&entry.gratitude_2)
        .bind(&entry.gratitude_3)
        .bind(&entry.challenge_faced)
        .bind(&entry.small_win)
        .bind(&entry.tomorrow_goal)
        .bind(&entry.private_notes)
        .bind(format_datetime(&entry.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<JournalEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM journal_entries WHERE user_id = ? ORDER BY entry_date DESC, created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let entry_row =
                JournalRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            entries.push(entry_row.into_entry()?);
        }

        Ok(entries)
    }

    async fn count_for_user(&self, user_id: &UserId) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM journal_entries WHERE user_id = ?")
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
