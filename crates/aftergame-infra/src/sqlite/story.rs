//! SQLite success story repository.

use aftergame_core::repository::story::StoryRepository;
use aftergame_types::error::RepositoryError;
use aftergame_types::story::SuccessStory;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

pub struct SqliteStoryRepository {
    pool: DatabasePool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct StoryRow {
    id: String,
    athlete_name: String,
    former_sport: String,
    career_end_year: i64,
    new_career_path: String,
    story_summary: String,
    key_lesson: String,
    is_featured: bool,
    created_at: String,
}

impl StoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            athlete_name: row.try_get("athlete_name")?,
            former_sport: row.try_get("former_sport")?,
            career_end_year: row.try_get("career_end_year")?,
            new_career_path: row.try_get("new_career_path")?,
            story_summary: row.try_get("story_summary")?,
            key_lesson: row.try_get("key_lesson")?,
            is_featured: row.try_get("is_featured")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_story(self) -> Result<SuccessStory, RepositoryError> {
        Ok(SuccessStory {
            id: parse_uuid(&self.id, "story id")?,
            athlete_name: self.athlete_name,
            former_sport: self.former_sport,
            career_end_year: self.career_end_year as i32,
            new_career_path: self.new_career_path,
            story_summary: self.story_summary,
            key_lesson: self.key_lesson,
            is_featured: self.is_featured,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl StoryRepository for SqliteStoryRepository {
    async fn insert(&self, story: &SuccessStory) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO success_stories (id, athlete_name, former_sport, career_end_year, new_career_path,
                                            story_summary, key_lesson, is_featured, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(story.id.to_string())
        .bind(&story.athlete_name)
        .bind(&story.former_sport)
        .bind(story.career_end_year as i64)
        .bind(&story.new_career_path)
        .bind(&story.story_summary)
        .bind(&story.key_lesson)
        .bind(story.is_featured)
        .bind(format_datetime(&story.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<SuccessStory>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM success_stories ORDER BY is_featured DESC, career_end_year DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut stories = Vec::with_capacity(rows.len());
        for row in &rows {
            let story_row =
                StoryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            stories.push(story_row.into_story()?);
        }

        Ok(stories)
    }
}
