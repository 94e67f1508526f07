//! Read-only library of athletes who found a new path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessStory {
    pub id: Uuid,
    pub athlete_name: String,
    pub former_sport: String,
    pub career_end_year: i32,
    pub new_career_path: String,
    pub story_summary: String,
    pub key_lesson: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Import format for `aftergame stories import`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSuccessStory {
    pub athlete_name: String,
    pub former_sport: String,
    pub career_end_year: i32,
    pub new_career_path: String,
    pub story_summary: String,
    pub key_lesson: String,
    #[serde(default)]
    pub is_featured: bool,
}

impl From<NewSuccessStory> for SuccessStory {
    fn from(s: NewSuccessStory) -> Self {
        Self {
            id: Uuid::now_v7(),
            athlete_name: s.athlete_name,
            former_sport: s.former_sport,
            career_end_year: s.career_end_year,
            new_career_path: s.new_career_path,
            story_summary: s.story_summary,
            key_lesson: s.key_lesson,
            is_featured: s.is_featured,
            created_at: Utc::now(),
        }
    }
}
