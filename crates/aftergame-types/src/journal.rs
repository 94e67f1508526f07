//! Daily journal entries and the mood-trend view derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserId;

pub const MIN_MOOD: u8 = 1;
pub const MAX_MOOD: u8 = 10;

/// Number of most recent entries plotted on the mood chart.
pub const MOOD_TREND_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub entry_date: NaiveDate,
    pub mood_rating: u8,
    pub gratitude_1: String,
    pub gratitude_2: String,
    pub gratitude_3: String,
    pub challenge_faced: String,
    pub small_win: String,
    pub tomorrow_goal: String,
    pub private_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Journal form submission. `entry_date` defaults to today when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    #[serde(default)]
    pub entry_date: Option<NaiveDate>,
    pub mood_rating: u8,
    pub gratitude_1: String,
    pub gratitude_2: String,
    pub gratitude_3: String,
    pub challenge_faced: String,
    pub small_win: String,
    pub tomorrow_goal: String,
    #[serde(default)]
    pub private_notes: Option<String>,
}

/// One point of the mood chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodPoint {
    pub date: NaiveDate,
    /// Short axis label such as `Mar 07`.
    pub label: String,
    pub mood: u8,
}

/// Chart data plus the average over every entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodTrend {
    pub points: Vec<MoodPoint>,
    pub average_mood: f64,
    pub entry_count: usize,
}
