//! Career suggestions and saved explorations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::identity::UserId;

/// Where an athlete stands with a saved career field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplorationStatus {
    Exploring,
    Pursuing,
    Archived,
}

impl fmt::Display for ExplorationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorationStatus::Exploring => write!(f, "exploring"),
            ExplorationStatus::Pursuing => write!(f, "pursuing"),
            ExplorationStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for ExplorationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exploring" => Ok(ExplorationStatus::Exploring),
            "pursuing" => Ok(ExplorationStatus::Pursuing),
            "archived" => Ok(ExplorationStatus::Archived),
            other => Err(format!("invalid exploration status: '{other}'")),
        }
    }
}

/// One AI-generated career idea. Transient until saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerSuggestion {
    pub career_field: String,
    pub reasoning: String,
    pub interest_level: u8,
    pub next_steps: String,
}

/// Input for a suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub former_sport: String,
    pub career_end_reason: String,
}

/// A career field the athlete chose to keep exploring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerExploration {
    pub id: Uuid,
    pub user_id: UserId,
    pub career_field: String,
    pub interest_level: Option<u8>,
    pub notes: Option<String>,
    pub status: Option<ExplorationStatus>,
    pub created_at: DateTime<Utc>,
}

impl CareerExploration {
    /// Saved form of a suggestion: status `exploring`, reasoning and next
    /// steps folded into the notes.
    pub fn from_suggestion(user_id: UserId, suggestion: &CareerSuggestion) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            career_field: suggestion.career_field.clone(),
            interest_level: Some(suggestion.interest_level),
            notes: Some(format!(
                "{}\n\nNext Steps:\n{}",
                suggestion.reasoning, suggestion.next_steps
            )),
            status: Some(ExplorationStatus::Exploring),
            created_at: Utc::now(),
        }
    }
}
