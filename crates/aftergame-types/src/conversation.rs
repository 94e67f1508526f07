//! Persisted record of a completed coaching turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserId;

/// One durable row per completed turn: the user's message, the fully
/// assembled assistant response and the sentiment of the user's message.
///
/// Written once and never mutated. Never created for a failed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub message: String,
    pub response: String,
    /// Lexicon sentiment of `message`, within [-1, 1].
    pub sentiment_score: f64,
    pub created_at: DateTime<Utc>,
}

/// The fields a client submits after a turn completes.
///
/// `sentiment_score` is advisory; the server scores `message` itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConversation {
    pub message: String,
    pub response: String,
    #[serde(default)]
    pub sentiment_score: f64,
}

impl ConversationRecord {
    /// Stamp a submitted turn with an id, owner and creation time.
    pub fn new(user_id: UserId, turn: NewConversation) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            message: turn.message,
            response: turn.response,
            sentiment_score: turn.sentiment_score,
            created_at: Utc::now(),
        }
    }
}
