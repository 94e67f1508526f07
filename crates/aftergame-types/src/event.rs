//! Change notification types.
//!
//! A `ChangeEvent` is published after every successful write to a
//! user-owned table. All types are Clone + Send + Sync for use with tokio
//! broadcast channels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserId;

/// Tables whose writes are announced on the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Profiles,
    JournalEntries,
    Conversations,
    CareerExplorations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row-level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub kind: ChangeKind,
    pub user_id: UserId,
    pub row_id: Uuid,
}

impl ChangeEvent {
    pub fn insert(table: ChangeTable, user_id: UserId, row_id: Uuid) -> Self {
        Self {
            table,
            kind: ChangeKind::Insert,
            user_id,
            row_id,
        }
    }

    pub fn update(table: ChangeTable, user_id: UserId, row_id: Uuid) -> Self {
        Self {
            table,
            kind: ChangeKind::Update,
            user_id,
            row_id,
        }
    }
}

/// Which events a subscriber wants. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFilter {
    pub table: Option<ChangeTable>,
    pub user_id: Option<UserId>,
}

impl ChangeFilter {
    /// Every event owned by `user_id`.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            table: None,
            user_id: Some(user_id),
        }
    }

    pub fn with_table(mut self, table: ChangeTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        self.table.is_none_or(|t| t == event.table)
            && self.user_id.as_ref().is_none_or(|u| *u == event.user_id)
    }
}
