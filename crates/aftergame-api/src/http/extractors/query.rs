//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use aftergame_types::event::ChangeTable;

/// Query parameters for the conversation list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct ConversationListQuery {
    /// Maximum results, newest first.
    pub limit: Option<i64>,
}

/// Query parameters for the change feed.
#[derive(Debug, Deserialize, Default)]
pub struct ChangesQuery {
    /// Only stream changes to this table.
    pub table: Option<ChangeTable>,
}
