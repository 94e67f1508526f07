//! Conversation persistence endpoints.
//!
//! The chat client posts one record per completed turn here; the relay
//! itself never writes.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};

use aftergame_types::conversation::{ConversationRecord, NewConversation};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::query::ConversationListQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/conversations
pub async fn record_turn(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<NewConversation>,
) -> Result<ApiResponse<ConversationRecord>, AppError> {
    let start = Instant::now();
    let record = state.conversation_service.record(&auth.ctx, body).await?;
    Ok(ApiResponse::timed(record, auth.ctx.request_id, start).created())
}

/// GET /api/v1/conversations?limit=N
pub async fn list_conversations(
    State(state): State<AppState>,
    auth: Authenticated,
    Query(query): Query<ConversationListQuery>,
) -> Result<ApiResponse<Vec<ConversationRecord>>, AppError> {
    let start = Instant::now();
    if query.limit.is_some_and(|l| l < 0) {
        return Err(AppError::Validation("limit must not be negative".to_string()));
    }
    let records = state
        .conversation_service
        .list(&auth.ctx, query.limit)
        .await?;
    Ok(ApiResponse::timed(records, auth.ctx.request_id, start))
}
