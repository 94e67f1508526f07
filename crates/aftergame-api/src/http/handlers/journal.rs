//! Daily journal endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use aftergame_types::journal::{JournalEntry, MoodTrend, NewJournalEntry};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/journal
pub async fn create_entry(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<NewJournalEntry>,
) -> Result<ApiResponse<JournalEntry>, AppError> {
    let start = Instant::now();
    let entry = state.journal_service.create_entry(&auth.ctx, body).await?;
    Ok(ApiResponse::timed(entry, auth.ctx.request_id, start).created())
}

/// GET /api/v1/journal: newest entry date first.
pub async fn list_entries(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<ApiResponse<Vec<JournalEntry>>, AppError> {
    let start = Instant::now();
    let entries = state.journal_service.list_entries(&auth.ctx).await?;
    Ok(ApiResponse::timed(entries, auth.ctx.request_id, start))
}

/// GET /api/v1/journal/trend
pub async fn mood_trend(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<ApiResponse<MoodTrend>, AppError> {
    let start = Instant::now();
    let trend = state.journal_service.trend(&auth.ctx).await?;
    Ok(ApiResponse::timed(trend, auth.ctx.request_id, start))
}
