//! Career suggestion and exploration endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use aftergame_types::career::{CareerExploration, CareerSuggestion, SuggestionRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/career/suggestions
///
/// One non-streaming gateway call; nothing is stored until the athlete
/// saves a suggestion.
pub async fn suggest(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<SuggestionRequest>,
) -> Result<ApiResponse<Vec<CareerSuggestion>>, AppError> {
    let start = Instant::now();
    let suggestions = state.career_service.suggest(&body).await?;
    tracing::info!(
        user_id = %auth.ctx.user_id,
        count = suggestions.len(),
        "career suggestions generated"
    );
    Ok(ApiResponse::timed(suggestions, auth.ctx.request_id, start))
}

/// POST /api/v1/career/explorations
pub async fn save_exploration(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CareerSuggestion>,
) -> Result<ApiResponse<CareerExploration>, AppError> {
    let start = Instant::now();
    let exploration = state
        .career_service
        .save_exploration(&auth.ctx, &body)
        .await?;
    Ok(ApiResponse::timed(exploration, auth.ctx.request_id, start).created())
}

/// GET /api/v1/career/explorations
pub async fn list_explorations(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<ApiResponse<Vec<CareerExploration>>, AppError> {
    let start = Instant::now();
    let explorations = state.career_service.list_explorations(&auth.ctx).await?;
    Ok(ApiResponse::timed(explorations, auth.ctx.request_id, start))
}
