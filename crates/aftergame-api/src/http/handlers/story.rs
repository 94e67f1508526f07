//! Success story library.

use std::time::Instant;

use axum::extract::State;

use aftergame_types::story::SuccessStory;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/stories: featured first, then most recent career end.
pub async fn list_stories(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<SuccessStory>>, AppError> {
    let start = Instant::now();
    let stories = state.story_service.list().await?;
    Ok(ApiResponse::timed(stories, uuid::Uuid::now_v7(), start))
}
