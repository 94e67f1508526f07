//! Profile onboarding endpoints.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use aftergame_types::profile::{NewProfile, Profile, ProfileUpdate};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<ApiResponse<Profile>, AppError> {
    let start = Instant::now();
    let profile = state
        .profile_service
        .get_profile(&auth.ctx)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(ApiResponse::timed(profile, auth.ctx.request_id, start))
}

/// POST /api/v1/profile: onboarding, once per account.
pub async fn create_profile(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<NewProfile>,
) -> Result<ApiResponse<Profile>, AppError> {
    let start = Instant::now();
    let user = state
        .account_service
        .get_user(&auth.ctx.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    let profile = state
        .profile_service
        .create_profile(&auth.ctx, &user.email, body)
        .await?;
    Ok(ApiResponse::timed(profile, auth.ctx.request_id, start).created())
}

/// PUT /api/v1/profile: partial update.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<ProfileUpdate>,
) -> Result<ApiResponse<Profile>, AppError> {
    let start = Instant::now();
    let profile = state.profile_service.update_profile(&auth.ctx, body).await?;
    Ok(ApiResponse::timed(profile, auth.ctx.request_id, start))
}
