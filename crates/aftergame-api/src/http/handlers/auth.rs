//! Account endpoints: sign-up, login and logout.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde_json::json;
use uuid::Uuid;

use aftergame_types::identity::Credentials;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let issued = state.account_service.signup(&body).await?;

    tracing::info!(user_id = %issued.user_id, "account created over HTTP");
    Ok(ApiResponse::timed(json!(issued), Uuid::now_v7(), start).created())
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let issued = state.account_service.login(&body).await?;
    Ok(ApiResponse::timed(json!(issued), Uuid::now_v7(), start))
}

/// POST /api/v1/auth/logout: revoke the presented token.
pub async fn logout(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let revoked = state.account_service.logout(&auth.token).await?;
    Ok(ApiResponse::timed(
        json!({ "revoked": revoked }),
        auth.ctx.request_id,
        start,
    ))
}
