//! Dashboard statistics endpoint.

use std::time::Instant;

use axum::extract::State;

use aftergame_core::service::dashboard::DashboardStats;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn get_stats(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<ApiResponse<DashboardStats>, AppError> {
    let start = Instant::now();
    let stats = state.dashboard_service.stats(&auth.ctx).await?;
    Ok(ApiResponse::timed(stats, auth.ctx.request_id, start))
}
