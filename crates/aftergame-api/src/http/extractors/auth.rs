//! Bearer token authentication extractor.
//!
//! Reads `Authorization: Bearer <token>` and resolves it to an account
//! through the account service. The resolved identity travels with the
//! request as an explicit [`RequestContext`].

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use aftergame_core::auth::{IdentityResolver, bearer_token};
use aftergame_types::identity::RequestContext;

use crate::http::error::AppError;
use crate::state::AppState;

/// An authenticated caller. Extracting this validates the bearer token.
pub struct Authenticated {
    pub ctx: RequestContext,
    /// The presented token, kept for logout.
    pub token: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;

        match state.account_service.resolve(&token).await {
            Ok(Some(user_id)) => Ok(Authenticated {
                ctx: RequestContext::new(user_id),
                token,
            }),
            Ok(None) => Err(AppError::Unauthorized(
                "Invalid or revoked token".to_string(),
            )),
            Err(e) => Err(AppError::Internal(format!("token lookup failed: {e}"))),
        }
    }
}

/// The bearer token from the `Authorization` header, if any.
pub fn header_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
}

fn extract_token(parts: &Parts) -> Result<String, AppError> {
    header_token(&parts.headers).map(str::to_string).ok_or_else(|| {
        AppError::Unauthorized(
            "Missing token. Provide it via 'Authorization: Bearer <token>'.".to_string(),
        )
    })
}
