//! Streaming chat relay endpoint.
//!
//! POST /functions/v1/chat
//!
//! Accepts `{ "messages": [{ "role", "content" }] }` with a bearer token and
//! pipes the gateway's event stream back byte for byte as
//! `text/event-stream`. Failures are `{ "error": "..." }` with the status the
//! chat client keys its notifications on.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::http::error::RelayError;
use crate::http::extractors::auth::header_token;
use crate::state::AppState;

/// POST /functions/v1/chat
pub async fn relay_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    // An unparsable body fails shape validation like a missing array.
    let payload = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    let stream = state
        .chat_relay
        .relay(&payload, header_token(&headers))
        .await
        .map_err(RelayError)?;

    tracing::debug!(user_id = %stream.user_id, "chat relay stream opened");

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream.body),
    )
        .into_response())
}

/// OPTIONS /functions/v1/chat: empty 200; CORS headers come from the router layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
