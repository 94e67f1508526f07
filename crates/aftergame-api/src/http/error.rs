//! Application error types mapping to HTTP status codes.
//!
//! `AppError` renders the `{data, meta, errors}` envelope used by the REST API.
//! `RelayError` renders the flat `{error}` body that chat clients expect from
//! the relay endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use aftergame_types::error::{AccountError, ChatError, ServiceError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Sign-up, login and token errors.
    Account(AccountError),
    /// Profile, journal, conversation and career storage errors.
    Service(ServiceError),
    /// AI gateway failures outside the relay.
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    NotFound(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Account(e @ (AccountError::InvalidEmail | AccountError::WeakPassword { .. })) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Account(AccountError::EmailTaken) => (
                StatusCode::CONFLICT,
                "EMAIL_TAKEN",
                AccountError::EmailTaken.to_string(),
            ),
            AppError::Account(AccountError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                AccountError::InvalidCredentials.to_string(),
            ),
            AppError::Account(e) => {
                tracing::error!(error = %e, "account operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "ACCOUNT_ERROR", "Internal server error".to_string())
            }
            AppError::Service(ServiceError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Service(ServiceError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string())
            }
            AppError::Service(ServiceError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Service(e) => {
                tracing::error!(error = %e, "storage operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", "Internal server error".to_string())
            }
            AppError::Chat(e) => {
                let (status, code) = match e {
                    ChatError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    ChatError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                    ChatError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
                    ChatError::QuotaExhausted => (StatusCode::PAYMENT_REQUIRED, "QUOTA_EXHAUSTED"),
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "AI_SERVICE_ERROR"),
                };
                (status, code, e.user_message())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

/// Relay failure rendered as `{"error": "<notification>"}`.
#[derive(Debug)]
pub struct RelayError(pub ChatError);

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ChatError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ChatError::Unauthorized => StatusCode::UNAUTHORIZED,
            ChatError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            ChatError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}
