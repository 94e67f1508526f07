//! HTTP layer for Aftergame.
//!
//! Axum-based REST API at `/api/v1/` with bearer token authentication,
//! envelope response format, CORS support and the chat relay at
//! `/functions/v1/chat`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
