//! CompletionGateway trait definition.
//!
//! The gateway is an opaque external service with a fixed chat-completions
//! contract. The trait exposes the raw status and body so that the relay can
//! pass bytes through untouched and apply its own status mapping.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use aftergame_types::error::ChatError;
use aftergame_types::llm::CompletionRequest;

/// Transport-level failures talking to the gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway API key is not configured")]
    NotConfigured,

    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway request timed out")]
    Timeout,
}

/// Unbuffered upstream body. Items are forwarded in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, GatewayError>> + Send + 'static>>;

/// Status line and still-unread body of a streaming completion.
pub struct GatewayResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl std::fmt::Debug for GatewayResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Fully read reply of a non-streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

/// Trait for the chat-completions gateway.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in aftergame-infra (e.g., `HttpCompletionGateway`).
pub trait CompletionGateway: Send + Sync {
    /// Whether credentials for the gateway are present.
    fn is_configured(&self) -> bool;

    /// Issue a streaming completion and return as soon as headers arrive.
    fn open_stream(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<GatewayResponse, GatewayError>> + Send;

    /// Issue a non-streaming completion and read the whole body.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<GatewayReply, GatewayError>> + Send;
}

impl<T: CompletionGateway> CompletionGateway for std::sync::Arc<T> {
    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    fn open_stream(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<GatewayResponse, GatewayError>> + Send {
        (**self).open_stream(request)
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<GatewayReply, GatewayError>> + Send {
        (**self).complete(request)
    }
}

/// Translate a non-success gateway status into the chat error taxonomy.
///
/// Returns `None` for 2xx.
pub fn map_upstream_status(status: u16, body: impl Into<String>) -> Option<ChatError> {
    match status {
        200..=299 => None,
        429 => Some(ChatError::RateLimited),
        402 => Some(ChatError::QuotaExhausted),
        _ => Some(ChatError::Upstream {
            status,
            body: body.into(),
        }),
    }
}
