//! Client-side port to the chat relay.

use aftergame_types::chat::ChatRequest;
use aftergame_types::conversation::NewConversation;
use aftergame_types::error::{ChatError, RepositoryError};

use crate::llm::{ByteStream, GatewayError};

/// Status and still-unread body of a relay reply.
pub struct RelayResponse {
    pub status: u16,
    pub body: ByteStream,
}

/// Sends a conversation to the relay.
///
/// Implementations live in aftergame-infra (e.g., `HttpChatTransport`).
pub trait ChatTransport: Send + Sync {
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<RelayResponse, GatewayError>> + Send;
}

/// Receives one record per completed turn.
pub trait ConversationSink: Send + Sync {
    fn record(
        &self,
        turn: &NewConversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Map a non-success relay status and its `{error}` body to a chat error.
///
/// Returns `None` for 2xx.
pub fn map_relay_status(status: u16, body: &str) -> Option<ChatError> {
    let message = || {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    };

    match status {
        200..=299 => None,
        400 => Some(ChatError::InvalidInput(message())),
        401 => Some(ChatError::Unauthorized),
        402 => Some(ChatError::QuotaExhausted),
        429 => Some(ChatError::RateLimited),
        _ => Some(ChatError::Upstream {
            status,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_carries_relay_message() {
        let err = map_relay_status(400, r#"{"error":"Messages must be between 1-50 items"}"#);
        assert_eq!(
            err,
            Some(ChatError::InvalidInput(
                "Messages must be between 1-50 items".to_string()
            ))
        );
    }

    #[test]
    fn statuses_map_to_taxonomy() {
        assert_eq!(map_relay_status(200, ""), None);
        assert_eq!(map_relay_status(401, "{}"), Some(ChatError::Unauthorized));
        assert_eq!(map_relay_status(402, "{}"), Some(ChatError::QuotaExhausted));
        assert_eq!(map_relay_status(429, "{}"), Some(ChatError::RateLimited));
        assert!(matches!(
            map_relay_status(500, r#"{"error":"AI service error"}"#),
            Some(ChatError::Upstream { status: 500, .. })
        ));
    }
}
