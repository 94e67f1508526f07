//! Shape validation of an inbound relay body.
//!
//! Works on the raw JSON value so that every rejection carries the exact
//! client-facing message, including the index of the offending message.
//! Nothing here touches the network: a request that fails validation never
//! reaches the gateway.

use serde_json::Value;

use aftergame_types::chat::{ChatMessage, ChatRequest, ChatRole, MAX_CONTENT_CHARS, MAX_MESSAGES};
use aftergame_types::error::ChatError;

/// Validate `{ "messages": [...] }` and return the typed request.
///
/// Content longer than [`MAX_CONTENT_CHARS`] characters is rejected, never
/// truncated.
pub fn validate_chat_request(body: &Value) -> Result<ChatRequest, ChatError> {
    let Some(raw) = body.get("messages").and_then(Value::as_array) else {
        return Err(ChatError::InvalidInput(
            "Invalid request: messages array required".to_string(),
        ));
    };

    if raw.is_empty() || raw.len() > MAX_MESSAGES {
        return Err(ChatError::InvalidInput(format!(
            "Messages must be between 1-{MAX_MESSAGES} items"
        )));
    }

    let mut messages = Vec::with_capacity(raw.len());
    for (index, item) in raw.iter().enumerate() {
        let role = item
            .get("role")
            .and_then(Value::as_str)
            .and_then(|r| r.parse::<ChatRole>().ok());
        let content = item.get("content").and_then(Value::as_str);

        let (Some(role), Some(content)) = (role, content) else {
            return Err(invalid_message(index));
        };
        if content.is_empty() {
            return Err(invalid_message(index));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(ChatError::InvalidInput(format!(
                "Message at index {index} exceeds length limit"
            )));
        }

        messages.push(ChatMessage {
            role,
            content: content.to_string(),
        });
    }

    Ok(ChatRequest { messages })
}

fn invalid_message(index: usize) -> ChatError {
    ChatError::InvalidInput(format!("Invalid message at index {index}"))
}
