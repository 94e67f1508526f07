//! HTTP clients.
//!
//! - `gateway`: the upstream chat-completions gateway, used by the relay and
//!   the career service
//! - `relay_client`: the client side of the chat relay, used by the CLI

pub mod gateway;
pub mod relay_client;

use aftergame_core::llm::GatewayError;

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e.to_string())
    }
}
