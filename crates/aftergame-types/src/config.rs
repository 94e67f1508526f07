//! Application configuration types for Aftergame.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! upstream gateway endpoint, model choices and stream timeouts.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Aftergame server and chat client.
///
/// Loaded from `~/.aftergame/config.toml`. All fields have sensible defaults.
/// The gateway API key is deliberately absent: it only comes from the
/// environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the chat-completions gateway (without `/chat/completions`).
    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,

    /// Model used by the chat relay.
    #[serde(default = "default_model")]
    pub chat_model: String,

    /// Model used for career suggestions.
    #[serde(default = "default_model")]
    pub career_model: String,

    /// Seconds without a new chunk before a streaming turn is abandoned.
    #[serde(default = "default_stream_idle_timeout_secs")]
    pub stream_idle_timeout_secs: u64,

    /// Overall timeout for non-streaming gateway calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of most recent transcript messages the chat client sends.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_gateway_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_stream_idle_timeout_secs() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_history() -> usize {
    crate::chat::MAX_MESSAGES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway_base_url: default_gateway_base_url(),
            chat_model: default_model(),
            career_model: default_model(),
            stream_idle_timeout_secs: default_stream_idle_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_history: default_max_history(),
        }
    }
}

impl AppConfig {
    /// `max_history` clamped to what the relay accepts (`1..=MAX_MESSAGES`).
    pub fn history_limit(&self) -> usize {
        self.max_history.clamp(1, crate::chat::MAX_MESSAGES)
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.gateway_base_url.trim_end_matches('/')
        )
    }
}
