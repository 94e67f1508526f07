//! Server-side chat relay.
//!
//! Validates the inbound body, authenticates the caller, prepends the
//! coaching system prompt and opens a streaming completion. On success the
//! gateway body is handed back untouched for the HTTP layer to pipe to the
//! caller. The relay persists nothing.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::time::timeout;
use tracing::Instrument;

use aftergame_types::error::ChatError;
use aftergame_types::identity::UserId;
use aftergame_types::llm::{CompletionRequest, Message};

use super::prompt::COACH_SYSTEM_PROMPT;
use super::validate::validate_chat_request;
use crate::auth::IdentityResolver;
use crate::llm::{ByteStream, CompletionGateway, map_upstream_status};

/// Upper bound on an upstream error body kept for logging.
const MAX_UPSTREAM_ERROR_BYTES: usize = 16 * 1024;

const UPSTREAM_ERROR_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// An authorized pass-through of the gateway's event stream.
pub struct RelayStream {
    pub user_id: UserId,
    pub body: ByteStream,
}

impl std::fmt::Debug for RelayStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayStream")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

pub struct ChatRelay<G: CompletionGateway, I: IdentityResolver> {
    gateway: G,
    identity: I,
    model: String,
}

impl<G: CompletionGateway, I: IdentityResolver> ChatRelay<G, I> {
    pub fn new(gateway: G, identity: I, model: impl Into<String>) -> Self {
        Self {
            gateway,
            identity,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Relay one chat request.
    ///
    /// Order of checks: body shape, gateway credentials, caller credential.
    /// Nothing reaches the gateway unless all three pass.
    pub async fn relay(
        &self,
        body: &serde_json::Value,
        credential: Option<&str>,
    ) -> Result<RelayStream, ChatError> {
        let request = validate_chat_request(body)?;

        if !self.gateway.is_configured() {
            tracing::error!("gateway API key is not configured");
            return Err(ChatError::Internal(
                "gateway API key is not configured".to_string(),
            ));
        }

        let user_id = self.authenticate(credential).await?;

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(Message::system(COACH_SYSTEM_PROMPT));
        messages.extend(request.messages.into_iter().map(Message::from));

        let upstream = CompletionRequest {
            model: self.model.clone(),
            messages,
            stream: true,
        };

        let span = tracing::info_span!(
            "gen_ai.relay",
            gen_ai.operation.name = "chat",
            gen_ai.request.model = %upstream.model,
            gen_ai.request.stream = true,
            user_id = %user_id,
            message_count = upstream.messages.len(),
        );

        async {
            let response = self.gateway.open_stream(&upstream).await.map_err(|e| {
                tracing::error!(error = %e, "gateway request failed");
                ChatError::Internal(e.to_string())
            })?;

            if (200..300).contains(&response.status) {
                tracing::info!(status = response.status, "relaying upstream stream");
                return Ok(RelayStream {
                    user_id: user_id.clone(),
                    body: response.body,
                });
            }

            let body = read_capped(response.body).await;
            let err = map_upstream_status(response.status, body.clone()).unwrap_or_else(|| {
                ChatError::Internal(format!("unexpected gateway status {}", response.status))
            });
            match &err {
                ChatError::RateLimited | ChatError::QuotaExhausted => {
                    tracing::warn!(status = response.status, "gateway refused request");
                }
                _ => {
                    tracing::error!(status = response.status, body = %body, "AI gateway error");
                }
            }
            Err(err)
        }
        .instrument(span)
        .await
    }

    async fn authenticate(&self, credential: Option<&str>) -> Result<UserId, ChatError> {
        let Some(token) = credential else {
            tracing::debug!("relay request without credential");
            return Err(ChatError::Unauthorized);
        };
        match self.identity.resolve(token).await {
            Ok(Some(user_id)) => Ok(user_id),
            Ok(None) => Err(ChatError::Unauthorized),
            Err(e) => {
                tracing::error!(error = %e, "credential lookup failed");
                Err(ChatError::Internal(e.to_string()))
            }
        }
    }
}

/// Read at most `MAX_UPSTREAM_ERROR_BYTES` of an error body, giving up after
/// `UPSTREAM_ERROR_READ_TIMEOUT` with whatever arrived.
async fn read_capped(mut body: ByteStream) -> String {
    let mut buf = Vec::new();
    let read = async {
        while let Some(Ok(chunk)) = body.next().await {
            let room = MAX_UPSTREAM_ERROR_BYTES.saturating_sub(buf.len());
            buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if buf.len() >= MAX_UPSTREAM_ERROR_BYTES {
                break;
            }
        }
    };
    if timeout(UPSTREAM_ERROR_READ_TIMEOUT, read).await.is_err() {
        tracing::debug!(read_bytes = buf.len(), "gave up reading upstream error body");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
