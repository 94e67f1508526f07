//! One chat turn from the client's side.
//!
//! `TurnRunner` owns the session transcript. `run_turn` sends the recent
//! history through a [`ChatTransport`], decodes the relayed stream into the
//! assistant draft, and on success hands a sentiment-scored record to the
//! [`ConversationSink`] on a background task. A failed turn never leaves a
//! draft behind and never reaches the sink.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use aftergame_types::chat::{ChatMessage, ChatRequest, MAX_CONTENT_CHARS, MAX_MESSAGES};
use aftergame_types::conversation::NewConversation;
use aftergame_types::error::ChatError;

use super::decoder::{DecodedFrame, SseDecoder};
use super::transcript::Transcript;
use super::transport::{ChatTransport, ConversationSink, RelayResponse, map_relay_status};
use crate::sentiment;

/// Upper bound on an error body read from the relay.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct TurnConfig {
    /// Longest wait for the relay's headers or for the next chunk.
    pub idle_timeout: Duration,
    /// Number of most recent messages sent with each turn, clamped to
    /// `1..=MAX_MESSAGES` when the window is built.
    pub max_history: usize,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(60),
            max_history: MAX_MESSAGES,
        }
    }
}

/// Progress notification for one delta.
#[derive(Debug, Clone, Copy)]
pub struct DraftUpdate<'a> {
    pub delta: &'a str,
    pub text: &'a str,
}

/// A successfully completed turn.
#[derive(Debug)]
pub struct CompletedTurn {
    pub message: String,
    pub response: String,
    pub sentiment_score: f64,
    /// Background persistence of this turn. Failures are logged, not returned.
    pub persistence: JoinHandle<()>,
}

pub struct TurnRunner<T: ChatTransport, S: ConversationSink + 'static> {
    transport: T,
    sink: Arc<S>,
    transcript: Transcript,
    config: TurnConfig,
}

impl<T: ChatTransport, S: ConversationSink + 'static> TurnRunner<T, S> {
    pub fn new(transport: T, sink: S, config: TurnConfig) -> Self {
        Self {
            transport,
            sink: Arc::new(sink),
            transcript: Transcript::new(),
            config,
        }
    }

    /// Continue a session from earlier messages.
    pub fn with_transcript(mut self, messages: Vec<ChatMessage>) -> Self {
        self.transcript = Transcript::from_messages(messages);
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Forget the session so far; the next turn starts a fresh window.
    pub fn reset(&mut self) {
        self.transcript = Transcript::new();
    }

    /// Run one turn. `on_update` sees every delta in arrival order.
    ///
    /// Taking `&mut self` limits a runner to one turn in flight.
    pub async fn run_turn<F>(&mut self, user_text: &str, mut on_update: F) -> Result<CompletedTurn, ChatError>
    where
        F: FnMut(DraftUpdate<'_>),
    {
        if user_text.trim().is_empty() {
            return Err(ChatError::InvalidInput("Message cannot be empty".to_string()));
        }
        if user_text.chars().count() > MAX_CONTENT_CHARS {
            return Err(ChatError::InvalidInput(format!(
                "Message exceeds {MAX_CONTENT_CHARS} characters"
            )));
        }

        self.transcript.push_user(user_text);
        let request = ChatRequest {
            messages: self.transcript.history_window(self.config.max_history),
        };

        let response = match self.stream_reply(&request, &mut on_update).await {
            Ok(text) => text,
            Err(e) => {
                if let Some(draft) = self.transcript.rollback_draft() {
                    tracing::debug!(
                        discarded_chars = draft.content.chars().count(),
                        "rolled back partial assistant reply"
                    );
                }
                tracing::warn!(error = %e, "chat turn failed");
                return Err(e);
            }
        };

        let sentiment_score = sentiment::score(user_text);
        let turn = NewConversation {
            message: user_text.to_string(),
            response: response.clone(),
            sentiment_score,
        };

        let sink = Arc::clone(&self.sink);
        let persistence = tokio::spawn(async move {
            if let Err(e) = sink.record(&turn).await {
                tracing::error!(error = %e, "failed to persist conversation turn");
            }
        });

        Ok(CompletedTurn {
            message: user_text.to_string(),
            response,
            sentiment_score,
            persistence,
        })
    }

    async fn stream_reply<F>(&mut self, request: &ChatRequest, on_update: &mut F) -> Result<String, ChatError>
    where
        F: FnMut(DraftUpdate<'_>),
    {
        let idle = self.config.idle_timeout;

        let RelayResponse { status, mut body } = timeout(idle, self.transport.send(request))
            .await
            .map_err(|_| ChatError::StreamInterrupted("relay did not respond in time".to_string()))?
            .map_err(|e| ChatError::StreamInterrupted(e.to_string()))?;

        if !(200..300).contains(&status) {
            let text = read_error_body(&mut body, idle).await;
            return Err(map_relay_status(status, &text).unwrap_or_else(|| {
                ChatError::Internal(format!("unexpected relay status {status}"))
            }));
        }

        let mut decoder = SseDecoder::new();
        loop {
            let next = timeout(idle, body.next()).await.map_err(|_| {
                ChatError::StreamInterrupted(format!(
                    "no data received for {} seconds",
                    idle.as_secs()
                ))
            })?;

            let chunk = match next {
                None => break,
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => return Err(ChatError::StreamInterrupted(e.to_string())),
            };

            let frames = decoder
                .feed(&chunk)
                .map_err(|e| ChatError::StreamInterrupted(e.to_string()))?;
            for frame in frames {
                match frame {
                    DecodedFrame::Delta(delta) => {
                        let text = self.transcript.apply_delta(&delta);
                        on_update(DraftUpdate {
                            delta: &delta,
                            text,
                        });
                    }
                    DecodedFrame::Done => {}
                }
            }
            if decoder.is_done() {
                break;
            }
        }
        decoder.finish();

        match self.transcript.commit_draft() {
            Some(text) => Ok(text),
            None => Err(ChatError::StreamInterrupted(
                "the stream closed before any text arrived".to_string(),
            )),
        }
    }
}

async fn read_error_body(body: &mut crate::llm::ByteStream, idle: Duration) -> String {
    let mut buf = Vec::new();
    while let Ok(Some(Ok(chunk))) = timeout(idle, body.next()).await {
        let room = MAX_ERROR_BODY_BYTES.saturating_sub(buf.len());
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if buf.len() >= MAX_ERROR_BODY_BYTES {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
