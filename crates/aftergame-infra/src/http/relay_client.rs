//! Client side of the chat relay.
//!
//! `HttpChatTransport` posts the conversation window to
//! `{base}/functions/v1/chat` and returns the still-streaming response.
//! `HttpConversationSink` writes finished turns to `{base}/api/v1/conversations`.
//! Both authenticate with the caller's bearer token.

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use aftergame_core::chat::transport::{ChatTransport, ConversationSink, RelayResponse};
use aftergame_core::llm::GatewayError;
use aftergame_types::chat::ChatRequest;
use aftergame_types::conversation::NewConversation;
use aftergame_types::error::RepositoryError;

use super::map_reqwest_error;

pub const RELAY_PATH: &str = "/functions/v1/chat";
pub const CONVERSATIONS_PATH: &str = "/api/v1/conversations";

fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub struct HttpChatTransport {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl HttpChatTransport {
    pub fn new(client: reqwest::Client, base_url: &str, token: SecretString) -> Self {
        Self {
            client,
            url: join(base_url, RELAY_PATH),
            token,
        }
    }
}

impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<RelayResponse, GatewayError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error));

        Ok(RelayResponse {
            status,
            body: Box::pin(body),
        })
    }
}

pub struct HttpConversationSink {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl HttpConversationSink {
    pub fn new(client: reqwest::Client, base_url: &str, token: SecretString) -> Self {
        Self {
            client,
            url: join(base_url, CONVERSATIONS_PATH),
            token,
        }
    }
}

impl ConversationSink for HttpConversationSink {
    async fn record(&self, turn: &NewConversation) -> Result<(), RepositoryError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(turn)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "conversation write did not reach the server");
                RepositoryError::Connection
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RepositoryError::Query(format!("HTTP {status}: {body}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use aftergame_core::chat::turn::{TurnConfig, TurnRunner};
    use aftergame_types::error::ChatError;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "ag_0123";

    fn runner(server: &MockServer) -> TurnRunner<HttpChatTransport, HttpConversationSink> {
        let client = reqwest::Client::new();
        let token = || SecretString::from(TOKEN.to_string());
        TurnRunner::new(
            HttpChatTransport::new(client.clone(), &server.uri(), token()),
            HttpConversationSink::new(client, &server.uri(), token()),
            TurnConfig {
                idle_timeout: Duration::from_secs(5),
                max_history: 50,
            },
        )
    }

    #[tokio::test]
    async fn test_turn_streams_reply_and_persists_once() {
        let server = MockServer::start().await;
        let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"That sounds \"}}]}\n\n\
                   data: {\"choices\":[{\"delta\":{\"content\":\"really hard.\"}}]}\n\n\
                   data: [DONE]\n\n";
        Mock::given(method("POST"))
            .and(path(RELAY_PATH))
            .and(header("authorization", "Bearer ag_0123"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "user", "content": "I just got cut from the team"}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CONVERSATIONS_PATH))
            .and(body_partial_json(serde_json::json!({
                "message": "I just got cut from the team",
                "response": "That sounds really hard."
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let mut runner = runner(&server);
        let mut seen = Vec::new();
        let turn = runner
            .run_turn("I just got cut from the team", |u| seen.push(u.text.to_string()))
            .await
            .unwrap();

        assert_eq!(turn.response, "That sounds really hard.");
        assert_eq!(seen, vec!["That sounds ", "That sounds really hard."]);
        assert!((-1.0..=1.0).contains(&turn.sentiment_score));
        turn.persistence.await.unwrap();
    }

    #[tokio::test]
    async fn test_rate_limited_relay_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(RELAY_PATH))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(serde_json::json!({"error": "Rate limit exceeded. Please try again later."})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(CONVERSATIONS_PATH))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut runner = runner(&server);
        let err = runner.run_turn("hello", |_| {}).await.unwrap_err();
        assert_eq!(err, ChatError::RateLimited);
        assert_eq!(runner.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_sink_reports_server_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CONVERSATIONS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"errors\":[]}"))
            .mount(&server)
            .await;

        let sink = HttpConversationSink::new(
            reqwest::Client::new(),
            &format!("{}/", server.uri()),
            SecretString::from(TOKEN.to_string()),
        );
        let err = sink
            .record(&NewConversation {
                message: "m".to_string(),
                response: "r".to_string(),
                sentiment_score: 0.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(msg) if msg.starts_with("HTTP 401")));
    }

    #[test]
    fn test_join_trims_trailing_slash() {
        assert_eq!(
            join("http://localhost:8080/", RELAY_PATH),
            "http://localhost:8080/functions/v1/chat"
        );
    }
}
