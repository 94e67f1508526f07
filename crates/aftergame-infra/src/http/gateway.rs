//! HttpCompletionGateway: reqwest client for `POST {base_url}/chat/completions`.
//!
//! Streaming replies are handed back as the raw `bytes_stream()` of the
//! response so the relay can forward them without re-framing. The API key is
//! wrapped in [`SecretString`] and only exposed when building the
//! `Authorization` header.

use std::time::Duration;

use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use aftergame_core::llm::{CompletionGateway, GatewayError, GatewayReply, GatewayResponse};
use aftergame_types::config::AppConfig;
use aftergame_types::llm::CompletionRequest;

use super::map_reqwest_error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpCompletionGateway {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    completions_url: String,
    request_timeout: Duration,
}

impl HttpCompletionGateway {
    /// Build a gateway client. A missing key is allowed; requests then fail
    /// with [`GatewayError::NotConfigured`].
    pub fn new(config: &AppConfig, api_key: Option<SecretString>) -> Result<Self, GatewayError> {
        // No overall timeout: streaming replies may legitimately run long.
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(map_reqwest_error)?;

        Ok(Self {
            client,
            api_key,
            completions_url: config.completions_url(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn post(&self, request: &CompletionRequest) -> Result<reqwest::RequestBuilder, GatewayError> {
        let key = self.api_key.as_ref().ok_or(GatewayError::NotConfigured)?;
        Ok(self
            .client
            .post(&self.completions_url)
            .bearer_auth(key.expose_secret())
            .json(request))
    }
}

impl CompletionGateway for HttpCompletionGateway {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn open_stream(&self, request: &CompletionRequest) -> Result<GatewayResponse, GatewayError> {
        let response = self.post(request)?.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        tracing::debug!(status, url = %self.completions_url, "gateway stream opened");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error));

        Ok(GatewayResponse {
            status,
            body: Box::pin(body),
        })
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<GatewayReply, GatewayError> {
        let response = self
            .post(request)?
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(GatewayReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aftergame_types::llm::Message;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SSE_BODY: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n";

    fn gateway_for(server: &MockServer, key: Option<&str>) -> HttpCompletionGateway {
        let config = AppConfig {
            gateway_base_url: format!("{}/v1", server.uri()),
            ..AppConfig::default()
        };
        HttpCompletionGateway::new(&config, key.map(|k| SecretString::from(k.to_string()))).unwrap()
    }

    fn request(stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: "google/gemini-2.5-flash".to_string(),
            messages: vec![Message::system("be kind"), Message::user("hello")],
            stream,
        }
    }

    #[tokio::test]
    async fn test_open_stream_forwards_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "google/gemini-2.5-flash",
                "stream": true,
                "messages": [{"role": "system", "content": "be kind"}, {"role": "user", "content": "hello"}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(SSE_BODY),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, Some("test-key"));
        assert!(gateway.is_configured());

        let response = gateway.open_stream(&request(true)).await.unwrap();
        assert_eq!(response.status, 200);

        let mut body = response.body;
        let mut bytes = Vec::new();
        while let Some(chunk) = body.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(bytes, SSE_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_open_stream_passes_error_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("{\"error\":\"slow down\"}"))
            .mount(&server)
            .await;

        let response = gateway_for(&server, Some("k"))
            .open_stream(&request(true))
            .await
            .unwrap();
        assert_eq!(response.status, 429);
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server, None);
        assert!(!gateway.is_configured());
        let err = gateway.open_stream(&request(true)).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
        let err = gateway.complete(&request(false)).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured));
    }

    #[tokio::test]
    async fn test_complete_reads_whole_body() {
        let server = MockServer::start().await;
        let reply = r#"{"choices":[{"message":{"content":"{\"suggestions\":[]}"}}]}"#;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_string(reply))
            .mount(&server)
            .await;

        let reply_got = gateway_for(&server, Some("k"))
            .complete(&request(false))
            .await
            .unwrap();
        assert_eq!(reply_got, GatewayReply { status: 200, body: reply.to_string() });
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let config = AppConfig {
            gateway_base_url: "http://127.0.0.1:1/v1".to_string(),
            ..AppConfig::default()
        };
        let gateway =
            HttpCompletionGateway::new(&config, Some(SecretString::from("k".to_string()))).unwrap();
        let err = gateway.open_stream(&request(true)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_) | GatewayError::Timeout));
    }
}
