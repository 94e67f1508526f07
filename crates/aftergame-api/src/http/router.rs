//! Axum router configuration with middleware.
//!
//! The chat relay lives at `/functions/v1/chat`; everything else is under
//! `/api/v1/`. Middleware: CORS, tracing.

use axum::Router;
use axum::http::{HeaderName, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    let api_routes = Router::new()
        // Accounts
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // Onboarding
        .route(
            "/profile",
            get(handlers::profile::get_profile)
                .post(handlers::profile::create_profile)
                .put(handlers::profile::update_profile),
        )
        // Journal
        .route(
            "/journal",
            get(handlers::journal::list_entries).post(handlers::journal::create_entry),
        )
        .route("/journal/trend", get(handlers::journal::mood_trend))
        // Turn persistence
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations)
                .post(handlers::conversation::record_turn),
        )
        .route("/dashboard", get(handlers::dashboard::get_stats))
        // Career
        .route("/career/suggestions", post(handlers::career::suggest))
        .route(
            "/career/explorations",
            get(handlers::career::list_explorations).post(handlers::career::save_exploration),
        )
        .route("/stories", get(handlers::story::list_stories))
        .route("/changes", get(handlers::changes::stream_changes));

    Router::new()
        .route(
            "/functions/v1/chat",
            post(handlers::chat::relay_chat).options(handlers::chat::preflight),
        )
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use futures_util::StreamExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::state::test_state;

    const STREAM: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hello, I hear you.\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" Let's talk.\"}}]}\n\ndata: [DONE]\n\n";

    async fn setup() -> (tempfile::TempDir, MockServer, Router) {
        let server = MockServer::start().await;
        let (dir, state) = test_state::state(&server.uri()).await;
        (dir, server, build_router(state))
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn signup(router: &Router, email: &str) -> String {
        let (status, body) = send(
            router,
            request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({"email": email, "password": "long enough secret"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    fn one_message() -> Value {
        json!({"messages": [{"role": "user", "content": "I just got cut from the team"}]})
    }

    async fn mock_gateway(server: &MockServer, template: ResponseTemplate, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(template)
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (_dir, _server, router) = setup().await;
        let (status, body) = send(&router, request(Method::GET, "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn relay_preflight_allows_any_origin() {
        let (_dir, _server, router) = setup().await;
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/functions/v1/chat")
            .header("origin", "https://app.example")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization, x-client-info, apikey, content-type")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let bare = request(Method::OPTIONS, "/functions/v1/chat", None, None);
        let response = router.oneshot(bare).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn relay_streams_gateway_bytes_untouched() {
        let (_dir, server, router) = setup().await;
        mock_gateway(
            &server,
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(STREAM),
            1,
        )
        .await;
        let token = signup(&router, "athlete@example.com").await;

        let response = router
            .oneshot(request(Method::POST, "/functions/v1/chat", Some(&token), Some(one_message())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, STREAM.as_bytes());

        let sent: Value = server.received_requests().await.unwrap()[0].body_json().unwrap();
        assert_eq!(sent["stream"], true);
        assert_eq!(sent["messages"][0]["role"], "system");
        assert_eq!(sent["messages"][1]["content"], "I just got cut from the team");
    }

    #[tokio::test]
    async fn relay_rejects_empty_messages_without_upstream_call() {
        let (_dir, server, router) = setup().await;
        mock_gateway(&server, ResponseTemplate::new(200).set_body_string(STREAM), 0).await;
        let token = signup(&router, "athlete@example.com").await;

        let (status, body) = send(
            &router,
            request(Method::POST, "/functions/v1/chat", Some(&token), Some(json!({"messages": []}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Messages must be between 1-50 items"}));

        let (status, body) = send(
            &router,
            Request::builder()
                .method(Method::POST)
                .uri("/functions/v1/chat")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request: messages array required");
    }

    #[tokio::test]
    async fn relay_requires_a_known_token() {
        let (_dir, server, router) = setup().await;
        mock_gateway(&server, ResponseTemplate::new(200).set_body_string(STREAM), 0).await;

        let (status, body) = send(
            &router,
            request(Method::POST, "/functions/v1/chat", None, Some(one_message())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": "Unauthorized"}));

        let (status, _) = send(
            &router,
            request(Method::POST, "/functions/v1/chat", Some("ag_unknown"), Some(one_message())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn relay_maps_upstream_refusals() {
        let cases = [
            (429, StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded. Please try again later."),
            (402, StatusCode::PAYMENT_REQUIRED, "AI credits exhausted. Please add credits to continue."),
            (503, StatusCode::INTERNAL_SERVER_ERROR, "AI service error"),
        ];
        for (upstream, expected, message) in cases {
            let (_dir, server, router) = setup().await;
            mock_gateway(
                &server,
                ResponseTemplate::new(upstream).set_body_string("upstream detail"),
                1,
            )
            .await;
            let token = signup(&router, "athlete@example.com").await;

            let (status, body) = send(
                &router,
                request(Method::POST, "/functions/v1/chat", Some(&token), Some(one_message())),
            )
            .await;
            assert_eq!(status, expected);
            assert_eq!(body, json!({ "error": message }));

            // The relay never persists.
            let (_, list) = send(
                &router,
                request(Method::GET, "/api/v1/conversations", Some(&token), None),
            )
            .await;
            assert_eq!(list["data"], json!([]));
        }
    }

    #[tokio::test]
    async fn signup_login_logout_cycle() {
        let (_dir, _server, router) = setup().await;
        signup(&router, "Athlete@Example.com").await;

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({"email": "athlete@example.com", "password": "long enough secret"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["errors"][0]["code"], "EMAIL_TAKEN");

        let (status, _) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "athlete@example.com", "password": "wrong password"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({"email": "athlete@example.com", "password": "long enough secret"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &router,
            request(Method::POST, "/api/v1/auth/logout", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["revoked"], true);

        let (status, _) = send(&router, request(Method::GET, "/api/v1/dashboard", Some(&token), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn conversation_turns_are_recorded_and_listed() {
        let (_dir, _server, router) = setup().await;
        let token = signup(&router, "athlete@example.com").await;

        for (message, score) in [("first", 0.5), ("second", -0.25)] {
            let (status, body) = send(
                &router,
                request(
                    Method::POST,
                    "/api/v1/conversations",
                    Some(&token),
                    Some(json!({"message": message, "response": "noted", "sentiment_score": score})),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["data"]["message"], message);
        }

        let (status, body) = send(
            &router,
            request(Method::GET, "/api/v1/conversations?limit=1", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["message"], "second");

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/conversations",
                Some(&token),
                Some(json!({"message": "I feel great and hopeful", "response": "y", "sentiment_score": -1})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["data"]["sentiment_score"].as_f64(),
            Some(aftergame_core::sentiment::score("I feel great and hopeful"))
        );

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/conversations",
                Some(&token),
                Some(json!({"message": "I feel lost", "response": "y"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["data"]["sentiment_score"].as_f64(),
            Some(aftergame_core::sentiment::score("I feel lost"))
        );
    }

    #[tokio::test]
    async fn onboarding_journal_and_dashboard() {
        let (_dir, _server, router) = setup().await;
        let token = signup(&router, "athlete@example.com").await;

        let (status, _) = send(&router, request(Method::GET, "/api/v1/profile", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let profile = json!({
            "full_name": "Sam Rivera",
            "former_sport": "Soccer",
            "career_end_reason": "Injury",
            "career_end_date": "2024-03-01"
        });
        let (status, body) = send(
            &router,
            request(Method::POST, "/api/v1/profile", Some(&token), Some(profile.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["email"], "athlete@example.com");

        let (status, _) = send(
            &router,
            request(Method::POST, "/api/v1/profile", Some(&token), Some(profile)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &router,
            request(Method::PUT, "/api/v1/profile", Some(&token), Some(json!({"former_sport": "Futsal"}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["former_sport"], "Futsal");

        for (date, mood) in [("2024-05-01", 4), ("2024-05-02", 7)] {
            let (status, _) = send(
                &router,
                request(
                    Method::POST,
                    "/api/v1/journal",
                    Some(&token),
                    Some(json!({
                        "entry_date": date,
                        "mood_rating": mood,
                        "gratitude_1": "family",
                        "gratitude_2": "sunshine",
                        "gratitude_3": "coffee",
                        "challenge_faced": "training alone",
                        "small_win": "went for a run",
                        "tomorrow_goal": "call my coach"
                    })),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&router, request(Method::GET, "/api/v1/journal/trend", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["average_mood"], 5.5);
        assert_eq!(body["data"]["points"][0]["label"], "May 01");

        let (status, body) = send(&router, request(Method::GET, "/api/v1/dashboard", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["journal_count"], 2);
        assert_eq!(body["data"]["conversation_count"], 0);
        assert_eq!(body["data"]["profile"]["full_name"], "Sam Rivera");
    }

    #[tokio::test]
    async fn career_suggestions_come_from_gateway() {
        let (_dir, server, router) = setup().await;
        let content = json!({"suggestions": [{
            "career_field": "Coaching",
            "reasoning": "You know the game",
            "interest_level": 8,
            "next_steps": "Get a coaching license"
        }]})
        .to_string();
        mock_gateway(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": format!("```json\n{content}\n```")}}]
            })),
            1,
        )
        .await;
        let token = signup(&router, "athlete@example.com").await;

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/career/suggestions",
                Some(&token),
                Some(json!({"former_sport": "Soccer", "career_end_reason": "Injury"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let suggestion = body["data"][0].clone();
        assert_eq!(suggestion["career_field"], "Coaching");

        let (status, body) = send(
            &router,
            request(Method::POST, "/api/v1/career/explorations", Some(&token), Some(suggestion)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "exploring");

        let (_, body) = send(&router, request(Method::GET, "/api/v1/career/explorations", Some(&token), None)).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stories_are_public() {
        let (_dir, _server, router) = setup().await;
        let (status, body) = send(&router, request(Method::GET, "/api/v1/stories", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn change_feed_streams_own_writes() {
        let (_dir, _server, router) = setup().await;
        let token = signup(&router, "athlete@example.com").await;

        let response = router
            .clone()
            .oneshot(request(Method::GET, "/api/v1/changes?table=conversations", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut frames = response.into_body().into_data_stream();

        let (status, body) = send(
            &router,
            request(
                Method::POST,
                "/api/v1/conversations",
                Some(&token),
                Some(json!({"message": "hi", "response": "hello", "sentiment_score": 0.0})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let frame = tokio::time::timeout(Duration::from_secs(5), frames.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.starts_with("event: change\n"), "{text}");
        assert!(text.contains("\"table\":\"conversations\""));
        assert!(text.contains(body["data"]["id"].as_str().unwrap()));
    }
}
