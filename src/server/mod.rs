//! HTTP API powered by axum.
//!
//! Serves:
//! - `POST /debate`                 counter-argument to one user turn
//! - `POST /feedback`               scores for the user's replies
//! - `POST /start-message`          opening statement for a topic
//! - `POST /end-session`            store a finished session
//! - `GET  /topics`                 topic catalog
//! - `GET  /sessions?email=`        a user's sessions, newest first
//! - `GET  /sessions/{id}`          one session
//! - `GET  /sessions/{id}/compare`  session against the one before it
//! - `GET  /dashboard?email=`       dashboard summary
//! - `GET  /profile?email=`         profile summary
//! - `GET  /health`                 health check

mod error;
mod handlers;
pub mod payload;
mod views;

pub use error::ApiError;

use crate::coach::Coach;
use crate::config::ServerConfig;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::response::Json;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for the HTTP API.
#[derive(Clone)]
pub struct AppState {
    pub coach: Arc<Coach>,
}

/// CORS for exactly one browser origin, with credentials.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!("Invalid allowed origin {:?}, CORS disabled: {}", allowed_origin, e);
            CorsLayer::new()
        }
    }
}

/// Build the axum router.
pub fn build_router(state: AppState, allowed_origin: &str) -> Router {
    Router::new()
        .route("/debate", post(handlers::debate))
        .route("/feedback", post(handlers::feedback))
        .route("/start-message", post(handlers::start_message))
        .route("/end-session", post(handlers::end_session))
        .route("/topics", get(views::topics))
        .route("/sessions", get(views::list_sessions))
        .route("/sessions/{id}", get(views::get_session))
        .route("/sessions/{id}/compare", get(views::compare_session))
        .route("/dashboard", get(views::dashboard))
        .route("/profile", get(views::profile))
        .route("/health", get(health_check))
        .layer(cors_layer(allowed_origin))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn start_server(config: &ServerConfig, coach: Arc<Coach>) -> anyhow::Result<()> {
    let app = build_router(AppState { coach }, &config.allowed_origin);
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on http://{}", addr);
    tracing::info!("   Allowed origin: {}", config.allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

/// GET /health
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::helpers::{self, Script, ScriptedGateway};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rstest::rstest;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:3000";

    async fn app_with(gateway: Arc<ScriptedGateway>) -> (Router, Arc<Coach>) {
        let coach = Arc::new(helpers::coach_with(gateway).await);
        let app = build_router(
            AppState {
                coach: coach.clone(),
            },
            ORIGIN,
        );
        (app, coach)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.expect("response");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let (status, body) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_debate_returns_reply() {
        let gateway = ScriptedGateway::replying("However, consider the costs.");
        let (app, _) = app_with(gateway.clone()).await;

        let (status, body) = send(
            app,
            post_json("/debate", json!({"message": "We must colonise Mars", "topic": "Space Exploration"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"reply": "However, consider the costs."}));
        assert!(gateway.last_prompt().unwrap().contains("Topic: Space Exploration"));
    }

    #[tokio::test]
    async fn test_debate_upstream_failure_is_500() {
        let (app, _) = app_with(ScriptedGateway::new(Script::Fail(500))).await;
        let (status, body) = send(app, post_json("/debate", json!({"message": "hi"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Gemini debate failed"}));
    }

    #[rstest]
    #[case("/debate", "message", "Message required")]
    #[case("/feedback", "replies", "Message required")]
    #[case("/start-message", "title", "Title is required")]
    #[tokio::test]
    async fn test_falsy_required_field_is_400(
        #[case] uri: &str,
        #[case] field: &str,
        #[case] message: &str,
        #[values(json!(null), json!(""), json!(0), json!(false))] value: Value,
    ) {
        let gateway = ScriptedGateway::replying("unused");
        let (app, _) = app_with(gateway.clone()).await;

        let (status, body) = send(app.clone(), post_json(uri, json!({ field: value }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": message}));

        let (status, _) = send(app, post_json(uri, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_feedback_parses_fenced_object() {
        let raw = "```json\n{\"grammar\":7,\"clarity\":8,\"confidence\":6,\"average_score\":7,\
                   \"strengths\":[\"a\"],\"weaknesses\":[\"b\"],\"detailed_feedback\":\"ok\"}\n```";
        let (app, _) = app_with(ScriptedGateway::replying(raw)).await;

        let (status, body) = send(
            app,
            post_json("/feedback", json!({"replies": ["first", "second"]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feedback"]["grammar"], 7.0);
        assert_eq!(body["feedback"]["average_score"], 7.0);
        assert_eq!(body["feedback"]["strengths"], json!(["a"]));
        assert_eq!(body["feedback"]["detailed_feedback"], "ok");
    }

    #[tokio::test]
    async fn test_feedback_without_json_surfaces_message() {
        let (app, _) = app_with(ScriptedGateway::replying("I cannot score this.")).await;
        let (status, body) = send(app, post_json("/feedback", json!({"replies": "hello"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "No JSON found in model response"}));
    }

    #[tokio::test]
    async fn test_feedback_upstream_failure_hides_detail() {
        let (app, _) = app_with(ScriptedGateway::new(Script::Fail(403))).await;
        let (status, body) = send(app, post_json("/feedback", json!({"replies": "hello"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Gemini feedback failed"}));
    }

    #[tokio::test]
    async fn test_start_message_fallback() {
        let (app, _) = app_with(ScriptedGateway::new(Script::Reply(None))).await;
        let (status, body) =
            send(app, post_json("/start-message", json!({"title": "Remote Work"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"startMessage": "Failed to generate start message"}));
    }

    #[tokio::test]
    async fn test_end_session_requires_user() {
        let (app, coach) = app_with(ScriptedGateway::replying("")).await;
        let (status, body) =
            send(app, post_json("/end-session", json!({"topic": "x", "duration": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "User data missing."}));
        assert_eq!(coach.sessions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_end_session_then_list() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let payload = json!({
            "topic": "Climate Change Solutions",
            "duration": 95,
            "userReplies": ["Carbon taxes work"],
            "feedback": {"grammar": 6, "clarity": 9, "confidence": 6, "average_score": 1},
            "user": {"name": "Ada", "email": "ada@example.com"}
        });

        let (status, body) = send(app.clone(), post_json("/end-session", payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["saved"]["feedback"]["average_score"], 7.0);
        let id = body["saved"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(app.clone(), get("/sessions?email=ada@example.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sessions"].as_array().unwrap().len(), 1);
        assert_eq!(body["sessions"][0]["id"], id.as_str());
        assert_eq!(body["sessions"][0]["duration"], 95);

        let (status, body) = send(app, get(&format!("/sessions/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["user"]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_end_session_accepts_loose_fields() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let payload = json!({
            "topic": "Space Exploration",
            "duration": 42.7,
            "feedback": {"clarity": 5},
            "user": {"name": "Bo", "email": " bo@example.com "}
        });

        let (status, body) = send(app.clone(), post_json("/end-session", payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"]["duration"], 42);
        assert_eq!(body["saved"]["feedback"], Value::Null);

        let (_, body) = send(app, get("/sessions?email=bo@example.com")).await;
        assert_eq!(body["sessions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_requires_email() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let (status, body) = send(app, get("/sessions")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Email required"}));
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let (status, body) = send(app, get("/sessions/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Session not found"}));
    }

    #[tokio::test]
    async fn test_compare_and_dashboard() {
        let (app, coach) = app_with(ScriptedGateway::replying("")).await;
        let email = "cmp@example.com";
        let oldest = coach
            .end_session(helpers::new_session(email, "2025-01-01T10:00:00Z", (6.0, 6.0, 6.0)))
            .await
            .unwrap();
        let middle = coach
            .end_session(helpers::new_session(email, "2025-01-02T10:00:00Z", (8.0, 8.0, 8.0)))
            .await
            .unwrap();
        coach
            .end_session(helpers::new_session(email, "2025-01-03T10:00:00Z", (10.0, 10.0, 10.0)))
            .await
            .unwrap();

        let (status, body) = send(app.clone(), get(&format!("/sessions/{}/compare", middle.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comparison"]["current"]["id"], middle.id.as_str());
        assert_eq!(body["comparison"]["previous"]["id"], oldest.id.as_str());

        let (_, body) = send(app.clone(), get(&format!("/sessions/{}/compare", oldest.id))).await;
        assert_eq!(body, json!({"comparison": null}));

        let (status, body) = send(app, get(&format!("/dashboard?email={}", email))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["totalSessions"], 3);
        assert_eq!(body["summary"]["averageDisplay"], "8.0/10");
    }

    #[tokio::test]
    async fn test_profile_for_unknown_user_is_empty() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let (status, body) = send(app, get("/profile?email=nobody@example.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["profile"]["totalSessions"], 0);
        assert_eq!(body["profile"]["averages"], Value::Null);
    }

    #[tokio::test]
    async fn test_topics_catalog() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let (status, body) = send(app, get("/topics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["topics"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;
        let req = Request::builder()
            .method("POST")
            .uri("/debate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/debate")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn test_cors_allows_only_configured_origin() {
        let (app, _) = app_with(ScriptedGateway::replying("")).await;

        let resp = app.clone().oneshot(preflight(ORIGIN)).await.expect("response");
        let headers = resp.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );

        let resp = app.oneshot(preflight("http://evil.example")).await.expect("response");
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
