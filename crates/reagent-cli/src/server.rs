//! HTTP gateway — REST endpoints over per-session agents.
//!
//! # Routes
//!
//! - `GET  /`        — health check
//! - `POST /chat`    — process a chat message `{message, session_id?}`
//! - `POST /reset`   — reset a session's conversation `{session_id?}`
//! - `GET  /tools`   — list registered capabilities
//! - `GET  /history` — conversation history for a session (`?session_id=`)
//!
//! One agent per session key, created lazily and held in process memory.
//! Each agent sits behind a `tokio::sync::Mutex`, so at most one chat call
//! is in flight per session at a time; distinct sessions run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use reagent_agent::{builtin_registry, Agent, CapabilityRegistry};
use reagent_core::config::Config;
use reagent_providers::{CompletionConfig, CompletionProvider, OpenRouterProvider};

/// Default session key when a request doesn't name one.
const DEFAULT_SESSION: &str = "default";

/// Body of the sanitized 500 sent when a turn fails — the raw provider
/// error is logged server-side, never returned to the client.
const SANITIZED_ERROR_RESPONSE: &str =
    "An error occurred while processing your message. Please try again.";

// ─────────────────────────────────────────────
// Session store
// ─────────────────────────────────────────────

/// Lazily-populated map from session key to its agent.
///
/// Lives entirely in process memory; sessions disappear on restart.
pub struct SessionStore {
    provider: Arc<dyn CompletionProvider>,
    capabilities: Arc<CapabilityRegistry>,
    model: String,
    request_config: CompletionConfig,
    agents: RwLock<HashMap<String, Arc<Mutex<Agent>>>>,
}

impl SessionStore {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        capabilities: Arc<CapabilityRegistry>,
        model: String,
        request_config: CompletionConfig,
    ) -> Self {
        Self {
            provider,
            capabilities,
            model,
            request_config,
            agents: RwLock::new(HashMap::new()),
        }
    }

    /// Get the agent for a session, creating it on first use.
    pub async fn get_or_create(&self, key: &str) -> Arc<Mutex<Agent>> {
        let mut agents = self.agents.write().await;
        agents
            .entry(key.to_string())
            .or_insert_with(|| {
                info!(session = key, "creating agent");
                Arc::new(Mutex::new(Agent::new(
                    self.provider.clone(),
                    self.capabilities.clone(),
                    Some(self.model.clone()),
                    Some(self.request_config.clone()),
                )))
            })
            .clone()
    }

    /// Get an existing session's agent without creating one.
    pub async fn get(&self, key: &str) -> Option<Arc<Mutex<Agent>>> {
        self.agents.read().await.get(key).cloned()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }
}

// ─────────────────────────────────────────────
// App state + router
// ─────────────────────────────────────────────

/// Shared application state for the HTTP gateway.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub capabilities: Arc<CapabilityRegistry>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        capabilities: Arc<CapabilityRegistry>,
        model: String,
        request_config: CompletionConfig,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(
            provider,
            capabilities.clone(),
            model,
            request_config,
        ));
        Self {
            sessions,
            capabilities,
            started_at: Utc::now(),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/chat", post(chat_handler))
        .route("/reset", post(reset_handler))
        .route("/tools", get(tools_handler))
        .route("/history", get(history_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the gateway until the process is stopped.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let provider = OpenRouterProvider::new(&config.provider, &config.agent.model)?;
    let request_config = CompletionConfig {
        max_tokens: config.agent.max_tokens,
        temperature: config.agent.temperature,
    };

    let state = AppState::new(
        Arc::new(provider),
        Arc::new(builtin_registry()),
        config.agent.model.clone(),
        request_config,
    );
    let app = app_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, model = %config.agent.model, "gateway listening");

    axum::serve(listener, app).await?;
    Ok(())
}

// ─────────────────────────────────────────────
// Request types
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: Option<String>,
    session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResetRequest {
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    session_id: Option<String>,
}

// ─────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────

/// GET / — health check.
async fn home_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "running",
        "service": "reagent",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": (Utc::now() - state.started_at).num_seconds(),
    }))
}

/// POST /chat — process a chat message on the session's agent.
async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let message = match request.message {
        Some(m) => m,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Missing 'message' in request body"})),
            )
                .into_response()
        }
    };
    let session_id = request
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let agent = state.sessions.get_or_create(&session_id).await;
    let result = agent.lock().await.process_message(&message).await;

    if let Some(detail) = &result.error {
        // Log the detail for operators; the client gets a sanitized body
        error!(session = %session_id, error = %detail, "agent turn failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "response": SANITIZED_ERROR_RESPONSE,
                "tool_used": null,
                "tool_result": null,
            })),
        )
            .into_response();
    }

    Json(result).into_response()
}

/// POST /reset — reset a session's conversation.
async fn reset_handler(
    State(state): State<AppState>,
    request: Option<Json<ResetRequest>>,
) -> impl IntoResponse {
    let session_id = request
        .and_then(|Json(r)| r.session_id)
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    match state.sessions.get(&session_id).await {
        Some(agent) => {
            agent.lock().await.reset();
            Json(json!({
                "status": "success",
                "message": format!("Conversation reset for session: {session_id}"),
            }))
        }
        None => Json(json!({
            "status": "success",
            "message": "No active session to reset",
        })),
    }
}

/// GET /tools — list registered capabilities.
async fn tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.capabilities.descriptors() }))
}

/// GET /history — conversation history for a session.
async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let session_id = query
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let history = match state.sessions.get(&session_id).await {
        Some(agent) => agent.lock().await.history(),
        None => Vec::new(),
    };

    Json(json!({
        "session_id": session_id,
        "history": history,
    }))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Mutex as StdMutex;
    use tower::ServiceExt;

    use reagent_core::types::Message;
    use reagent_providers::ProviderError;

    /// Scripted mock provider, same pattern as the agent tests.
    struct MockProvider {
        replies: StdMutex<Vec<Result<String, ProviderError>>>,
    }

    impl MockProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: StdMutex::new(replies),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            _model: &str,
            _config: &CompletionConfig,
        ) -> Result<String, ProviderError> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok("(no more scripted replies)".to_string())
            } else {
                replies.remove(0)
            }
        }

        fn default_model(&self) -> &str {
            "mock-model"
        }

        fn display_name(&self) -> &str {
            "MockProvider"
        }
    }

    fn make_state(replies: Vec<Result<String, ProviderError>>) -> AppState {
        AppState::new(
            Arc::new(MockProvider::new(replies)),
            Arc::new(builtin_registry()),
            "mock-model".to_string(),
            CompletionConfig::default(),
        )
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_home_endpoint() {
        let app = app_router(make_state(vec![]));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "running");
        assert_eq!(json["service"], "reagent");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_tools_endpoint() {
        let app = app_router(make_state(vec![]));

        let request = Request::builder().uri("/tools").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let tools = json["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], "run_shell");
        assert!(tools[0]["parameters"].is_string());
    }

    #[tokio::test]
    async fn test_chat_missing_message() {
        let app = app_router(make_state(vec![]));

        let response = app
            .oneshot(json_post("/chat", json!({"session_id": "s1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing 'message' in request body");
    }

    #[tokio::test]
    async fn test_chat_plain_reply() {
        let app = app_router(make_state(vec![Ok("Hi there!".to_string())]));

        let response = app
            .oneshot(json_post("/chat", json!({"message": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["response"], "Hi there!");
        assert!(json["tool_used"].is_null());
        assert!(json["tool_result"].is_null());
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_chat_turn_failure_is_sanitized() {
        let app = app_router(make_state(vec![Err(ProviderError::Api {
            status: 503,
            body: "secret upstream detail".into(),
        })]));

        let response = app
            .oneshot(json_post("/chat", json!({"message": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["response"], SANITIZED_ERROR_RESPONSE);
        assert!(json["tool_used"].is_null());
        // The provider detail never reaches the client
        assert!(!json.to_string().contains("secret upstream detail"));
    }

    #[tokio::test]
    async fn test_chat_sessions_are_independent() {
        let state = make_state(vec![Ok("a".to_string()), Ok("b".to_string())]);
        let app = app_router(state.clone());

        let _ = app
            .clone()
            .oneshot(json_post("/chat", json!({"message": "one", "session_id": "s1"})))
            .await
            .unwrap();
        let _ = app
            .oneshot(json_post("/chat", json!({"message": "two", "session_id": "s2"})))
            .await
            .unwrap();

        assert_eq!(state.sessions.len().await, 2);
        let s1 = state.sessions.get("s1").await.unwrap();
        assert_eq!(s1.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_unknown_session() {
        let app = app_router(make_state(vec![]));

        let response = app
            .oneshot(json_post("/reset", json!({"session_id": "ghost"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "No active session to reset");
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let state = make_state(vec![Ok("reply".to_string())]);
        let app = app_router(state.clone());

        let _ = app
            .clone()
            .oneshot(json_post("/chat", json!({"message": "hi", "session_id": "s1"})))
            .await
            .unwrap();

        let response = app
            .oneshot(json_post("/reset", json!({"session_id": "s1"})))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("Conversation reset for session: s1"));

        let agent = state.sessions.get("s1").await.unwrap();
        assert!(agent.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_history_unknown_session_is_empty() {
        let app = app_router(make_state(vec![]));

        let request = Request::builder()
            .uri("/history?session_id=nobody")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["session_id"], "nobody");
        assert_eq!(json["history"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_history_after_chat() {
        let state = make_state(vec![Ok("Hi!".to_string())]);
        let app = app_router(state);

        let _ = app
            .clone()
            .oneshot(json_post("/chat", json!({"message": "Hello", "session_id": "s1"})))
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/history?session_id=s1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let json = body_json(response).await;
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["role"], "user");
        assert_eq!(history[0]["content"], "Hello");
        assert_eq!(history[1]["role"], "assistant");
    }
}
