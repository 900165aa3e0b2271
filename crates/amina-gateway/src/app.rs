use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use amina_agent::ChatbotFactory;
use amina_core::config::AminaConfig;

use crate::sessions::SessionRegistry;

/// Shared state handed to every Axum handler as `Arc<AppState>`.
pub struct AppState {
    pub config: AminaConfig,
    pub factory: ChatbotFactory,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: AminaConfig, factory: ChatbotFactory) -> Self {
        let sessions = SessionRegistry::new(
            config.gateway.session_ttl_secs,
            config.gateway.max_sessions,
        );
        Self {
            config,
            factory,
            sessions,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/chat", post(crate::http::chat::chat_handler))
        .route("/chat/reset", post(crate::http::chat::reset_handler))
        .route("/chat/mode", post(crate::http::chat::mode_handler))
        .route("/chat/status", get(crate::http::chat::status_handler))
        .route(
            "/chat/quick-actions",
            get(crate::http::chat::quick_actions_handler),
        )
        .route(
            "/chat/suggestions",
            get(crate::http::chat::suggestions_handler),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amina_agent::provider::{ChatRequest, ChatResponse, LlmProvider, ProviderError, Role};
    use amina_core::KnowledgeStore;
    use amina_intent::FixedIndex;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    struct AlwaysOk;

    #[async_trait]
    impl LlmProvider for AlwaysOk {
        fn name(&self) -> &str {
            "always-ok"
        }
        async fn send(&self, _req: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            Ok(ChatResponse {
                content: "hosted answer".to_string(),
                ..ChatResponse::default()
            })
        }
    }

    /// Sleeps before answering and records the roles each request carried.
    #[derive(Default)]
    struct Slow {
        seen: Mutex<Vec<Vec<Role>>>,
    }

    #[async_trait]
    impl LlmProvider for Slow {
        fn name(&self) -> &str {
            "slow"
        }
        async fn send(&self, req: &ChatRequest) -> Result<ChatResponse, ProviderError> {
            self.seen
                .lock()
                .unwrap()
                .push(req.messages.iter().map(|m| m.role).collect());
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(ChatResponse {
                content: "slow answer".to_string(),
                ..ChatResponse::default()
            })
        }
    }

    fn state(provider: Option<Arc<dyn LlmProvider>>) -> Arc<AppState> {
        let config = AminaConfig::default();
        let factory = ChatbotFactory::new(
            Arc::new(KnowledgeStore::embedded().unwrap()),
            &config,
            provider,
            Arc::new(FixedIndex(0)),
        )
        .unwrap();
        Arc::new(AppState::new(config, factory))
    }

    async fn call(router: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = call(build_router(state(None)), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["hosted_available"], false);
        assert!(body["context_tokens"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn chat_creates_session_and_answers() {
        let state = state(None);
        let (status, body) = call(
            build_router(state.clone()),
            post_json("/chat", json!({ "message": "What services do you offer?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"].as_str().unwrap().contains("/solutions"));
        assert_eq!(body["mode"], "Intent-based");
        assert!(!body["session_id"].as_str().unwrap().is_empty());
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn empty_message_gets_default_reply() {
        let (status, body) = call(
            build_router(state(None)),
            post_json("/chat", json!({ "message": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reply = body["reply"].as_str().unwrap();
        for link in ["/solutions", "/about", "/realisation", "/contact"] {
            assert!(reply.contains(link));
        }
    }

    #[tokio::test]
    async fn oversized_message_is_rejected() {
        let long = "a".repeat(crate::http::chat::MAX_MESSAGE_CHARS + 1);
        let (status, body) = call(
            build_router(state(None)),
            post_json("/chat", json!({ "message": long })),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].as_str().unwrap().contains("exceeds"));
    }

    #[tokio::test]
    async fn hosted_session_lifecycle() {
        let state = state(Some(Arc::new(AlwaysOk)));
        let router = build_router(state.clone());

        let (_, body) = call(
            router.clone(),
            post_json("/chat", json!({ "message": "hi", "session_id": "s1" })),
        )
        .await;
        assert_eq!(body["reply"], "hosted answer");
        assert_eq!(body["session_id"], "s1");

        let (status, body) = call(router.clone(), get("/chat/status?session_id=s1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "Hosted-model");
        assert_eq!(body["stats"]["conversation_length"], 2);

        let (_, body) = call(
            router.clone(),
            post_json("/chat/mode", json!({ "session_id": "s1", "hosted": false })),
        )
        .await;
        assert_eq!(body["mode"], "Intent-based");

        let (_, body) = call(
            router.clone(),
            post_json("/chat/reset", json!({ "session_id": "s1" })),
        )
        .await;
        assert_eq!(body["stats"]["conversation_length"], 0);
        assert_eq!(body["session_id"], "s1");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (status, body) = call(
            build_router(state(None)),
            post_json("/chat/reset", json!({ "session_id": "ghost" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn enabling_hosted_without_provider_is_refused() {
        let state = state(None);
        let router = build_router(state.clone());
        call(
            router.clone(),
            post_json("/chat", json!({ "message": "hello", "session_id": "s2" })),
        )
        .await;
        let (status, body) = call(
            router,
            post_json("/chat/mode", json!({ "session_id": "s2", "hosted": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "Intent-based");
        assert_eq!(body["hosted_available"], false);
    }

    #[tokio::test]
    async fn menus_are_served() {
        let router = build_router(state(None));
        let (_, actions) = call(router.clone(), get("/chat/quick-actions")).await;
        assert_eq!(actions.as_array().unwrap().len(), 4);
        assert_eq!(actions[0]["label"], "📅 Book a Meeting");

        let (_, suggestions) = call(router, get("/chat/suggestions")).await;
        assert_eq!(suggestions[0], "What services do you offer?");
    }

    #[tokio::test]
    async fn concurrent_turns_in_one_session_are_serialized() {
        let slow = Arc::new(Slow::default());
        let state = state(Some(slow.clone() as Arc<dyn LlmProvider>));
        let router = build_router(state.clone());

        let first = post_json("/chat", json!({ "message": "first", "session_id": "s3" }));
        let second = post_json("/chat", json!({ "message": "second", "session_id": "s3" }));
        let ((s1, b1), (s2, b2)) =
            tokio::join!(call(router.clone(), first), call(router.clone(), second));
        assert_eq!(s1, StatusCode::OK);
        assert_eq!(s2, StatusCode::OK);
        assert_eq!(b1["reply"], "slow answer");
        assert_eq!(b2["reply"], "slow answer");

        // the second turn saw the first one completed
        let seen = slow.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], vec![Role::User]);
        assert_eq!(seen[1], vec![Role::User, Role::Assistant, Role::User]);

        let session = state.sessions.get("s3").unwrap();
        let bot = session.chatbot.lock().await;
        let roles: Vec<Role> = bot.history().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }
}
