//! Chat endpoints.
//!
//! Request:  `POST /chat {"message": "hello", "session_id": "optional"}`
//! Response: `{"reply": "...", "session_id": "...", "mode": "Intent-based"}`
//! Error:    `{"error": "..."}`
//!
//! Omitting `session_id` starts a new conversation; reuse the returned id to
//! keep history.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use amina_agent::{ChatMode, Chatbot, ChatbotStatus, QuickAction};

use crate::app::AppState;

/// Messages longer than this are rejected before reaching the chatbot.
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
    pub mode: ChatMode,
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct ModeRequest {
    pub session_id: String,
    pub hosted: bool,
}

#[derive(Serialize)]
pub struct StatusReply {
    pub session_id: String,
    #[serde(flatten)]
    pub status: ChatbotStatus,
}

#[derive(Serialize)]
pub struct ChatError {
    pub error: String,
}

type ApiError = (StatusCode, Json<ChatError>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ChatError {
            error: message.into(),
        }),
    )
}

/// POST /chat
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if req.message.chars().count() > MAX_MESSAGE_CHARS {
        warn!("message too long, rejected");
        return Err(error(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("message exceeds {MAX_MESSAGE_CHARS} characters"),
        ));
    }

    let session = state
        .sessions
        .get_or_create(req.session_id.as_deref(), &state.factory);
    debug!(session = %session.id, "chat turn");
    let mut bot = session.chatbot.lock().await;
    let reply = bot.get_response(&req.message).await;

    Ok(Json(ChatReply {
        reply,
        session_id: session.id.clone(),
        mode: bot.mode(),
    }))
}

/// POST /chat/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    with_session(&state, &req.session_id, |bot| {
        bot.reset_conversation();
    })
    .await
}

/// POST /chat/mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    with_session(&state, &req.session_id, |bot| {
        bot.toggle_mode(req.hosted);
    })
    .await
}

/// GET /chat/status?session_id=
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Query(req): Query<SessionRequest>,
) -> Result<Json<StatusReply>, ApiError> {
    with_session(&state, &req.session_id, |_| {}).await
}

/// GET /chat/quick-actions
pub async fn quick_actions_handler() -> Json<&'static [QuickAction]> {
    Json(Chatbot::quick_actions())
}

/// GET /chat/suggestions
pub async fn suggestions_handler() -> Json<&'static [&'static str]> {
    Json(Chatbot::suggested_questions())
}

async fn with_session(
    state: &AppState,
    session_id: &str,
    apply: impl FnOnce(&mut Chatbot),
) -> Result<Json<StatusReply>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("unknown session '{session_id}'")))?;
    let mut bot = session.chatbot.lock().await;
    apply(&mut *bot);
    Ok(Json(StatusReply {
        session_id: session.id.clone(),
        status: bot.status(),
    }))
}
