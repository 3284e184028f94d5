//! Chat API
//!
//! Request handlers behind the host application's chat widget. Each chat
//! turn is one synchronous round trip: validate, snapshot the session's
//! context window, call the Gemini API, append the exchange, and report the
//! running token estimate back to the widget.
//!
//! Locks are never held across the outbound call: handlers snapshot under a
//! lock, await the API, then re-acquire to append.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::utils::validate_message;
use crate::assistant::{quick_suggestions, ChatRole, ChatTurn, UserProfile};
use crate::error::AppError;
use crate::state::{AppState, SharedState};

/// Request body for a single chat turn
#[derive(Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,
    /// Optional session ID for maintaining context
    /// If absent, a new session is created and its ID returned
    #[serde(default)]
    pub session_id: Option<String>,
    /// The user's mapped career profile, inlined into the system prompt
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// Response body for a single chat turn
#[derive(Serialize)]
pub struct ChatResponse {
    /// The assistant's reply
    pub reply: String,
    /// The session ID (same as input or newly generated)
    pub session_id: String,
    /// Estimated tokens consumed by this session so far
    pub tokens_used: u64,
    /// The session's token budget
    pub token_budget: u64,
    /// Whether the session has crossed its token budget
    pub over_budget: bool,
    /// Present when the budget is crossed; recommends clearing the history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// A session's history and token usage
#[derive(Serialize)]
pub struct SessionHistoryResponse {
    /// The session ID
    pub session_id: String,
    /// All turns in order
    pub turns: Vec<ChatTurn>,
    /// Estimated tokens consumed by this session so far
    pub tokens_used: u64,
    /// The session's token budget
    pub token_budget: u64,
    /// Whether the session has crossed its token budget
    pub over_budget: bool,
}

/// Response body after clearing a session
#[derive(Serialize)]
pub struct ClearSessionResponse {
    /// The session ID
    pub session_id: String,
    /// Always true on success
    pub cleared: bool,
    /// Token counter after the clear (always zero)
    pub tokens_used: u64,
}

/// Query parameters for the quick-suggestion endpoint
#[derive(Deserialize)]
pub struct SuggestionParams {
    /// Occupation to tailor the first suggestion to
    #[serde(default)]
    pub occupation: Option<String>,
}

/// Quick-suggestion list for an empty chat
#[derive(Serialize)]
pub struct SuggestionsResponse {
    /// Starter questions the widget offers as buttons
    pub suggestions: Vec<String>,
}

/// Handle one chat turn
///
/// Returns 503 when the assistant capability was not acquired at startup,
/// 400 for an empty or oversized message, and upstream-mapped errors (429,
/// 502, 504) when the Gemini call fails. A failed call leaves the session
/// registry untouched: no session is created and no turns are appended,
/// so the user can simply retry.
pub async fn chat(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    validate_message(&request.message)?;

    let session_id = request
        .session_id
        .unwrap_or_else(AppState::generate_session_id);
    let profile = request.profile.unwrap_or_default();

    // Snapshot under the lock, then release it for the outbound call.
    // Nothing is created here: a session only comes into existence once an
    // exchange succeeds, so failed calls cannot grow the registry.
    let (assistant, history) = {
        let state = state.read().await;
        let assistant = state.assistant().ok_or_else(|| {
            AppError::AssistantUnavailable(
                "the Gemini API key is not configured; verify GEMINI_API_KEY".to_string(),
            )
        })?;
        let pairs = assistant.context_window_pairs();
        let history: Vec<ChatTurn> = state
            .session(&session_id)
            .map(|session| session.context_window(pairs).to_vec())
            .unwrap_or_default();
        (assistant, history)
    };

    info!(
        session_id = %session_id,
        message_len = request.message.len(),
        "Chat turn received"
    );

    let reply = assistant.chat(&profile, &history, &request.message).await?;

    let mut state = state.write().await;
    let session = state.session_mut(&session_id);
    session.push(ChatRole::User, request.message);
    session.push(ChatRole::Model, reply.clone());

    let tokens_used = session.tokens_used();
    let token_budget = session.token_budget();
    let over_budget = session.over_budget();

    if over_budget {
        tracing::warn!(
            session_id = %session_id,
            tokens_used = tokens_used,
            token_budget = token_budget,
            "Session crossed its token budget"
        );
    }

    Ok(Json(ChatResponse {
        reply,
        session_id,
        tokens_used,
        token_budget,
        over_budget,
        notice: over_budget.then(|| {
            format!(
                "This conversation has used roughly {} of its {} token budget. \
                 Clear the chat history to keep costs down.",
                tokens_used, token_budget
            )
        }),
    }))
}

/// Get a session's history and token usage
pub async fn get_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionHistoryResponse>, AppError> {
    let state = state.read().await;
    let session = state
        .session(&session_id)
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;

    Ok(Json(SessionHistoryResponse {
        session_id,
        turns: session.turns().to_vec(),
        tokens_used: session.tokens_used(),
        token_budget: session.token_budget(),
        over_budget: session.over_budget(),
    }))
}

/// Clear a session's history and reset its token counter to zero
pub async fn clear_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearSessionResponse>, AppError> {
    let mut state = state.write().await;
    if !state.clear_session(&session_id) {
        return Err(AppError::SessionNotFound(session_id));
    }

    info!(session_id = %session_id, "Chat history cleared");

    Ok(Json(ClearSessionResponse {
        session_id,
        cleared: true,
        tokens_used: 0,
    }))
}

/// List starter questions for an empty chat
///
/// Works whether or not the assistant is available; the widget decides what
/// to render.
pub async fn suggestions(
    Query(params): Query<SuggestionParams>,
) -> Json<SuggestionsResponse> {
    // Same fallback occupation the job-search surfaces use; the prompt
    // profile keeps its own "Unknown" default.
    let occupation = params
        .occupation
        .unwrap_or_else(|| "Data Scientist".to_string());
    Json(SuggestionsResponse {
        suggestions: quick_suggestions(&occupation),
    })
}
