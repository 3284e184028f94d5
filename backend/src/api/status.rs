//! Status API
//!
//! Reports feature availability so the host application can decide whether
//! to render the chat widget at all. The API key itself is never included.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::SharedState;

/// Feature availability and configuration status
#[derive(Serialize)]
pub struct StatusResponse {
    /// Whether the assistant capability was acquired at startup
    pub assistant_available: bool,
    /// Whether a usable API key is configured
    pub key_configured: bool,
    /// The configured model name
    pub model: String,
    /// Per-session token budget
    pub token_budget: u64,
    /// Number of chat sessions currently in memory
    pub session_count: usize,
}

/// Report assistant availability and configuration status
pub async fn status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let state = state.read().await;
    Json(StatusResponse {
        assistant_available: state.assistant_available(),
        key_configured: state.config.gemini.key_configured(),
        model: state.config.gemini.model.clone(),
        token_budget: state.config.gemini.session_token_budget,
        session_count: state.session_count(),
    })
}
