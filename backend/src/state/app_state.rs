//! Application state
//!
//! One instance lives behind an `Arc<RwLock<...>>` for the whole process.
//! The assistant handle is set once at startup by the capability loader and
//! never mutated afterwards; only the session registry changes at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assistant::{CareerAssistant, ChatSession};
use crate::config::Config;

/// Shared application state used by all request handlers
pub type SharedState = Arc<RwLock<AppState>>;

/// Main application state
pub struct AppState {
    /// Immutable application configuration
    pub config: Config,
    assistant: Option<Arc<CareerAssistant>>,
    sessions: HashMap<String, ChatSession>,
}

impl AppState {
    /// Create application state with the capability acquisition outcome
    pub fn new(config: Config, assistant: Option<CareerAssistant>) -> Self {
        Self {
            config,
            assistant: assistant.map(Arc::new),
            sessions: HashMap::new(),
        }
    }

    /// Whether the assistant capability was acquired at startup
    ///
    /// This is the process-wide availability flag: decided once, read on
    /// every chat request, never flipped afterwards.
    pub fn assistant_available(&self) -> bool {
        self.assistant.is_some()
    }

    /// Get a handle to the assistant, if available
    pub fn assistant(&self) -> Option<Arc<CareerAssistant>> {
        self.assistant.clone()
    }

    /// Generate a new unique session ID
    pub fn generate_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Get a mutable reference to a session, creating it if missing
    pub fn session_mut(&mut self, id: &str) -> &mut ChatSession {
        let budget = self.config.gemini.session_token_budget;
        self.sessions
            .entry(id.to_string())
            .or_insert_with(|| ChatSession::new(id.to_string(), budget))
    }

    /// Get a session by ID
    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.get(id)
    }

    /// Clear a session's history and token counter
    ///
    /// Returns false if the session does not exist.
    pub fn clear_session(&mut self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(session) => {
                session.clear();
                true
            }
            None => false,
        }
    }

    /// Number of sessions currently held in memory
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
