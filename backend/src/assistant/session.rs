//! Chat session state
//!
//! Defines the per-session conversation history: an ordered sequence of
//! turns scoped to one user session, appended to on each exchange and
//! cleared only by an explicit reset. Sessions live in memory; nothing is
//! persisted across restarts.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::assistant::tokens::TokenMonitor;

/// Number of user/model pairs kept as context for the outbound request
pub const CONTEXT_WINDOW_PAIRS: usize = 3;

/// Role of a chat turn, matching the Gemini wire roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Turn authored by the user
    User,
    /// Turn authored by the model
    Model,
}

impl ChatRole {
    /// Convert the role to its wire string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// A single turn in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who authored the turn
    pub role: ChatRole,
    /// The turn text
    pub text: String,
    /// When the turn was recorded (Unix timestamp)
    pub created_at: i64,
}

impl ChatTurn {
    /// Create a new turn stamped with the current time
    pub fn new(role: ChatRole, text: String) -> Self {
        Self {
            role,
            text,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// One user's conversation with the assistant
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// Unique identifier for the session
    pub id: String,
    turns: Vec<ChatTurn>,
    monitor: TokenMonitor,
    /// When the session was created (Unix timestamp)
    pub created_at: i64,
}

impl ChatSession {
    /// Create an empty session with the given ID and token budget
    pub fn new(id: String, token_budget: u64) -> Self {
        Self {
            id,
            turns: Vec::new(),
            monitor: TokenMonitor::new(token_budget),
            created_at: Utc::now().timestamp(),
        }
    }

    /// All turns in order
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Append one turn and record its estimated token cost
    pub fn push(&mut self, role: ChatRole, text: String) {
        self.monitor.record(&text);
        self.turns.push(ChatTurn::new(role, text));
    }

    /// The trailing turns sent as context with the next request
    ///
    /// Keeps at most `pairs` user/model pairs so long conversations do not
    /// inflate the per-request token cost (matching the platform's
    /// context-window policy).
    pub fn context_window(&self, pairs: usize) -> &[ChatTurn] {
        let max_turns = pairs * 2;
        if self.turns.len() <= max_turns {
            &self.turns
        } else {
            &self.turns[self.turns.len() - max_turns..]
        }
    }

    /// Estimated tokens consumed by this session so far
    pub fn tokens_used(&self) -> u64 {
        self.monitor.total()
    }

    /// The session's token budget
    pub fn token_budget(&self) -> u64 {
        self.monitor.budget()
    }

    /// Whether the session has crossed its token budget
    pub fn over_budget(&self) -> bool {
        self.monitor.over_budget()
    }

    /// Clear the history and reset the token counter to zero
    pub fn clear(&mut self) {
        self.turns.clear();
        self.monitor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ChatSession {
        ChatSession::new("test-session".to_string(), 2000)
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = session();
        assert!(session.turns().is_empty());
        assert_eq!(session.tokens_used(), 0);
        assert!(!session.over_budget());
    }

    #[test]
    fn test_push_appends_in_order() {
        let mut session = session();
        session.push(ChatRole::User, "what jobs fit me?".to_string());
        session.push(ChatRole::Model, "here are three roles".to_string());
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0].role, ChatRole::User);
        assert_eq!(session.turns()[1].role, ChatRole::Model);
    }

    #[test]
    fn test_tokens_accumulate_per_exchange() {
        let mut session = session();
        let mut last = 0;
        for i in 0..5 {
            session.push(ChatRole::User, format!("question number {}", i));
            session.push(ChatRole::Model, "a short answer".to_string());
            assert!(session.tokens_used() >= last);
            last = session.tokens_used();
        }
        assert!(last > 0);
    }

    #[test]
    fn test_context_window_keeps_trailing_pairs() {
        let mut session = session();
        for i in 0..10 {
            session.push(ChatRole::User, format!("q{}", i));
            session.push(ChatRole::Model, format!("a{}", i));
        }
        let window = session.context_window(CONTEXT_WINDOW_PAIRS);
        assert_eq!(window.len(), CONTEXT_WINDOW_PAIRS * 2);
        assert_eq!(window[0].text, "q7");
        assert_eq!(window[5].text, "a9");
    }

    #[test]
    fn test_context_window_short_history_untruncated() {
        let mut session = session();
        session.push(ChatRole::User, "hello".to_string());
        assert_eq!(session.context_window(CONTEXT_WINDOW_PAIRS).len(), 1);
    }

    #[test]
    fn test_clear_resets_history_and_tokens() {
        let mut session = ChatSession::new("s".to_string(), 10);
        session.push(ChatRole::User, "x".repeat(200));
        assert!(session.over_budget());
        session.clear();
        assert!(session.turns().is_empty());
        assert_eq!(session.tokens_used(), 0);
        assert!(!session.over_budget());
    }
}
