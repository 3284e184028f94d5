//! Career assistant module
//!
//! Everything chat-related lives here: the guarded capability loader, the
//! Gemini HTTP client, prompt construction, per-session history, and token
//! budget tracking.

pub mod capability;
pub mod client;
pub mod prompt;
pub mod session;
pub mod tokens;
pub mod types;

pub use capability::{acquire, CapabilityError};
pub use client::CareerAssistant;
pub use prompt::{quick_suggestions, UserProfile};
pub use session::{ChatRole, ChatSession, ChatTurn};
pub use tokens::TokenMonitor;
