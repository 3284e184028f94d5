//! Application state management
//!
//! Holds the acquired assistant capability (if any), the immutable
//! configuration, and the in-memory chat session registry.

pub mod app_state;

pub use app_state::{AppState, SharedState};
