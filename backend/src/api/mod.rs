//! API module
//!
//! Contains HTTP request handlers for the chat widget endpoints

pub mod chat;
pub mod status;
pub mod utils;
