//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.
//! There are deliberately no fatal variants: every failure degrades to an error
//! response or "assistant unavailable" while the host application keeps running.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// The assistant feature failed to load at startup and is disabled
    #[error("Career assistant is unavailable: {0}")]
    AssistantUnavailable(String),

    /// Chat request was malformed (empty message, oversized message, ...)
    #[error("Invalid chat request: {0}")]
    InvalidChatRequest(String),

    /// Chat session with the given ID was not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The Gemini endpoint rejected the API key; user should verify it
    #[error("Gemini API rejected the request (HTTP {status}): {message}. Verify that GEMINI_API_KEY is valid")]
    ApiKeyRejected {
        /// HTTP status returned by the endpoint
        status: u16,
        /// Error body returned by the endpoint
        message: String,
    },

    /// The Gemini endpoint rate-limited us
    #[error("Gemini API rate limit exceeded: {0}")]
    RateLimited(String),

    /// The Gemini endpoint returned an error or an unusable response
    #[error("Gemini API error: {0}")]
    Upstream(String),

    /// The prompt was blocked by the endpoint's safety filters
    #[error("Gemini API blocked the prompt: {0}")]
    PromptBlocked(String),

    /// The outbound call did not complete within the configured timeout
    #[error("Gemini API call timed out: {0}")]
    Timeout(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AssistantUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::InvalidChatRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::SessionNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::ApiKeyRejected { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::Upstream(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::PromptBlocked(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
