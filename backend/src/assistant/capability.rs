//! Guarded acquisition of the assistant capability
//!
//! The chat feature is optional: `acquire` is called exactly once at startup
//! and any failure degrades to "assistant unavailable" instead of stopping
//! the host application. After startup the outcome is only ever read as a
//! boolean availability flag.

use thiserror::Error;
use tracing::info;

use crate::assistant::client::CareerAssistant;
use crate::config::GeminiConfig;

/// Why the assistant capability could not be acquired
#[derive(Error, Debug)]
pub enum CapabilityError {
    /// No usable API key was configured
    #[error("Gemini API key is missing or still the setup placeholder")]
    ApiKeyNotConfigured,

    /// The configured model name is empty
    #[error("Gemini model name is empty")]
    EmptyModel,

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Try to acquire the career assistant capability
///
/// Validates the configuration and builds the shared HTTP client. Callers
/// must not propagate the error beyond startup: the contract is to log a
/// warning, leave the feature disabled, and keep serving everything else.
pub fn acquire(config: &GeminiConfig) -> Result<CareerAssistant, CapabilityError> {
    if !config.key_configured() {
        return Err(CapabilityError::ApiKeyNotConfigured);
    }
    if config.model.is_empty() {
        return Err(CapabilityError::EmptyModel);
    }

    let assistant = CareerAssistant::new(config.clone())?;

    info!(
        model = %config.model,
        timeout_secs = config.timeout_secs,
        "Career assistant capability acquired"
    );

    Ok(assistant)
}
