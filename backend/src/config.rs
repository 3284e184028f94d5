//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Loaded once at process start and immutable
//! afterwards; handlers receive it through application state instead of
//! reading module-level globals.

use std::env;

/// Placeholder value shipped in setup instructions; treated the same as no key
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini API configuration
    pub gemini: GeminiConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for the generative language endpoint
    pub api_key: String,
    /// Model name (e.g. "gemini-flash-latest")
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum tokens the model may generate per reply
    pub max_output_tokens: u32,
    /// Per-session token budget before a history reset is recommended
    pub session_token_budget: u64,
}

// Manual Debug so the API key cannot leak into logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("session_token_budget", &self.session_token_budget)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-flash-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
            max_output_tokens: 800,
            session_token_budget: 2000,
        }
    }
}

impl GeminiConfig {
    /// Whether a usable API key has been provided
    ///
    /// An empty key or the placeholder from the setup instructions both count
    /// as "not configured"; the assistant feature stays disabled in that case.
    pub fn key_configured(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != PLACEHOLDER_API_KEY
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = GeminiConfig::default();
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
                base_url: env::var("GEMINI_API_BASE_URL").unwrap_or(defaults.base_url),
                timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.timeout_secs),
                max_output_tokens: env::var("GEMINI_MAX_OUTPUT_TOKENS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.max_output_tokens),
                session_token_budget: env::var("SESSION_TOKEN_BUDGET")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.session_token_budget),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Collect human-readable configuration warnings for startup
    ///
    /// None of these are fatal; a missing key only disables the assistant
    /// feature while the rest of the application keeps working.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.gemini.key_configured() {
            warnings.push(
                "Gemini API key is missing or still the placeholder; \
                 the career assistant chat will be unavailable"
                    .to_string(),
            );
        }
        if self.gemini.model.is_empty() {
            warnings.push("GEMINI_MODEL is empty".to_string());
        }
        warnings
    }
}
