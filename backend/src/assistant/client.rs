//! Gemini API client
//!
//! Direct HTTP client for the `generateContent` endpoint. One request is
//! sent per chat turn, carrying the truncated session history, the system
//! instruction built from the user's profile, and the compressed user
//! message. There is no retry: a failed call surfaces as a user-visible
//! error and the next turn starts fresh.

use std::time::{Duration, Instant};

use crate::assistant::prompt::{
    build_system_prompt, compress_message, UserProfile, MAX_MESSAGE_TOKENS,
};
use crate::assistant::session::{ChatTurn, CONTEXT_WINDOW_PAIRS};
use crate::assistant::types::{
    default_safety_settings, GenerateRequest, GenerateResponse, GenerationConfig, RequestContent,
    SystemInstruction, TextPart,
};
use crate::config::GeminiConfig;
use crate::error::AppError;

/// Calls that complete but take longer than this get a warning log
const SLOW_CALL_WARN_SECS: u64 = 10;

/// Client for the career assistant's upstream model
///
/// Holds the immutable Gemini configuration and a pooled HTTP client.
/// Constructed once at startup via [`crate::assistant::capability::acquire`]
/// and shared behind an `Arc` for the process lifetime.
#[derive(Debug, Clone)]
pub struct CareerAssistant {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl CareerAssistant {
    /// Build the assistant with a request-timeout-configured HTTP client
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one chat turn to the Gemini API and return the reply text
    ///
    /// `history` is the session's context window (older turns already
    /// dropped); the user message is compressed before sending so a single
    /// oversized message cannot blow the input token limit.
    ///
    /// # Errors
    /// * `AppError::ApiKeyRejected` - the endpoint refused the key
    /// * `AppError::RateLimited` - HTTP 429 from the endpoint
    /// * `AppError::PromptBlocked` - safety filters blocked the prompt
    /// * `AppError::Timeout` - the configured request timeout elapsed
    /// * `AppError::Upstream` - any other endpoint or parsing failure
    pub async fn chat(
        &self,
        profile: &UserProfile,
        history: &[ChatTurn],
        user_message: &str,
    ) -> Result<String, AppError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let compressed = compress_message(user_message, MAX_MESSAGE_TOKENS);

        let mut contents: Vec<RequestContent> = history
            .iter()
            .map(|turn| RequestContent {
                role: turn.role.as_str().to_string(),
                parts: vec![TextPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        contents.push(RequestContent {
            role: "user".to_string(),
            parts: vec![TextPart { text: compressed }],
        });

        let request_body = GenerateRequest {
            contents,
            system_instruction: SystemInstruction::from_text(build_system_prompt(profile)),
            generation_config: GenerationConfig::with_max_output_tokens(
                self.config.max_output_tokens,
            ),
            safety_settings: default_safety_settings(),
        };

        tracing::debug!(
            model = %self.config.model,
            history_turns = history.len(),
            prompt_len = user_message.len(),
            "Calling Gemini API"
        );

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!(
                        "no response within {}s",
                        self.config.timeout_secs
                    ))
                } else {
                    AppError::Upstream(format!("failed to send HTTP request: {}", e))
                }
            })?;

        let elapsed = start.elapsed();
        if elapsed.as_secs() >= SLOW_CALL_WARN_SECS {
            tracing::warn!(
                duration_ms = elapsed.as_millis() as u64,
                model = %self.config.model,
                "Gemini API call exceeded latency budget"
            );
        }

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            return Err(match status_code {
                429 => AppError::RateLimited(error_body),
                400 | 401 | 403 => AppError::ApiKeyRejected {
                    status: status_code,
                    message: error_body,
                },
                _ => AppError::Upstream(format!("HTTP {}: {}", status_code, error_body)),
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to read response body: {}", e)))?;

        let parsed: GenerateResponse = serde_json::from_str(&response_body).map_err(|e| {
            AppError::Upstream(format!(
                "failed to parse JSON response: {} - body: {}",
                e, response_body
            ))
        })?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(AppError::PromptBlocked(reason.clone()));
            }
        }

        let candidate = parsed
            .candidates
            .first()
            .ok_or_else(|| AppError::Upstream("response contains no candidates".to_string()))?;

        let part = candidate
            .content
            .parts
            .first()
            .ok_or_else(|| AppError::Upstream("response candidate contains no parts".to_string()))?;

        if part.text.is_empty() {
            return Err(AppError::Upstream("response text is empty".to_string()));
        }

        tracing::debug!(
            response_len = part.text.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Received Gemini API reply"
        );

        Ok(part.text.clone())
    }

    /// The context window sent with each request, as user/model pairs
    pub fn context_window_pairs(&self) -> usize {
        CONTEXT_WINDOW_PAIRS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::session::ChatRole;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn assistant_for(base_url: String) -> CareerAssistant {
        CareerAssistant::new(GeminiConfig {
            api_key: "test-key".to_string(),
            base_url,
            ..GeminiConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
                "key".into(),
                "test-key".into(),
            )]))
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{
                                "text": "Look into data engineering roles"
                            }],
                            "role": "model"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let result = assistant
            .chat(&UserProfile::default(), &[], "what jobs fit me?")
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Look into data engineering roles");
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_sends_history_and_system_instruction() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({
                    "contents": [
                        {"role": "user", "parts": [{"text": "earlier question"}]},
                        {"role": "model", "parts": [{"text": "earlier answer"}]},
                        {"role": "user", "parts": [{"text": "follow-up"}]}
                    ]
                })),
                Matcher::Regex("systemInstruction".to_string()),
                Matcher::Regex("Career Assistant".to_string()),
                Matcher::Regex("maxOutputTokens".to_string()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"text": "ok"}], "role": "model"}}]}"#,
            )
            .create_async()
            .await;

        let history = vec![
            ChatTurn::new(ChatRole::User, "earlier question".to_string()),
            ChatTurn::new(ChatRole::Model, "earlier answer".to_string()),
        ];

        let assistant = assistant_for(server.url());
        let result = assistant
            .chat(&UserProfile::default(), &history, "follow-up")
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_key_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(400)
            .with_body(r#"{"error": {"message": "API key not valid"}}"#)
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let result = assistant.chat(&UserProfile::default(), &[], "hello").await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::ApiKeyRejected { status: 400, .. }));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_rate_limited() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let result = assistant.chat(&UserProfile::default(), &[], "hello").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(AppError::RateLimited(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_blocked_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [],
                    "promptFeedback": {"blockReason": "SAFETY"}
                }"#,
            )
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let result = assistant.chat(&UserProfile::default(), &[], "hello").await;

        mock.assert_async().await;
        match result {
            Err(AppError::PromptBlocked(reason)) => assert_eq!(reason, "SAFETY"),
            other => panic!("expected PromptBlocked, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_empty_candidates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let result = assistant.chat(&UserProfile::default(), &[], "hello").await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let result = assistant.chat(&UserProfile::default(), &[], "hello").await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to parse JSON"));
    }

    #[tokio::test]
    #[serial]
    async fn test_chat_compresses_long_message() {
        let mut server = Server::new_async().await;
        // The compressed message carries the truncation marker
        let mock = server
            .mock("POST", "/models/gemini-flash-latest:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Regex(r"truncated for token efficiency".to_string()))
            .with_status(200)
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"text": "ok"}], "role": "model"}}]}"#,
            )
            .create_async()
            .await;

        let assistant = assistant_for(server.url());
        let long_message = "word ".repeat(2000);
        let result = assistant
            .chat(&UserProfile::default(), &[], &long_message)
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_chat_timeout() {
        // A listener that accepts connections but never writes a response,
        // so the client's request timeout is what ends the call
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _socket = socket;
                    tokio::time::sleep(Duration::from_secs(60)).await;
                });
            }
        });

        let assistant = CareerAssistant::new(GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: format!("http://{}", addr),
            timeout_secs: 1,
            ..GeminiConfig::default()
        })
        .unwrap();

        let result = assistant.chat(&UserProfile::default(), &[], "hello").await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        assert!(err.to_string().contains("no response within 1s"));
    }
}
