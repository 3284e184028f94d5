//! Gemini API wire types
//!
//! Structs that mirror the `generateContent` JSON request and response
//! formats. Field names are camelCase on the wire (`systemInstruction`,
//! `maxOutputTokens`, ...), handled via serde renames.

use serde::{Deserialize, Serialize};

/// Top-level Gemini API response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// List of candidate replies from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g. if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate reply from the model
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate
    pub content: ResponseContent,
    /// Why the model stopped generating (if applicable)
    #[serde(default)]
    #[allow(dead_code)] // Part of API response format, may be used in future
    pub finish_reason: Option<String>,
}

/// Content structure containing parts of the reply
#[derive(Deserialize, Debug)]
pub struct ResponseContent {
    /// List of content parts (typically one text part)
    #[serde(default)]
    pub parts: Vec<TextPart>,
    /// Role of the content (e.g. "model")
    #[serde(default)]
    #[allow(dead_code)] // Part of API response format, may be used in future
    pub role: Option<String>,
}

/// Feedback about the prompt (e.g. if it was blocked)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// A single text part, used in both requests and responses
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TextPart {
    /// The text content of this part
    pub text: String,
}

/// Request structure for `generateContent`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation turns, oldest first, ending with the new user message
    pub contents: Vec<RequestContent>,
    /// Standing instructions for the model (profile, rules, style)
    pub system_instruction: SystemInstruction,
    /// Sampling and output-length configuration
    pub generation_config: GenerationConfig,
    /// Safety filter thresholds
    pub safety_settings: Vec<SafetySetting>,
}

/// One conversation turn in a request
#[derive(Serialize, Debug)]
pub struct RequestContent {
    /// "user" or "model"
    pub role: String,
    /// List of content parts (one text part per turn)
    pub parts: Vec<TextPart>,
}

/// System instruction wrapper
#[derive(Serialize, Debug)]
pub struct SystemInstruction {
    /// Instruction text parts
    pub parts: Vec<TextPart>,
}

impl SystemInstruction {
    /// Wrap a single instruction string
    pub fn from_text(text: String) -> Self {
        Self {
            parts: vec![TextPart { text }],
        }
    }
}

/// Generation configuration for requests
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Upper bound on reply length in tokens
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// The platform's standard sampling settings with a reply-length cap
    pub fn with_max_output_tokens(max_output_tokens: u32) -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens,
        }
    }
}

/// A single safety filter setting
#[derive(Serialize, Debug)]
pub struct SafetySetting {
    /// Harm category name (e.g. "HARM_CATEGORY_HARASSMENT")
    pub category: String,
    /// Blocking threshold for that category
    pub threshold: String,
}

/// The platform's standard safety settings: block medium and above for all
/// four harm categories
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_MEDIUM_AND_ABOVE".to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: "hello".to_string(),
                }],
            }],
            system_instruction: SystemInstruction::from_text("be brief".to_string()),
            generation_config: GenerationConfig::with_max_output_tokens(800),
            safety_settings: default_safety_settings(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json.get("generationConfig").is_some());
        assert!(json.get("safetySettings").is_some());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 800);
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_response_parses_camel_case() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "hi"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "promptFeedback": {"blockReason": null}
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].content.parts[0].text, "hi");
    }

    #[test]
    fn test_default_safety_settings_cover_four_categories() {
        let settings = default_safety_settings();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s.threshold == "BLOCK_MEDIUM_AND_ABOVE"));
    }
}
