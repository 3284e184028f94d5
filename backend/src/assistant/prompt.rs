//! Prompt construction for the career assistant
//!
//! Builds the system instruction from the user's mapped profile, compresses
//! oversized messages before they are sent upstream, and produces the quick
//! suggestions shown to users who have not asked anything yet.

use serde::{Deserialize, Serialize};

use crate::assistant::tokens::estimate_tokens;

/// Skill-gap strings longer than this are summarized in the system prompt
const MAX_SKILL_GAP_CHARS: usize = 200;

/// How many leading skills survive skill-gap summarization
const SKILL_GAP_SUMMARY_ITEMS: usize = 5;

/// User messages are compressed to at most this many estimated tokens
pub const MAX_MESSAGE_TOKENS: u64 = 300;

/// Marker appended to messages that were cut down before sending
const TRUNCATION_MARKER: &str = "... [truncated for token efficiency]";

/// The user's mapped career profile, inlined into the system prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Target occupation the user was mapped to
    #[serde(default = "default_occupation")]
    pub occupation: String,
    /// Comma-separated skills the user still needs for that occupation
    #[serde(default = "default_skill_gap")]
    pub skill_gap: String,
    /// Where the user is looking for work
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_occupation() -> String {
    "Unknown".to_string()
}

fn default_skill_gap() -> String {
    "No data".to_string()
}

fn default_location() -> String {
    "Indonesia".to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            occupation: default_occupation(),
            skill_gap: default_skill_gap(),
            location: default_location(),
        }
    }
}

/// Build the system instruction for one chat turn
///
/// The profile is kept deliberately short: a long skill-gap list is cut to its
/// first few entries so the instruction itself does not eat into the input
/// token limit.
pub fn build_system_prompt(profile: &UserProfile) -> String {
    let skill_gap = summarize_skill_gap(&profile.skill_gap);

    format!(
        "You are the AI Career Assistant for the Digital Talent platform.\n\
         \n\
         USER PROFILE (BRIEF):\n\
         - Target occupation: {occupation}\n\
         - Main skill gap: {skill_gap}\n\
         - Location: {location}\n\
         \n\
         YOUR TASKS:\n\
         1. Recommend relevant job openings\n\
         2. Suggest career development steps based on the skill gap\n\
         3. Give interview tips and career preparation advice\n\
         4. Answer questions about careers in the IT/digital field\n\
         \n\
         RULES:\n\
         - Keep answers SHORT and DENSE (max 150 words)\n\
         - Focus on ACTIONABLE advice\n\
         - When asked about openings, name 2-3 positions relevant to the user's occupation\n\
         - Skip long explanations, go straight to the key points\n\
         \n\
         Style: professional but friendly, like a career mentor.",
        occupation = profile.occupation,
        skill_gap = skill_gap,
        location = profile.location,
    )
}

/// Cut a long comma-separated skill-gap string down to its leading entries
fn summarize_skill_gap(skill_gap: &str) -> String {
    if skill_gap.chars().count() <= MAX_SKILL_GAP_CHARS {
        return skill_gap.to_string();
    }
    let skills: Vec<&str> = skill_gap
        .split(',')
        .take(SKILL_GAP_SUMMARY_ITEMS)
        .map(str::trim)
        .collect();
    format!("{}...", skills.join(", "))
}

/// Compress a message to roughly `max_tokens` before sending it upstream
///
/// Messages under the limit pass through unchanged; longer ones are truncated
/// at a character boundary and tagged with a marker so the model knows text
/// was dropped.
pub fn compress_message(text: &str, max_tokens: u64) -> String {
    if estimate_tokens(text) <= max_tokens {
        return text.to_string();
    }
    let max_chars = (max_tokens * 4) as usize;
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}{}", truncated, TRUNCATION_MARKER)
}

/// Starter questions shown before the user has typed anything
pub fn quick_suggestions(occupation: &str) -> Vec<String> {
    vec![
        format!("What job openings fit a {}?", occupation),
        "Any interview tips for this position?".to_string(),
        "Which skills should I learn next?".to_string(),
        "What is the average salary for this position?".to_string(),
        "How do I apply for jobs effectively?".to_string(),
    ]
}
