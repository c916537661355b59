//! Shared plumbing for the hosted LLM providers: prompts, the HTTP client,
//! and tolerant parsing of model output into an [`InterpretationResult`].

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::InterpretationResult;

pub mod providers;

pub use providers::ProviderError;

/// Upper bound for a single LLM round trip.
pub const LLM_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("JSON object pattern is valid"));

/// HTTP client used by every hosted provider.
pub fn llm_http_client() -> Client {
    Client::builder()
        .timeout(LLM_REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client for LLM calls: {}", e);
            Client::new()
        })
}

/// The JSON object every provider is asked to answer with
#[derive(Debug, Deserialize)]
struct LlmInterpretation {
    #[serde(default)]
    mood_label: String,
    #[serde(default)]
    search_query: String,
    #[serde(default)]
    interpretation: String,
}

impl LlmInterpretation {
    fn into_result(self, mood_text: &str) -> Result<InterpretationResult, ProviderError> {
        let search_query = self.search_query.trim();
        if search_query.is_empty() {
            return Err(ProviderError::ParseError(
                "model answer has no search_query".to_string(),
            ));
        }

        let mood_label = match self.mood_label.trim() {
            "" => mood_text.trim().to_lowercase(),
            label => label.to_string(),
        };
        let interpretation = match self.interpretation.trim() {
            "" => mood_text.to_string(),
            text => text.to_string(),
        };

        Ok(InterpretationResult {
            mood_label,
            search_query: search_query.to_string(),
            interpretation,
        })
    }
}

/// Prompt for Gemini. Spells out negation handling because the model tends
/// to latch onto the first emotion word it sees.
pub fn gemini_prompt(mood_text: &str) -> String {
    format!(
        r#"You are a music recommendation assistant. A user described their mood as: "{mood_text}"

IMPORTANT: Pay careful attention to negations (not, nor, neither, etc.). If the user says "not happy", they are NOT happy. If they say "not happy, not sad, nor neutral", they are describing an ambiguous or complex emotional state.

Based on this description, generate:
1. A concise mood label (1-2 words, e.g., "happy", "melancholic", "energetic", "neutral", "ambiguous")
2. An optimized YouTube music search query (3-5 words that will find relevant music)
3. A brief interpretation that accurately reflects what the user said

Respond in JSON format only:
{{"mood_label": "concise mood label", "search_query": "optimized search query for YouTube", "interpretation": "brief interpretation"}}

Example for "not happy, not sad, nor neutral":
{{"mood_label": "ambiguous", "search_query": "ambient instrumental background music", "interpretation": "Ambiguous emotional state - suggesting neutral ambient music"}}"#
    )
}

/// Prompt for text-generation endpoints that echo free-form text around
/// the JSON answer.
pub fn completion_prompt(mood_text: &str) -> String {
    format!(
        r#"You are a music recommendation assistant. A user described their mood as: "{mood_text}"

Based on this description, generate:
1. A concise mood label (1-2 words)
2. An optimized YouTube music search query (3-5 words)
3. A brief interpretation

Respond in JSON format:
{{"mood_label": "...", "search_query": "...", "interpretation": "..."}}"#
    )
}

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```).
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    }
    if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse an answer that should be exactly one JSON object, possibly fenced.
pub fn parse_fenced_json(
    text: &str,
    mood_text: &str,
) -> Result<InterpretationResult, ProviderError> {
    let raw: LlmInterpretation = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| ProviderError::ParseError(e.to_string()))?;
    raw.into_result(mood_text)
}

/// Parse the first flat JSON object found anywhere in the answer.
pub fn extract_json_object(
    text: &str,
    mood_text: &str,
) -> Result<InterpretationResult, ProviderError> {
    let candidate = JSON_OBJECT
        .find(text)
        .ok_or_else(|| ProviderError::ParseError("no JSON object in model answer".to_string()))?;
    let raw: LlmInterpretation = serde_json::from_str(candidate.as_str())
        .map_err(|e| ProviderError::ParseError(e.to_string()))?;
    raw.into_result(mood_text)
}
