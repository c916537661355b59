//! # Mood
//!
//! Turns a free-text mood description into a music search query.
//! Interpretation runs through an ordered cascade of providers (hosted LLMs,
//! then the rule-based keyword scorer) and ends in a literal fallback, so a
//! caller always gets a usable result.

pub mod brain;
pub mod interpreter;
pub mod keywords;

#[cfg(test)]
mod interpreter_tests;

use serde::{Deserialize, Serialize};

pub use brain::providers::{
    GeminiProvider, HuggingFaceProvider, InterpretationProvider, ProviderError, ProviderType,
    RuleBasedProvider,
};
pub use interpreter::{MoodInterpreter, ProviderPreference};
pub use keywords::{KeywordScorer, MoodCategory};

/// Outcome of interpreting a mood description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationResult {
    pub mood_label: String,
    pub search_query: String,
    pub interpretation: String,
}

impl InterpretationResult {
    pub fn new(
        mood_label: impl Into<String>,
        search_query: impl Into<String>,
        interpretation: impl Into<String>,
    ) -> Self {
        Self {
            mood_label: mood_label.into(),
            search_query: search_query.into(),
            interpretation: interpretation.into(),
        }
    }

    /// Last-resort result: the description itself becomes the query.
    pub fn literal(mood_text: &str) -> Self {
        Self {
            mood_label: mood_text.to_lowercase(),
            search_query: format!("{} music", mood_text),
            interpretation: mood_text.to_string(),
        }
    }
}
