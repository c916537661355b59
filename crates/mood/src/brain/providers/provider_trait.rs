//! Provider trait and common types for the interpretation cascade

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::InterpretationResult;

/// Supported interpretation provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Gemini,
    HuggingFace,
    /// Keyless public mode, answered by the keyword scorer
    RuleBased,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::Gemini => write!(f, "gemini"),
            ProviderType::HuggingFace => write!(f, "huggingface"),
            ProviderType::RuleBased => write!(f, "rule-based"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderType::Gemini),
            "huggingface" | "hugging_face" | "hf" => Ok(ProviderType::HuggingFace),
            "rule-based" | "rule_based" | "rules" | "keyword" | "public" => {
                Ok(ProviderType::RuleBased)
            }
            _ => Err(format!("Unknown provider type: {}", s)),
        }
    }
}

/// Error type for provider operations
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Response parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Provider not available: {0}")]
    NotAvailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::RequestFailed(err.to_string())
    }
}

/// One strategy in the interpretation cascade
#[async_trait]
pub trait InterpretationProvider: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> ProviderType;

    /// Get the provider name for logging/display
    fn name(&self) -> &'static str;

    /// Whether the provider has what it needs (credentials) to be tried
    fn is_configured(&self) -> bool;

    /// Interpret a mood description
    async fn interpret(&self, mood_text: &str) -> Result<InterpretationResult, ProviderError>;
}
