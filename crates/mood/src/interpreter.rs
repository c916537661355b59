//! The interpretation cascade.
//!
//! Providers are tried in order; unconfigured ones are skipped and failures
//! are logged and fall through. When nothing answers, the description is
//! used literally.

use std::sync::Arc;

use crate::{
    brain::providers::{
        GeminiProvider, HuggingFaceProvider, InterpretationProvider, RuleBasedProvider,
    },
    InterpretationResult,
};

/// Which hosted LLM the cascade should try first (`LLM_PROVIDER`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderPreference {
    #[default]
    GeminiFirst,
    HuggingFaceFirst,
    /// Skip hosted LLMs entirely
    RuleBasedOnly,
}

impl std::str::FromStr for ProviderPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "gemini" | "google" => Ok(ProviderPreference::GeminiFirst),
            "huggingface" | "hugging_face" | "hf" => Ok(ProviderPreference::HuggingFaceFirst),
            "none" | "rule-based" | "rule_based" | "rules" | "keyword" => {
                Ok(ProviderPreference::RuleBasedOnly)
            }
            other => Err(format!("Unknown LLM provider preference: {}", other)),
        }
    }
}

impl ProviderPreference {
    pub fn from_env() -> Self {
        match std::env::var("LLM_PROVIDER") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{} - defaulting to gemini", e);
                ProviderPreference::default()
            }),
            Err(_) => ProviderPreference::default(),
        }
    }
}

/// Ordered list of interpretation strategies
#[derive(Clone)]
pub struct MoodInterpreter {
    providers: Vec<Arc<dyn InterpretationProvider>>,
}

impl std::fmt::Debug for MoodInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodInterpreter")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl MoodInterpreter {
    pub fn new(providers: Vec<Arc<dyn InterpretationProvider>>) -> Self {
        Self { providers }
    }

    /// Build the standard cascade from environment credentials
    pub fn from_env() -> Self {
        Self::with_preference(
            ProviderPreference::from_env(),
            GeminiProvider::new(),
            HuggingFaceProvider::new(),
        )
    }

    pub fn with_preference(
        preference: ProviderPreference,
        gemini: GeminiProvider,
        huggingface: HuggingFaceProvider,
    ) -> Self {
        let gemini: Arc<dyn InterpretationProvider> = Arc::new(gemini);
        let huggingface: Arc<dyn InterpretationProvider> = Arc::new(huggingface);
        let rule_based: Arc<dyn InterpretationProvider> = Arc::new(RuleBasedProvider::new());

        let providers = match preference {
            ProviderPreference::GeminiFirst => vec![gemini, huggingface, rule_based],
            ProviderPreference::HuggingFaceFirst => vec![huggingface, gemini, rule_based],
            ProviderPreference::RuleBasedOnly => vec![rule_based],
        };

        tracing::info!(
            "Mood interpreter cascade: {}",
            providers
                .iter()
                .map(|p| format!("{}{}", p.name(), if p.is_configured() { "" } else { " (off)" }))
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        Self { providers }
    }

    /// Keyword scorer only; no network access
    pub fn rule_based() -> Self {
        Self::new(vec![Arc::new(RuleBasedProvider::new())])
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Interpret a mood description. Never fails.
    pub async fn interpret(&self, mood_text: &str) -> InterpretationResult {
        for provider in &self.providers {
            if !provider.is_configured() {
                tracing::debug!("Skipping {} - not configured", provider.name());
                continue;
            }

            match provider.interpret(mood_text).await {
                Ok(result) => {
                    tracing::info!(
                        "{} interpreted mood as '{}' -> '{}'",
                        provider.name(),
                        result.mood_label,
                        result.search_query
                    );
                    return result;
                }
                Err(e) => {
                    tracing::warn!("{} interpretation failed, falling back: {}", provider.name(), e);
                }
            }
        }

        tracing::warn!("All interpretation providers failed - using the description literally");
        InterpretationResult::literal(mood_text)
    }
}

impl Default for MoodInterpreter {
    fn default() -> Self {
        Self::rule_based()
    }
}
