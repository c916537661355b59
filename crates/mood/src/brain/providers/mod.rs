//! Interpretation providers
//!
//! Each provider turns a mood description into an [`InterpretationResult`](crate::InterpretationResult).
//! The interpreter walks them in order until one succeeds.

mod gemini;
mod huggingface;
mod provider_trait;
mod rule_based;

pub use gemini::GeminiProvider;
pub use huggingface::HuggingFaceProvider;
pub use provider_trait::{InterpretationProvider, ProviderError, ProviderType};
pub use rule_based::RuleBasedProvider;
