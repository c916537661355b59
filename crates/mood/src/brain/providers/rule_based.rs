//! Keyless public mode, answered entirely by the keyword scorer

use async_trait::async_trait;

use super::provider_trait::{InterpretationProvider, ProviderError, ProviderType};
use crate::{keywords::KeywordScorer, InterpretationResult};

/// Always-available provider backed by [`KeywordScorer`]
#[derive(Debug, Default, Clone)]
pub struct RuleBasedProvider {
    scorer: KeywordScorer,
}

impl RuleBasedProvider {
    pub fn new() -> Self {
        Self {
            scorer: KeywordScorer::new(),
        }
    }
}

#[async_trait]
impl InterpretationProvider for RuleBasedProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::RuleBased
    }

    fn name(&self) -> &'static str {
        "Rule-based"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn interpret(&self, mood_text: &str) -> Result<InterpretationResult, ProviderError> {
        Ok(self.scorer.classify(mood_text))
    }
}
