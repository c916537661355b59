//! Tests for the interpretation cascade

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;

    use crate::{
        brain::providers::{
            GeminiProvider, HuggingFaceProvider, InterpretationProvider, ProviderError,
            ProviderType,
        },
        interpreter::{MoodInterpreter, ProviderPreference},
        InterpretationResult,
    };

    /// Scripted provider that counts how often it was asked
    struct ScriptedProvider {
        configured: bool,
        answer: Option<InterpretationResult>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn answering(label: &str, query: &str) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                answer: Some(InterpretationResult::new(label, query, "scripted")),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                answer: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                configured: false,
                answer: Some(InterpretationResult::new("never", "never", "never")),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InterpretationProvider for ScriptedProvider {
        fn provider_type(&self) -> ProviderType {
            ProviderType::Gemini
        }

        fn name(&self) -> &'static str {
            "Scripted"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn interpret(
            &self,
            _mood_text: &str,
        ) -> Result<InterpretationResult, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .ok_or_else(|| ProviderError::RequestFailed("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let first = ScriptedProvider::answering("calm", "soft piano");
        let second = ScriptedProvider::answering("loud", "metal");
        let interpreter = MoodInterpreter::new(vec![first.clone(), second.clone()]);

        let result = interpreter.interpret("winding down").await;

        assert_eq!(result.search_query, "soft piano");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next_provider() {
        let failing = ScriptedProvider::failing();
        let backup = ScriptedProvider::answering("sad", "rainy day songs");
        let interpreter = MoodInterpreter::new(vec![failing.clone(), backup.clone()]);

        let result = interpreter.interpret("gloomy").await;

        assert_eq!(result.mood_label, "sad");
        assert_eq!(failing.calls(), 1);
        assert_eq!(backup.calls(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_providers_are_skipped() {
        let unconfigured = ScriptedProvider::unconfigured();
        let backup = ScriptedProvider::answering("happy", "pop hits");
        let interpreter = MoodInterpreter::new(vec![unconfigured.clone(), backup]);

        let result = interpreter.interpret("great day").await;

        assert_eq!(result.search_query, "pop hits");
        assert_eq!(unconfigured.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_failures_use_literal_description() {
        let interpreter =
            MoodInterpreter::new(vec![ScriptedProvider::failing(), ScriptedProvider::failing()]);

        let result = interpreter.interpret("Sunday Morning").await;

        assert_eq!(result.mood_label, "sunday morning");
        assert_eq!(result.search_query, "Sunday Morning music");
        assert_eq!(result.interpretation, "Sunday Morning");
    }

    #[tokio::test]
    async fn test_empty_cascade_uses_literal_description() {
        let result = MoodInterpreter::new(Vec::new()).interpret("meh").await;
        assert_eq!(result.search_query, "meh music");
    }

    #[tokio::test]
    async fn test_without_credentials_cascade_resolves_to_keyword_scorer() {
        let interpreter = MoodInterpreter::with_preference(
            ProviderPreference::GeminiFirst,
            GeminiProvider::with_api_key(None),
            HuggingFaceProvider::with_api_key(None),
        );

        let result = interpreter.interpret("I am feeling happy and excited").await;

        assert_eq!(result.mood_label, "happy");
        assert_eq!(result.search_query, "upbeat happy energetic music");
    }

    #[tokio::test]
    async fn test_negated_description_through_cascade() {
        let result = MoodInterpreter::rule_based()
            .interpret("not happy, not sad, nor neutral")
            .await;

        assert_eq!(result.mood_label, "neutral");
        assert_eq!(result.search_query, "ambient instrumental background music");
    }

    #[test]
    fn test_preference_orders_providers() {
        let gemini_first = MoodInterpreter::with_preference(
            ProviderPreference::GeminiFirst,
            GeminiProvider::with_api_key(None),
            HuggingFaceProvider::with_api_key(None),
        );
        assert_eq!(
            gemini_first.provider_names(),
            vec!["Gemini", "Hugging Face", "Rule-based"]
        );

        let hf_first = MoodInterpreter::with_preference(
            ProviderPreference::HuggingFaceFirst,
            GeminiProvider::with_api_key(None),
            HuggingFaceProvider::with_api_key(None),
        );
        assert_eq!(
            hf_first.provider_names(),
            vec!["Hugging Face", "Gemini", "Rule-based"]
        );

        let rules_only = MoodInterpreter::with_preference(
            ProviderPreference::RuleBasedOnly,
            GeminiProvider::with_api_key(None),
            HuggingFaceProvider::with_api_key(None),
        );
        assert_eq!(rules_only.provider_names(), vec!["Rule-based"]);
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!(
            "Gemini".parse::<ProviderPreference>().unwrap(),
            ProviderPreference::GeminiFirst
        );
        assert_eq!(
            "huggingface".parse::<ProviderPreference>().unwrap(),
            ProviderPreference::HuggingFaceFirst
        );
        assert_eq!(
            "none".parse::<ProviderPreference>().unwrap(),
            ProviderPreference::RuleBasedOnly
        );
        assert!("openai".parse::<ProviderPreference>().is_err());
    }

    #[test]
    fn test_provider_type_round_trip_through_display() {
        for provider_type in [
            ProviderType::Gemini,
            ProviderType::HuggingFace,
            ProviderType::RuleBased,
        ] {
            let parsed: ProviderType = provider_type.to_string().parse().unwrap();
            assert_eq!(parsed, provider_type);
        }
    }
}
