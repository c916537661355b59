pub mod error;
pub mod middleware;
pub mod routes;


use std::sync::Arc;

use mood::MoodInterpreter;
use services::services::{
    config::AppConfig,
    feedback::FeedbackLearner,
    preferences::{PreferenceStore, SharedPreferenceStore},
    search::SearchOrchestrator,
    youtube::YouTubeClient,
};

/// Everything a request handler needs, cloned into each request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub preferences: SharedPreferenceStore,
    pub orchestrator: Arc<SearchOrchestrator>,
    pub feedback: FeedbackLearner,
    pub max_results: usize,
}

impl AppState {
    pub fn new(
        preferences: SharedPreferenceStore,
        orchestrator: SearchOrchestrator,
        max_results: usize,
    ) -> Self {
        Self {
            feedback: FeedbackLearner::new(preferences.clone()),
            preferences,
            orchestrator: Arc::new(orchestrator),
            max_results,
        }
    }

    /// Load preferences and wire the live interpreter cascade and YouTube.
    pub fn from_config(config: &AppConfig) -> Self {
        let preferences = PreferenceStore::load(&config.preferences_path).into_shared();
        let orchestrator = SearchOrchestrator::new(
            MoodInterpreter::from_env(),
            Arc::new(YouTubeClient::new(config.youtube_api_key.clone())),
        );
        Self::new(preferences, orchestrator, config.max_results)
    }
}
