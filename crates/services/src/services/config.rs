use std::path::PathBuf;

use utils::assets::preferences_path;

use super::search::DEFAULT_MAX_RESULTS;

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub preferences_path: PathBuf,
    pub max_results: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let youtube_api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        if youtube_api_key.is_none() {
            tracing::warn!("YOUTUBE_API_KEY not set - searches will return no videos");
        }

        Self {
            youtube_api_key,
            preferences_path: preferences_path(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
