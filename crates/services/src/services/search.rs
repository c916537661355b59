//! Mood description in, filtered music videos out.

use std::{collections::HashSet, sync::Arc};

use mood::{InterpretationResult, MoodInterpreter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    preferences::{SharedPreferenceStore, normalize_mood_key},
    youtube::{Video, VideoSearch, VideoSearchRequest},
};

pub const DEFAULT_MAX_RESULTS: usize = 5;
/// Genre value meaning "no genre filter".
const ANY_GENRE: &str = "any";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Please describe your mood")]
    EmptyMood,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub mood_text: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl SearchRequest {
    pub fn new(mood_text: impl Into<String>) -> Self {
        Self {
            mood_text: mood_text.into(),
            genre: None,
            industry: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_genre(mut self, genre: Option<String>) -> Self {
        self.genre = genre;
        self
    }

    pub fn with_industry(mut self, industry: Option<String>) -> Self {
        self.industry = industry;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// Regional film-music industries the query can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Industry {
    Bollywood,
    Hollywood,
}

impl Industry {
    /// Anything other than a known industry (including "any") is no filter.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "bollywood" => Some(Industry::Bollywood),
            "hollywood" => Some(Industry::Hollywood),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Bollywood => "bollywood",
            Industry::Hollywood => "hollywood",
        }
    }
}

/// Query actually sent to the video search: base query plus genre and
/// industry hints.
pub fn compose_query(base_query: &str, genre: Option<&str>, industry: Option<&str>) -> String {
    let mut query = base_query.to_string();

    if let Some(genre) = genre
        .map(str::trim)
        .filter(|g| !g.is_empty() && !g.eq_ignore_ascii_case(ANY_GENRE))
    {
        query.push_str(&format!(" {genre} music"));
    }

    if let Some(industry) = industry.and_then(Industry::parse) {
        query.push(' ');
        query.push_str(industry.as_str());
    }

    query
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub interpretation: InterpretationResult,
    /// Query feedback should refer to (before genre/industry hints).
    pub base_query: String,
    pub effective_query: String,
    pub videos: Vec<Video>,
}

pub struct SearchOrchestrator {
    interpreter: MoodInterpreter,
    videos: Arc<dyn VideoSearch>,
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("interpreter", &self.interpreter)
            .finish_non_exhaustive()
    }
}

impl SearchOrchestrator {
    pub fn new(interpreter: MoodInterpreter, videos: Arc<dyn VideoSearch>) -> Self {
        Self { interpreter, videos }
    }

    pub async fn search(
        &self,
        store: &SharedPreferenceStore,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        let mood_text = request.mood_text.trim();
        if mood_text.is_empty() {
            return Err(SearchError::EmptyMood);
        }
        let mood_key = normalize_mood_key(mood_text);
        let max_results = match request.max_results {
            0 => DEFAULT_MAX_RESULTS,
            n => n,
        };

        // Snapshot hints; the lock is released before any network call.
        let (known_query, disliked) = {
            let store = store.read().await;
            (
                store.best_known_query(&mood_key),
                store.disliked_video_ids(&mood_key),
            )
        };

        let interpretation = match known_query {
            Some(query) => {
                tracing::info!("Reusing liked query '{}' for mood '{}'", query, mood_key);
                InterpretationResult::new(mood_key.clone(), query, mood_text)
            }
            None => self.interpreter.interpret(mood_text).await,
        };

        let base_query = interpretation.search_query.clone();
        let effective_query = compose_query(
            &base_query,
            request.genre.as_deref(),
            request.industry.as_deref(),
        );

        let candidates = self
            .fetch_candidates(&effective_query, max_results * 2)
            .await;
        let videos = filter_disliked(candidates, &disliked, max_results);

        tracing::info!(
            "Search for '{}' via '{}' returned {} videos",
            mood_key,
            effective_query,
            videos.len()
        );

        Ok(SearchOutcome {
            interpretation,
            base_query,
            effective_query,
            videos,
        })
    }

    async fn fetch_candidates(&self, query: &str, max_results: usize) -> Vec<Video> {
        let request = VideoSearchRequest {
            query: query.to_string(),
            max_results,
        };

        match self.videos.search(&request).await {
            Ok(videos) => videos,
            Err(e) => {
                tracing::warn!("Video search for '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }
}

fn filter_disliked(candidates: Vec<Video>, disliked: &HashSet<String>, limit: usize) -> Vec<Video> {
    candidates
        .into_iter()
        .filter(|video| !disliked.contains(&video.video_id))
        .take(limit)
        .collect()
}
