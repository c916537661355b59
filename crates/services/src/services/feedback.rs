use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::preferences::{FeedbackKind, PreferenceError, SharedPreferenceStore};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Invalid feedback data: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Storage(#[from] PreferenceError),
}

/// One like/dislike from a listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub mood_text: String,
    pub feedback: String,
    pub query: String,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_title: Option<String>,
}

impl FeedbackEvent {
    fn validate(&self) -> Result<(), FeedbackError> {
        if self.mood_text.trim().is_empty() {
            return Err(FeedbackError::Invalid("mood description is required"));
        }
        if self.feedback.trim().is_empty() {
            return Err(FeedbackError::Invalid("feedback is required"));
        }
        if self.query.trim().is_empty() {
            return Err(FeedbackError::Invalid("query is required"));
        }
        Ok(())
    }
}

/// Applies feedback to the shared store and persists it.
#[derive(Debug, Clone)]
pub struct FeedbackLearner {
    store: SharedPreferenceStore,
}

impl FeedbackLearner {
    pub fn new(store: SharedPreferenceStore) -> Self {
        Self { store }
    }

    pub async fn submit(&self, event: &FeedbackEvent) -> Result<(), FeedbackError> {
        event.validate()?;
        let kind = FeedbackKind::parse(&event.feedback);

        let mut store = self.store.write().await;
        store.record_feedback(
            &event.mood_text,
            kind.clone(),
            &event.query,
            event.video_id.as_deref(),
            event.video_title.as_deref(),
        );
        store.save()?;

        tracing::info!(
            "Recorded {} for mood '{}' (query '{}')",
            kind,
            event.mood_text.trim(),
            event.query
        );
        Ok(())
    }
}
