use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::post,
};
use serde::{Deserialize, Serialize};
use services::services::{
    search::{SearchError, SearchRequest},
    youtube::Video,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub mood_description: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub mood_description: String,
    pub mood_label: String,
    pub interpretation: String,
    /// Query to echo back with feedback.
    pub query: String,
    pub videos: Vec<Video>,
}

pub async fn search_music(
    State(state): State<AppState>,
    payload: Result<Json<SearchBody>, JsonRejection>,
) -> Result<ResponseJson<SearchResponse>, ApiError> {
    let Json(body) = payload?;
    let mood_description = body.mood_description.trim().to_string();
    if mood_description.is_empty() {
        return Err(SearchError::EmptyMood.into());
    }

    // Kept in memory; written out with the next feedback.
    state.preferences.write().await.record_mood(
        &mood_description,
        body.genre.as_deref(),
        body.industry.as_deref(),
    );

    let request = SearchRequest::new(mood_description.clone())
        .with_genre(body.genre)
        .with_industry(body.industry)
        .with_max_results(state.max_results);
    let outcome = state
        .orchestrator
        .search(&state.preferences, &request)
        .await?;

    if outcome.videos.is_empty() {
        return Err(ApiError::NoVideos);
    }

    Ok(ResponseJson(SearchResponse {
        mood_description,
        mood_label: outcome.interpretation.mood_label,
        interpretation: outcome.interpretation.interpretation,
        query: outcome.base_query,
        videos: outcome.videos,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search", post(search_music))
}
