use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::post,
};
use serde::Deserialize;
use services::services::feedback::FeedbackEvent;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    #[serde(default)]
    pub mood_description: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_title: Option<String>,
}

impl From<FeedbackBody> for FeedbackEvent {
    fn from(body: FeedbackBody) -> Self {
        FeedbackEvent {
            mood_text: body.mood_description,
            feedback: body.feedback,
            query: body.query,
            video_id: body.video_id,
            video_title: body.video_title,
        }
    }
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackBody>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let Json(body) = payload?;
    state.feedback.submit(&body.into()).await?;
    Ok(ResponseJson(ApiResponse::acknowledged("Feedback recorded!")))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/feedback", post(submit_feedback))
}
