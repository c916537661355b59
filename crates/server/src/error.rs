use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    feedback::FeedbackError, preferences::PreferenceError, search::SearchError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Preferences(#[from] PreferenceError),
    #[error("No videos found. Please check your API key or try a different mood description.")]
    NoVideos,
    #[error("Bad Request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Search(SearchError::EmptyMood) => (StatusCode::BAD_REQUEST, "EmptyMood"),
            ApiError::Feedback(err) => match err {
                FeedbackError::Invalid(_) => (StatusCode::BAD_REQUEST, "InvalidFeedback"),
                FeedbackError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "PreferenceError")
                }
            },
            ApiError::Preferences(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PreferenceError"),
            ApiError::NoVideos => (StatusCode::INTERNAL_SERVER_ERROR, "NoVideos"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        let error_message = match &self {
            ApiError::Feedback(FeedbackError::Invalid(_)) => "Invalid feedback data".to_string(),
            ApiError::Feedback(FeedbackError::Storage(_)) | ApiError::Preferences(_) => {
                "Could not save your preferences".to_string()
            }
            _ => self.to_string(),
        };

        if status_code.is_server_error() {
            tracing::error!("{}: {}", error_type, self);
        } else {
            tracing::debug!("{}: {}", error_type, self);
        }

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Search(SearchError::EmptyMood)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Feedback(FeedbackError::Invalid("query is required"))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NoVideos.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_empty_mood_message() {
        assert_eq!(
            ApiError::Search(SearchError::EmptyMood).to_string(),
            "Please describe your mood"
        );
    }
}
