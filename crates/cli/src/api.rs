//! HTTP client for the MoodTune server.

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<()> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .with_context(|| format!("Could not reach MoodTune server at {}", self.base_url))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            anyhow::bail!("Server health check failed: {}", resp.status())
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let resp = self
            .client
            .post(format!("{}/api/search", self.base_url))
            .json(request)
            .send()
            .await
            .context("Failed to send search request")?;

        if resp.status().is_success() {
            resp.json().await.context("Failed to parse search response")
        } else {
            Err(error_from_response(resp, "Search failed").await)
        }
    }

    pub async fn send_feedback(&self, request: &FeedbackRequest) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/api/feedback", self.base_url))
            .json(request)
            .send()
            .await
            .context("Failed to send feedback")?;

        if resp.status().is_success() {
            let ack: Acknowledgement = resp.json().await.context("Failed to parse feedback response")?;
            Ok(ack.message.unwrap_or_else(|| "Feedback recorded!".to_string()))
        } else {
            Err(error_from_response(resp, "Feedback failed").await)
        }
    }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn error_from_response(resp: Response, action: &str) -> anyhow::Error {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => anyhow::anyhow!("{}", body.error),
        Err(_) => anyhow::anyhow!("{}: {} - {}", action, status, text),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub mood_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub mood_description: String,
    pub mood_label: String,
    pub interpretation: String,
    pub query: String,
    pub videos: Vec<VideoSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSummary {
    pub title: String,
    pub video_id: String,
    pub url: String,
    #[serde(default)]
    pub channel: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRequest {
    pub mood_description: String,
    pub feedback: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(
            ApiClient::new("http://localhost:5000/").base_url(),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_search_request_omits_unset_filters() {
        let body = serde_json::to_value(SearchRequest {
            mood_description: "calm".to_string(),
            genre: None,
            industry: Some("bollywood".to_string()),
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "mood_description": "calm", "industry": "bollywood" })
        );
    }

    #[test]
    fn test_search_result_parses_server_shape() {
        let result: SearchResult = serde_json::from_value(serde_json::json!({
            "mood_description": "happy",
            "mood_label": "happy",
            "interpretation": "Detected happy mood from your description",
            "query": "upbeat happy energetic music",
            "videos": [{
                "title": "Song",
                "video_id": "abc",
                "url": "https://www.youtube.com/watch?v=abc",
                "thumbnail": "https://i.ytimg.com/vi/abc/default.jpg",
                "channel": "Artist"
            }]
        }))
        .unwrap();

        assert_eq!(result.videos[0].video_id, "abc");
        assert_eq!(result.videos[0].channel, "Artist");
    }
}
