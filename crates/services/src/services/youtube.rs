//! YouTube Data API search, behind the [`VideoSearch`] seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
/// YouTube's "Music" video category.
const MUSIC_CATEGORY_ID: &str = "10";
pub const VIDEO_SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum VideoSearchError {
    #[error("YouTube API key not configured (set YOUTUBE_API_KEY)")]
    MissingApiKey,
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for VideoSearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VideoSearchError::ParseError(err.to_string())
        } else {
            VideoSearchError::RequestFailed(err.to_string())
        }
    }
}

/// A playable search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub video_id: String,
    pub url: String,
    pub thumbnail: String,
    pub channel: String,
}

impl Video {
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={video_id}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSearchRequest {
    pub query: String,
    pub max_results: usize,
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, request: &VideoSearchRequest) -> Result<Vec<Video>, VideoSearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchItem {
    fn into_video(self) -> Option<Video> {
        let video_id = self.id.video_id.filter(|id| !id.is_empty())?;
        Some(Video {
            url: Video::watch_url(&video_id),
            title: self.snippet.title,
            thumbnail: self
                .snippet
                .thumbnails
                .default
                .map(|t| t.url)
                .unwrap_or_default(),
            channel: self.snippet.channel_title,
            video_id,
        })
    }
}

#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("configured", &self.is_configured())
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl YouTubeClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(VIDEO_SEARCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client for YouTube: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, request: &VideoSearchRequest) -> Result<Vec<Video>, VideoSearchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(VideoSearchError::MissingApiKey)?;
        let max_results = request.max_results.to_string();

        tracing::debug!(
            "YouTube search '{}' (maxResults={})",
            request.query,
            max_results
        );

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("q", request.query.as_str()),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VideoSearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchListResponse = response.json().await?;
        Ok(body
            .items
            .into_iter()
            .filter_map(SearchItem::into_video)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = serde_json::json!({
            "kind": "youtube#searchListResponse",
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "abc123" },
                    "snippet": {
                        "title": "Happy Song",
                        "channelTitle": "Some Artist",
                        "thumbnails": { "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" } }
                    }
                },
                {
                    "id": { "kind": "youtube#channel", "channelId": "UC1" },
                    "snippet": { "title": "A channel", "channelTitle": "A channel" }
                }
            ]
        });

        let body: SearchListResponse = serde_json::from_value(json).unwrap();
        let videos: Vec<Video> = body
            .items
            .into_iter()
            .filter_map(SearchItem::into_video)
            .collect();

        assert_eq!(
            videos,
            vec![Video {
                title: "Happy Song".to_string(),
                video_id: "abc123".to_string(),
                url: "https://www.youtube.com/watch?v=abc123".to_string(),
                thumbnail: "https://i.ytimg.com/vi/abc123/default.jpg".to_string(),
                channel: "Some Artist".to_string(),
            }]
        );
    }

    #[test]
    fn test_response_without_items_is_empty() {
        let body: SearchListResponse = serde_json::from_str("{}").unwrap();
        assert!(body.items.is_empty());
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        assert!(!YouTubeClient::new(Some("  ".to_string())).is_configured());
        assert!(!YouTubeClient::new(None).is_configured());
        assert!(YouTubeClient::new(Some("k".to_string())).is_configured());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = YouTubeClient::new(None).with_base_url("http://127.0.0.1:9");
        let request = VideoSearchRequest {
            query: "lofi".to_string(),
            max_results: 10,
        };

        let err = client.search(&request).await.unwrap_err();
        assert!(matches!(err, VideoSearchError::MissingApiKey));
    }
}
