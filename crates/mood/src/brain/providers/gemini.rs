//! Google Gemini provider implementation

use async_trait::async_trait;
use reqwest::Client;

use super::provider_trait::{InterpretationProvider, ProviderError, ProviderType};
use crate::{
    brain::{gemini_prompt, llm_http_client, parse_fenced_json},
    InterpretationResult,
};

const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` API provider
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider from `GEMINI_API_KEY` / `GEMINI_MODEL`
    pub fn new() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        if api_key.is_some() {
            tracing::info!("Gemini provider initialized with API key (model: {})", model);
        } else {
            tracing::debug!("Gemini provider created without API key - GEMINI_API_KEY not set");
        }

        Self {
            client: llm_http_client(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_api_key(api_key: Option<String>) -> Self {
        Self {
            client: llm_http_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Pull the generated text out of a `generateContent` response
    fn parse_response(json: &serde_json::Value) -> Result<String, ProviderError> {
        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                ProviderError::ParseError("Gemini response has no candidate text".to_string())
            })
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterpretationProvider for GeminiProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Gemini
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn interpret(&self, mood_text: &str) -> Result<InterpretationResult, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::AuthError("No Gemini API key configured".to_string()))?;

        let payload = serde_json::json!({
            "contents": [{
                "parts": [{ "text": gemini_prompt(mood_text) }]
            }]
        });

        tracing::debug!("[Gemini] Sending request: model={}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let text = Self::parse_response(&json)?;
        parse_fenced_json(&text, mood_text)
    }
}
