//! Hugging Face Inference API provider implementation

use async_trait::async_trait;
use reqwest::Client;

use super::provider_trait::{InterpretationProvider, ProviderError, ProviderType};
use crate::{
    brain::{completion_prompt, extract_json_object, llm_http_client},
    InterpretationResult,
};

const DEFAULT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Hosted text-generation provider
pub struct HuggingFaceProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl HuggingFaceProvider {
    /// Create a provider from `HUGGINGFACE_API_KEY` / `HUGGINGFACE_MODEL`
    pub fn new() -> Self {
        let api_key = std::env::var("HUGGINGFACE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model =
            std::env::var("HUGGINGFACE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        if api_key.is_some() {
            tracing::info!("Hugging Face provider initialized with API key (model: {})", model);
        } else {
            tracing::debug!(
                "Hugging Face provider created without API key - HUGGINGFACE_API_KEY not set"
            );
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

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }

    /// Text-generation responses are a list of `{ "generated_text": ... }`
    fn parse_response(json: &serde_json::Value) -> Result<String, ProviderError> {
        if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
            return Err(ProviderError::NotAvailable(error.to_string()));
        }

        json[0]["generated_text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                ProviderError::ParseError("response has no generated_text".to_string())
            })
    }
}

impl Default for HuggingFaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InterpretationProvider for HuggingFaceProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::HuggingFace
    }

    fn name(&self) -> &'static str {
        "Hugging Face"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn interpret(&self, mood_text: &str) -> Result<InterpretationResult, ProviderError> {
        let auth_header = self
            .api_key
            .as_ref()
            .map(|k| format!("Bearer {}", k))
            .ok_or_else(|| {
                ProviderError::AuthError("No Hugging Face API key configured".to_string())
            })?;

        let payload = serde_json::json!({
            "inputs": completion_prompt(mood_text),
            "parameters": {
                "max_new_tokens": 150,
                "temperature": 0.7,
                "return_full_text": false
            }
        });

        tracing::debug!("[HuggingFace] Sending request: model={}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", auth_header)
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
        extract_json_object(&text, mood_text)
    }
}
