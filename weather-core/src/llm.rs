//! Text generation backends.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    AppConfig, ConfigError, WeatherError, config::GEMINI_API_KEY_VAR, error::truncate_body,
};

/// Single-shot prompt completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, WeatherError>;
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    http: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self, ConfigError> {
        let http = Client::builder().build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            http,
        })
    }

    /// Fails with [`ConfigError::MissingCredential`] when no Gemini key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or(ConfigError::MissingCredential(GEMINI_API_KEY_VAR))?;

        Self::new(
            api_key,
            config.gemini_base_url.clone(),
            config.model.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, WeatherError> {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let res = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| WeatherError::Generation(format!("request to Gemini failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Generation(format!("failed to read Gemini response: {e}")))?;

        if !status.is_success() {
            warn!(%status, "Gemini request failed");
            return Err(WeatherError::Generation(format!(
                "Gemini returned status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Generation(format!("unexpected Gemini response shape: {e}"))
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(WeatherError::Generation(
                "Gemini response contained no text".to_string(),
            ));
        }

        debug!(chars = text.len(), "received model reply");
        Ok(text)
    }
}
