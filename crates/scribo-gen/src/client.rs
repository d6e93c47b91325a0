//! Gemini REST client.
//!
//! Thin typed wrapper over the `generateContent` endpoint. Callers get
//! the candidate text back, or a `GenError::Blocked` carrying the finish
//! reason and safety ratings when the model returns no text.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GenError, GenResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

/// Per-call generation settings.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Ask for `application/json` output.
    pub json_mode: bool,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
    #[serde(rename = "safetyRatings", default)]
    safety_ratings: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

impl GeminiClient {
    /// Create a client from `GEMINI_API_KEY` (and optional
    /// `GEMINI_MODEL`) environment variables.
    pub fn from_env() -> GenResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GenError::config("GEMINI_API_KEY not set"))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, model))
    }

    /// Create a client with explicit credentials.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one `generateContent` call and return the candidate text.
    pub async fn generate(&self, prompt: &str, options: &GenerateOptions) -> GenResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let generation_config = if options.json_mode
            || options.temperature.is_some()
            || options.max_output_tokens.is_some()
        {
            Some(GenerationConfig {
                response_mime_type: options
                    .json_mode
                    .then(|| "application/json".to_string()),
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            })
        } else {
            None
        };

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Gemini API error");
            return Err(GenError::Http { status, body });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenError::parse(format!("Invalid API response: {}", e)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenError::Blocked {
                finish_reason: "NO_CANDIDATES".to_string(),
                safety_ratings: vec![],
            })?;

        let text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty());

        match text {
            Some(text) => Ok(text),
            None => Err(GenError::Blocked {
                finish_reason: candidate
                    .finish_reason
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
                safety_ratings: candidate.safety_ratings,
            }),
        }
    }

    /// Run a JSON-mode call and parse the candidate text into `T`.
    ///
    /// Handles models that wrap their output in markdown code fences
    /// despite JSON mode.
    pub async fn generate_json<T: serde::de::DeserializeOwned>(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> GenResult<T> {
        let mut options = options.clone();
        options.json_mode = true;

        let text = self.generate(prompt, &options).await?;
        let stripped = strip_code_fences(&text);

        serde_json::from_str(stripped).map_err(|e| GenError::schema(e.to_string()))
    }
}

/// Strip a leading ```` ```json ```` fence and trailing ```` ``` ````.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}
