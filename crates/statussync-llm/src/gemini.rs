//! Gemini Provider Implementation
//!
//! Provides integration with Google's Gemini `generateContent` REST API.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint, model and sampling parameters
//! - Finish-reason handling: anything other than `STOP` is a failure
//! - Timeout handling (no retries)
//!
//! # Examples
//!
//! ```no_run
//! use statussync_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("api-key", "gemini-2.5-flash").unwrap();
//! ```

use crate::config::GenerationParams;
use crate::LlmError;
use serde::{Deserialize, Serialize};
use statussync_domain::traits::LlmProvider;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for inference requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    params: GenerationParams,
    client: reqwest::Client,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

/// Response from the generateContent API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<FinishReason>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Why a candidate stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural stop
    Stop,
    /// Token budget exhausted
    MaxTokens,
    /// Blocked by safety filters
    Safety,
    /// Blocked for recitation
    Recitation,
    /// Unspecified by the backend
    FinishReasonUnspecified,
    /// Any reason this client does not know
    #[serde(other)]
    Other,
}

impl FinishReason {
    fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::FinishReasonUnspecified => "FINISH_REASON_UNSPECIFIED",
            FinishReason::Other => "OTHER",
        }
    }
}

/// Reduce a response to the text of its first candidate
pub(crate) fn completion_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::NoCandidates)?;

    match candidate.finish_reason {
        Some(FinishReason::Stop) => {}
        Some(reason) => return Err(LlmError::Incomplete(reason.as_str().to_string())),
        None => return Err(LlmError::Incomplete("MISSING".to_string())),
    }

    let text = candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text)
}

/// Map a non-success HTTP status to an error
fn status_error(status: reqwest::StatusCode, body: &str, model: &str) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::Authentication(format!("HTTP {}", status)),
        400 if body.contains("API_KEY_INVALID") => {
            LlmError::Authentication("API key rejected".to_string())
        }
        404 => LlmError::ModelNotAvailable(model.to_string()),
        429 => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: Gemini API key
    /// - `model`: Model to use (e.g., "gemini-2.5-flash")
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Gemini provider with a request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Authentication("Gemini API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            params: GenerationParams::default(),
            client,
        })
    }

    /// Use a different API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use different sampling parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    fn request_body(&self, prompt: &str, max_tokens: u32) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.params.temperature,
                top_p: self.params.top_p,
                top_k: self.params.top_k,
                max_output_tokens: max_tokens,
            },
        }
    }

    /// Generate a completion
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API key is rejected
    /// - The model is not available
    /// - Network communication fails or times out
    /// - The first candidate did not stop naturally or has no text
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        debug!(model = %self.model, max_tokens, prompt_chars = prompt.len(), "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt, max_tokens))
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let error = status_error(status, &body, &self.model);
            warn!(model = %self.model, "Gemini request failed: {}", error);
            return Err(error);
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        completion_text(parsed)
    }
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn infer(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        self.generate(prompt, max_tokens).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
