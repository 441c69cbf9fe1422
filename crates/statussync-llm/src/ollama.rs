//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API, for running the
//! pipeline against a local model.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama `/api/generate` endpoint
//! - Configurable endpoint, model and sampling parameters
//! - `done_reason` handling: anything other than `stop` is a failure
//! - Timeout handling (no retries)
//!
//! # Examples
//!
//! ```no_run
//! use statussync_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3").unwrap();
//! ```

use crate::config::GenerationParams;
use crate::LlmError;
use serde::{Deserialize, Serialize};
use statussync_domain::traits::LlmProvider;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for inference requests (60 seconds, local models are slower)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama API provider for local inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    params: GenerationParams,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

/// Response from Ollama generate API
#[derive(Debug, Deserialize)]
pub(crate) struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    done_reason: Option<String>,
}

/// Reduce a response to its text
///
/// Older Ollama versions omit `done_reason`; a finished response without
/// one counts as a natural stop.
pub(crate) fn completion_text(response: OllamaGenerateResponse) -> Result<String, LlmError> {
    if !response.done {
        return Err(LlmError::Incomplete("not done".to_string()));
    }
    match response.done_reason.as_deref() {
        None | Some("stop") => {}
        Some(reason) => return Err(LlmError::Incomplete(reason.to_string())),
    }

    let text = response.response.trim();
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(text.to_string())
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama provider with a request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            params: GenerationParams::default(),
            client,
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Use different sampling parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails or times out
    /// - Generation stopped early or produced no text
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));

        let request_body = OllamaGenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: OllamaOptions {
                num_predict: max_tokens,
                temperature: self.params.temperature,
                top_p: self.params.top_p,
                top_k: self.params.top_k,
            },
        };

        debug!(model = %self.model, max_tokens, "Sending Ollama request");

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(model = %self.model, %status, "Ollama request failed");
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let parsed = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        completion_text(parsed)
    }
}

impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    async fn infer(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        self.generate(prompt, max_tokens).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
