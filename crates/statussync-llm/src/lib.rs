//! StatusSync LLM Gateway Layer
//!
//! Pluggable inference backends behind the `LlmProvider` trait from
//! `statussync-domain`.
//!
//! # Contract
//!
//! `infer(prompt, max_tokens)` returns the first completion's text, trimmed.
//! It fails, without retrying, when the backend returns no completion, when
//! the completion stopped for any reason other than a natural stop, or when
//! the completion carries no text. Callers treat any failure as "could not
//! classify/extract this item", except [`LlmError::Authentication`], which
//! is fatal for a run.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Gemini `generateContent` API
//! - `OllamaProvider`: Local Ollama API
//! - `ConfiguredProvider`: whichever of the above a `ProviderConfig` selects
//!
//! # Examples
//!
//! ```
//! use statussync_llm::MockProvider;
//! use statussync_domain::traits::LlmProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("YES");
//! let result = provider.infer("test prompt", 10).await.unwrap();
//! assert_eq!(result, "YES");
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod gemini;
pub mod ollama;

use statussync_domain::traits::{CollaboratorError, LlmProvider};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use config::{ConfiguredProvider, GenerationParams, ProviderConfig, ProviderKind};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend returned no candidate completions
    #[error("No candidate completions returned")]
    NoCandidates,

    /// Completion stopped for a reason other than a natural stop
    #[error("Completion incomplete, finish reason: {0}")]
    Incomplete(String),

    /// Completion has no textual content
    #[error("Completion has no text content")]
    EmptyContent,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl CollaboratorError for LlmError {
    fn is_authentication(&self) -> bool {
        matches!(self, LlmError::Authentication(_))
    }
}

/// One call received by a [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Prompt as sent
    pub prompt: String,

    /// Token budget as sent
    pub max_tokens: u32,
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses without any network calls. A rule
/// matches when the prompt contains its fragment; rules are checked in the
/// order they were added, then the default applies.
///
/// # Examples
///
/// ```
/// use statussync_llm::{LlmError, MockProvider};
/// use statussync_domain::traits::LlmProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut provider = MockProvider::new("NO");
/// provider.add_response("Acme", "YES");
/// provider.add_failure("blocked", LlmError::Incomplete("SAFETY".into()));
///
/// assert_eq!(provider.infer("Subject: Acme", 10).await.unwrap(), "YES");
/// assert_eq!(provider.infer("Subject: Newsletter", 10).await.unwrap(), "NO");
/// assert!(provider.infer("blocked prompt", 10).await.is_err());
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Result<String, LlmError>,
    rules: Arc<Mutex<Vec<(String, Result<String, LlmError>)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(Ok(response.into()))
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_response: Result<String, LlmError>) -> Self {
        Self {
            default_response,
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Respond with `response` to prompts containing `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.push_rule(fragment.into(), Ok(response.into()));
    }

    /// Fail prompts containing `fragment` with `error`
    pub fn add_failure(&mut self, fragment: impl Into<String>, error: LlmError) {
        self.push_rule(fragment.into(), Err(error));
    }

    fn push_rule(&mut self, fragment: String, outcome: Result<String, LlmError>) {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push((fragment, outcome));
        }
    }

    /// Get the number of times infer was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Reset the recorded calls
    pub fn reset_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn respond(&self, prompt: &str) -> Result<String, LlmError> {
        let rules = self
            .rules
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock lock poisoned: {}", e)))?;
        let outcome = rules
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| self.default_response.clone());
        outcome.map(|text| text.trim().to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn infer(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                max_tokens,
            });
        }
        self.respond(prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
