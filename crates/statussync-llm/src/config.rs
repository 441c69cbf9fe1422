//! Provider configuration and selection

use crate::{GeminiProvider, LlmError, MockProvider, OllamaProvider};
use serde::{Deserialize, Serialize};
use statussync_domain::traits::LlmProvider;
use std::time::Duration;

/// Sampling parameters sent with every request
///
/// These are tuning knobs, not part of any contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling threshold
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,
}

impl Default for GenerationParams {
    /// Near-deterministic sampling suited to classification
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

impl GenerationParams {
    /// Validate the parameters
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if !(0.0..=1.0).contains(&self.top_p) || self.top_p == 0.0 {
            return Err(format!("top_p {} out of range (0.0, 1.0]", self.top_p));
        }
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Inference backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    #[default]
    Gemini,
    /// Local Ollama
    Ollama,
}

/// Configuration for the inference backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend to use
    #[serde(default)]
    pub provider: ProviderKind,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for the backend endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (Gemini only)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling parameters
    #[serde(default)]
    pub sampling: GenerationParams,
}

fn default_model() -> String {
    crate::gemini::DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    crate::gemini::DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: default_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            sampling: GenerationParams::default(),
        }
    }
}

impl ProviderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        self.sampling.validate()
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the configured provider, reading the API key from the environment
    pub fn build(&self) -> Result<ConfiguredProvider, LlmError> {
        let api_key = std::env::var(&self.api_key_env).ok();
        self.build_with_key(api_key.as_deref())
    }

    /// Build the configured provider with an explicit API key
    ///
    /// # Errors
    ///
    /// [`LlmError::Authentication`] when Gemini is selected and no key is given.
    pub fn build_with_key(&self, api_key: Option<&str>) -> Result<ConfiguredProvider, LlmError> {
        match self.provider {
            ProviderKind::Gemini => {
                let key = api_key.ok_or_else(|| {
                    LlmError::Authentication(format!(
                        "environment variable {} is not set",
                        self.api_key_env
                    ))
                })?;
                let mut provider = GeminiProvider::with_timeout(key, &self.model, self.timeout())?
                    .with_params(self.sampling);
                if let Some(endpoint) = &self.endpoint {
                    provider = provider.with_endpoint(endpoint);
                }
                Ok(ConfiguredProvider::Gemini(provider))
            }
            ProviderKind::Ollama => {
                let endpoint = self
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| crate::ollama::DEFAULT_ENDPOINT.to_string());
                let provider = OllamaProvider::with_timeout(endpoint, &self.model, self.timeout())?
                    .with_params(self.sampling);
                Ok(ConfiguredProvider::Ollama(provider))
            }
        }
    }
}

/// A provider selected at runtime
pub enum ConfiguredProvider {
    /// Google Gemini
    Gemini(GeminiProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Deterministic mock
    Mock(MockProvider),
}

impl From<MockProvider> for ConfiguredProvider {
    fn from(provider: MockProvider) -> Self {
        ConfiguredProvider::Mock(provider)
    }
}

impl LlmProvider for ConfiguredProvider {
    type Error = LlmError;

    async fn infer(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        match self {
            ConfiguredProvider::Gemini(provider) => provider.infer(prompt, max_tokens).await,
            ConfiguredProvider::Ollama(provider) => provider.infer(prompt, max_tokens).await,
            ConfiguredProvider::Mock(provider) => provider.infer(prompt, max_tokens).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            ConfiguredProvider::Gemini(provider) => provider.model_name(),
            ConfiguredProvider::Ollama(provider) => provider.model_name(),
            ConfiguredProvider::Mock(provider) => provider.model_name(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProviderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.sampling, GenerationParams::default());
    }

    #[test]
    fn test_invalid_sampling() {
        let mut config = ProviderConfig::default();
        config.sampling.top_p = 0.0;
        assert!(config.validate().is_err());

        let mut config = ProviderConfig::default();
        config.sampling.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gemini_without_key_is_authentication_error() {
        let config = ProviderConfig::default();
        let result = config.build_with_key(None);
        assert!(matches!(result, Err(LlmError::Authentication(_))));
    }

    #[test]
    fn test_build_ollama() {
        let config = ProviderConfig {
            provider: ProviderKind::Ollama,
            model: "llama3".to_string(),
            ..ProviderConfig::default()
        };
        let provider = config.build_with_key(None).unwrap();
        assert!(matches!(provider, ConfiguredProvider::Ollama(_)));
        assert_eq!(provider.model_name(), "llama3");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ProviderConfig::from_toml("provider = \"ollama\"\nmodel = \"mistral\"\n").unwrap();
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.timeout_secs, crate::gemini::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ProviderConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ProviderConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.sampling, config.sampling);
    }

    #[tokio::test]
    async fn test_mock_dispatch() {
        let provider: ConfiguredProvider = MockProvider::new("YES").into();
        assert_eq!(provider.infer("anything", 5).await.unwrap(), "YES");
        assert_eq!(provider.model_name(), "mock");
    }
}
