//! Configuration for the pipeline

use serde::{Deserialize, Serialize};

/// Configuration for the classification, extraction and reconciliation stages
///
/// Token budgets are per gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sheet holding application rows
    pub sheet_name: String,

    /// Maximum messages requested from the email source
    pub fetch_limit: usize,

    /// Maximum emails processed per run, after dropping empty subjects
    pub max_emails: usize,

    /// Body characters passed to the extraction prompt
    pub max_body_chars: usize,

    /// Token budget for extracting one email
    pub extraction_max_tokens: u32,

    /// Token budget for classifying one subject
    pub classification_max_tokens: u32,

    /// Tokens allowed per subject in a batch classification
    pub batch_tokens_per_subject: u32,

    /// Lower bound on a batch classification budget
    pub batch_min_tokens: u32,
}

impl PipelineConfig {
    /// Token budget for classifying `subjects` non-empty subjects in one call
    ///
    /// # Examples
    ///
    /// ```
    /// use statussync_pipeline::PipelineConfig;
    ///
    /// let config = PipelineConfig::default();
    /// assert_eq!(config.batch_budget(1), 50);
    /// assert_eq!(config.batch_budget(20), 100);
    /// ```
    pub fn batch_budget(&self, subjects: usize) -> u32 {
        let subjects = u32::try_from(subjects).unwrap_or(u32::MAX);
        self.batch_tokens_per_subject
            .saturating_mul(subjects)
            .max(self.batch_min_tokens)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sheet_name.trim().is_empty() {
            return Err("sheet_name must not be empty".to_string());
        }
        if self.fetch_limit == 0 {
            return Err("fetch_limit must be greater than 0".to_string());
        }
        if self.max_emails == 0 {
            return Err("max_emails must be greater than 0".to_string());
        }
        if self.max_body_chars == 0 {
            return Err("max_body_chars must be greater than 0".to_string());
        }
        if self.extraction_max_tokens == 0 || self.classification_max_tokens == 0 {
            return Err("token budgets must be greater than 0".to_string());
        }
        if self.batch_tokens_per_subject == 0 {
            return Err("batch_tokens_per_subject must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            fetch_limit: 100,
            max_emails: 20,
            max_body_chars: 1500,
            extraction_max_tokens: 500,
            classification_max_tokens: 10,
            batch_tokens_per_subject: 5,
            batch_min_tokens: 50,
        }
    }
}

impl PipelineConfig {
    /// Aggressive preset: fewer emails, shorter bodies, tighter budgets
    pub fn aggressive() -> Self {
        Self {
            fetch_limit: 50,
            max_emails: 10,
            max_body_chars: 1000,
            extraction_max_tokens: 300,
            batch_tokens_per_subject: 3,
            batch_min_tokens: 20,
            ..Self::default()
        }
    }

    /// Lenient preset: more emails, longer bodies, roomier budgets
    pub fn lenient() -> Self {
        Self {
            fetch_limit: 500,
            max_emails: 100,
            max_body_chars: 3000,
            extraction_max_tokens: 1000,
            classification_max_tokens: 20,
            batch_tokens_per_subject: 8,
            batch_min_tokens: 100,
            ..Self::default()
        }
    }

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
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_body_chars, 1500);
        assert_eq!(config.extraction_max_tokens, 500);
        assert_eq!(config.classification_max_tokens, 10);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::aggressive().validate().is_ok());
        assert!(PipelineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_max_emails() {
        let config = PipelineConfig {
            max_emails: 0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_batch_budget_scales_with_subjects() {
        let config = PipelineConfig::default();
        assert_eq!(config.batch_budget(0), config.batch_min_tokens);
        assert_eq!(config.batch_budget(10), 50);
        assert_eq!(config.batch_budget(11), 55);
        assert_eq!(config.batch_budget(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PipelineConfig::from_toml("max_emails = 5\n").unwrap();
        assert_eq!(config.max_emails, 5);
        assert_eq!(config.sheet_name, "Sheet1");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::lenient();
        let parsed = PipelineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
