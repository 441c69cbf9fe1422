//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use statussync_llm::ProviderConfig;
use statussync_pipeline::{PipelineConfig, PromptTemplates};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Inference backend
    #[serde(default)]
    pub llm: ProviderConfig,

    /// Pipeline stages
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Tabular store
    #[serde(default)]
    pub store: StoreSettings,

    /// Email source
    #[serde(default)]
    pub mailbox: MailboxSettings,

    /// Prompt templates
    #[serde(default)]
    pub prompts: PromptSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Tabular store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite database path
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

/// Email source settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailboxSettings {
    /// JSON mailbox export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Prompt template settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Directory of template files; built-in templates when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the configuration and default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".statussync"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate().map_err(|e| CliError::Config(format!("[llm] {}", e)))?;
        self.pipeline
            .validate()
            .map_err(|e| CliError::Config(format!("[pipeline] {}", e)))?;
        Ok(())
    }

    /// Configured prompt templates.
    pub fn templates(&self) -> Result<PromptTemplates> {
        match &self.prompts.dir {
            Some(dir) => Ok(PromptTemplates::load_dir(dir)?),
            None => Ok(PromptTemplates::builtin()),
        }
    }

    /// Configured mailbox export.
    pub fn mailbox_path(&self) -> Result<&Path> {
        self.mailbox
            .path
            .as_deref()
            .ok_or_else(|| CliError::Config("No mailbox export configured; set [mailbox] path or pass --mailbox".into()))
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_store_path() -> PathBuf {
    Config::dir()
        .unwrap_or_else(|_| PathBuf::from(".statussync"))
        .join("statussync.db")
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use statussync_llm::ProviderKind;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.pipeline.sheet_name, "Sheet1");
        assert!(config.validate().is_ok());
        assert!(config.mailbox_path().is_err());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [llm]
            provider = "ollama"
            model = "llama3"

            [pipeline]
            max_emails = 5

            [mailbox]
            path = "/tmp/inbox.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.pipeline.max_emails, 5);
        assert_eq!(config.pipeline.max_body_chars, 1500);
        assert_eq!(config.mailbox_path().unwrap(), Path::new("/tmp/inbox.json"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.pipeline.sheet_name = "Applications".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.pipeline.sheet_name, "Applications");
        assert_eq!(loaded.store.path, config.store.path);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.pipeline.max_emails, 20);
    }

    #[test]
    fn test_invalid_section_is_reported() {
        let mut config = Config::default();
        config.pipeline.max_emails = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[pipeline]"));
    }
}
