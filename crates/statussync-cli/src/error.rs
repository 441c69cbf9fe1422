//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inference backend error
    #[error("LLM error: {0}")]
    Llm(#[from] statussync_llm::LlmError),

    /// Tabular store error
    #[error("Store error: {0}")]
    Store(#[from] statussync_store::StoreError),

    /// Mailbox export error
    #[error("Mailbox error: {0}")]
    Mailbox(#[from] statussync_mailbox::MailboxError),

    /// Run aborted
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] statussync_pipeline::PipelineError),

    /// Prompt templates could not be loaded
    #[error("Template error: {0}")]
    Template(#[from] statussync_pipeline::TemplateError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
