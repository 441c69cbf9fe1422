//! Error types for the pipeline

use thiserror::Error;

/// Errors that abort a pipeline run
///
/// Per-item failures never surface here; they degrade to `false`, `None`
/// or a `failed` count.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A collaborator rejected its credentials
    #[error("Authentication failed for {collaborator}: {message}")]
    Authentication {
        /// Which collaborator failed
        collaborator: &'static str,
        /// Collaborator's error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn authentication(collaborator: &'static str, error: &dyn std::error::Error) -> Self {
        PipelineError::Authentication {
            collaborator,
            message: error.to_string(),
        }
    }
}
