//! Field extraction from one email

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::parse_extraction;
use crate::prompt::PromptTemplates;
use statussync_domain::traits::{CollaboratorError, LlmProvider};
use statussync_domain::{ApplicationStatusRecord, Email};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns one classified email into a structured record
pub struct Extractor<L: LlmProvider> {
    llm: Arc<L>,
    templates: Arc<PromptTemplates>,
    config: PipelineConfig,
}

impl<L: LlmProvider> Extractor<L> {
    /// Create an extractor sharing a provider and templates
    pub fn new(llm: Arc<L>, templates: Arc<PromptTemplates>, config: PipelineConfig) -> Self {
        Self {
            llm,
            templates,
            config,
        }
    }

    /// Extract the application fields of `email`
    ///
    /// Returns `Ok(None)` when the prompt cannot be built, the backend
    /// fails, or the response holds no usable JSON object. Only an
    /// authentication failure of the backend is an error.
    pub async fn extract(&self, email: &Email) -> Result<Option<ApplicationStatusRecord>, PipelineError> {
        let prompt = match self.templates.extraction(
            email.subject(),
            email.sender(),
            email.body(),
            self.config.max_body_chars,
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Cannot build extraction prompt");
                return Ok(None);
            }
        };

        let response = match self.llm.infer(&prompt, self.config.extraction_max_tokens).await {
            Ok(response) => response,
            Err(e) if e.is_authentication() => {
                return Err(PipelineError::authentication("inference backend", &e));
            }
            Err(e) => {
                warn!(error = %e, subject = email.subject(), "Extraction failed");
                return Ok(None);
            }
        };

        match parse_extraction(&response) {
            Ok(record) => {
                debug!(
                    company = record.company(),
                    position = record.position(),
                    status = %record.status,
                    update = record.is_job_application_update,
                    "Extracted record"
                );
                Ok(Some(record))
            }
            Err(e) => {
                warn!(error = %e, subject = email.subject(), "Unusable extraction response");
                Ok(None)
            }
        }
    }
}
