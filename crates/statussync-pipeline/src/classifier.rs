//! Subject classification

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::parser::{is_yes, parse_batch_answers};
use crate::prompt::PromptTemplates;
use statussync_domain::traits::{CollaboratorError, LlmProvider};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decides which email subjects concern the user's job applications
///
/// Fails closed: when no answer can be obtained, every subject is `false`.
/// Only an authentication failure of the backend is returned as an error.
pub struct BatchClassifier<L: LlmProvider> {
    llm: Arc<L>,
    templates: Arc<PromptTemplates>,
    config: PipelineConfig,
}

impl<L: LlmProvider> BatchClassifier<L> {
    /// Create a classifier sharing a provider and templates
    pub fn new(llm: Arc<L>, templates: Arc<PromptTemplates>, config: PipelineConfig) -> Self {
        Self {
            llm,
            templates,
            config,
        }
    }

    /// Classify every subject in one gateway call
    ///
    /// The result has one verdict per input subject, in input order. Blank
    /// subjects are left out of the prompt and are always `false`; when
    /// every subject is blank the backend is not called.
    pub async fn classify_batch<S: AsRef<str>>(&self, subjects: &[S]) -> Result<Vec<bool>, PipelineError> {
        let mut verdicts = vec![false; subjects.len()];

        let positions: Vec<usize> = subjects
            .iter()
            .enumerate()
            .filter(|(_, subject)| !subject.as_ref().trim().is_empty())
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            debug!(subjects = subjects.len(), "No non-empty subjects to classify");
            return Ok(verdicts);
        }

        let listed: Vec<&str> = positions.iter().map(|&i| subjects[i].as_ref().trim()).collect();
        let prompt = match self.templates.batch_classification(&listed) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Cannot build batch classification prompt");
                return Ok(verdicts);
            }
        };

        let budget = self.config.batch_budget(listed.len());
        debug!(subjects = listed.len(), budget, "Sending batch classification");

        let response = match self.llm.infer(&prompt, budget).await {
            Ok(response) => response,
            Err(e) if e.is_authentication() => {
                return Err(PipelineError::authentication("inference backend", &e));
            }
            Err(e) => {
                warn!(error = %e, subjects = listed.len(), "Batch classification failed");
                return Ok(verdicts);
            }
        };

        let answers = parse_batch_answers(&response, listed.len());
        for (&position, answer) in positions.iter().zip(answers) {
            verdicts[position] = answer;
        }

        info!(
            subjects = subjects.len(),
            job_related = verdicts.iter().filter(|v| **v).count(),
            "Classified subjects"
        );
        Ok(verdicts)
    }

    /// Classify one subject in its own gateway call
    pub async fn classify(&self, subject: &str) -> Result<bool, PipelineError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(false);
        }

        let prompt = match self.templates.classification(subject) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "Cannot build classification prompt");
                return Ok(false);
            }
        };

        match self.llm.infer(&prompt, self.config.classification_max_tokens).await {
            Ok(response) => {
                let verdict = is_yes(&response);
                debug!(subject, verdict, "Classified subject");
                Ok(verdict)
            }
            Err(e) if e.is_authentication() => Err(PipelineError::authentication("inference backend", &e)),
            Err(e) => {
                warn!(error = %e, subject, "Classification failed");
                Ok(false)
            }
        }
    }
}
