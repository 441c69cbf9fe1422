//! The pipeline driver
//!
//! ```text
//! fetch → drop empty subjects → cap → classify → extract → reconcile
//! ```
//!
//! Work is strictly sequential. When a stage leaves nothing for the next
//! one, the run stops there and the report names that stage.

use crate::classifier::BatchClassifier;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extractor::Extractor;
use crate::prompt::PromptTemplates;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use serde::Serialize;
use statussync_domain::traits::{CollaboratorError, EmailSource, LlmProvider, TabularStore};
use statussync_domain::{Email, FetchWindow, RunId};
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Fetching from the email source
    Fetch,
    /// Dropping emails without a subject
    Filter,
    /// Classifying subjects
    Classify,
    /// Extracting records
    Extract,
    /// Merging records into the store
    Reconcile,
}

impl Stage {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Filter => "filter",
            Stage::Classify => "classify",
            Stage::Extract => "extract",
            Stage::Reconcile => "reconcile",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts and outcome of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Run identifier
    #[serde(serialize_with = "serialize_run_id")]
    pub run_id: RunId,
    /// Emails returned by the source
    pub fetched: usize,
    /// Emails with a non-empty subject
    pub with_subject: usize,
    /// Emails processed after the per-run cap
    pub processed: usize,
    /// Emails classified as job-related
    pub job_related: usize,
    /// Records extracted and marked as updates
    pub extracted: usize,
    /// Rows appended
    pub added: usize,
    /// Rows rewritten
    pub updated: usize,
    /// Records needing no write
    pub unchanged: usize,
    /// Records the store failed on
    pub failed: usize,
    /// Stage that left nothing to do, if the run stopped early
    pub stopped_at: Option<Stage>,
    /// Why the source returned nothing, if it failed
    pub fetch_error: Option<String>,
}

fn serialize_run_id<S: serde::Serializer>(id: &RunId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

impl PipelineReport {
    fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            fetched: 0,
            with_subject: 0,
            processed: 0,
            job_related: 0,
            extracted: 0,
            added: 0,
            updated: 0,
            unchanged: 0,
            failed: 0,
            stopped_at: None,
            fetch_error: None,
        }
    }

    fn record(&mut self, outcome: ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Added => self.added += 1,
            ReconcileOutcome::Updated => self.updated += 1,
            ReconcileOutcome::Unchanged => self.unchanged += 1,
        }
    }

    fn stop(mut self, stage: Stage) -> Self {
        info!(stage = %stage, "Nothing to do");
        self.stopped_at = Some(stage);
        self
    }

    /// Whether the run stopped before reconciling anything
    pub fn is_early_exit(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Number of rows written
    pub fn writes(&self) -> usize {
        self.added + self.updated
    }
}

/// Runs the full pipeline against its collaborators
///
/// The provider is shared by the classifier and extractor.
pub struct Pipeline<L, E, S>
where
    L: LlmProvider,
    E: EmailSource,
    S: TabularStore,
{
    source: E,
    classifier: BatchClassifier<L>,
    extractor: Extractor<L>,
    reconciler: Reconciler<S>,
    config: PipelineConfig,
}

impl<L, E, S> Pipeline<L, E, S>
where
    L: LlmProvider,
    E: EmailSource,
    S: TabularStore,
{
    /// Create a pipeline
    pub fn new(llm: L, source: E, store: S, templates: PromptTemplates, config: PipelineConfig) -> Self {
        Self::with_shared(Arc::new(llm), source, store, Arc::new(templates), config)
    }

    /// Create a pipeline from an already shared provider and templates
    pub fn with_shared(
        llm: Arc<L>,
        source: E,
        store: S,
        templates: Arc<PromptTemplates>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source,
            classifier: BatchClassifier::new(Arc::clone(&llm), Arc::clone(&templates), config.clone()),
            extractor: Extractor::new(llm, templates, config.clone()),
            reconciler: Reconciler::new(store, config.sheet_name.clone()),
            config,
        }
    }

    /// The reconciler and its store
    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Consume the pipeline, returning the store
    pub fn into_store(self) -> S {
        self.reconciler.into_store()
    }

    /// Run once over the messages in `window`
    ///
    /// # Errors
    ///
    /// Only authentication failures abort a run. Any other collaborator
    /// failure degrades to skipping the affected items.
    pub async fn run(&mut self, window: &FetchWindow) -> Result<PipelineReport, PipelineError> {
        let run_id = RunId::new();
        let span = info_span!("pipeline_run", run_id = %run_id);
        self.run_inner(run_id, window).instrument(span).await
    }

    async fn run_inner(&mut self, run_id: RunId, window: &FetchWindow) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::new(run_id);
        info!(
            start = %window.start_date,
            end = %window.end_date,
            max_results = window.max_results,
            "Starting run"
        );

        let emails = match self.source.fetch(window) {
            Ok(emails) => emails,
            Err(e) if e.is_authentication() => {
                return Err(PipelineError::authentication("email source", &e));
            }
            Err(e) => {
                warn!(error = %e, "Email source failed");
                report.fetch_error = Some(e.to_string());
                Vec::new()
            }
        };
        report.fetched = emails.len();
        info!(count = report.fetched, "Fetched emails");
        if emails.is_empty() {
            return Ok(report.stop(Stage::Fetch));
        }

        let mut emails: Vec<Email> = emails.into_iter().filter(Email::has_subject).collect();
        report.with_subject = emails.len();
        if emails.is_empty() {
            return Ok(report.stop(Stage::Filter));
        }
        emails.truncate(self.config.max_emails);
        report.processed = emails.len();

        let subjects: Vec<&str> = emails.iter().map(Email::subject).collect();
        let verdicts = self.classifier.classify_batch(&subjects).await?;
        let candidates: Vec<&Email> = emails
            .iter()
            .zip(&verdicts)
            .filter_map(|(email, &related)| related.then_some(email))
            .collect();
        report.job_related = candidates.len();
        info!(processed = report.processed, job_related = report.job_related, "Classified emails");
        if candidates.is_empty() {
            return Ok(report.stop(Stage::Classify));
        }

        let mut records = Vec::with_capacity(candidates.len());
        for email in candidates {
            match self.extractor.extract(email).await? {
                Some(record) if record.is_job_application_update => records.push(record),
                Some(record) => info!(
                    company = record.company(),
                    position = record.position(),
                    "Not an application update; skipping"
                ),
                None => {}
            }
        }
        report.extracted = records.len();
        info!(count = report.extracted, "Extracted records");
        if records.is_empty() {
            return Ok(report.stop(Stage::Extract));
        }

        for record in &records {
            match self.reconciler.upsert(record) {
                Ok(outcome) => {
                    info!(key = %record.unique_key(), outcome = %outcome, "Reconciled record");
                    report.record(outcome);
                }
                Err(e) if e.is_authentication() => {
                    return Err(PipelineError::authentication("tabular store", &e));
                }
                Err(e) => {
                    warn!(key = %record.unique_key(), error = %e, "Failed to reconcile record");
                    report.failed += 1;
                }
            }
        }

        info!(
            added = report.added,
            updated = report.updated,
            unchanged = report.unchanged,
            failed = report.failed,
            "Run complete"
        );
        Ok(report)
    }
}
