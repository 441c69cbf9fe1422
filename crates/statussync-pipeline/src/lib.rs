//! StatusSync Pipeline
//!
//! Turns inbox messages into a deduplicated table of job application
//! statuses.
//!
//! # Architecture
//!
//! ```text
//! EmailSource → BatchClassifier → Extractor → Reconciler → TabularStore
//!                       ╲             ╱
//!                        LlmProvider
//! ```
//!
//! # Key Features
//!
//! - **Batch classification**: one gateway call decides which subjects are
//!   job-related, failing closed
//! - **Extraction**: one gateway call per candidate email, parsed from the
//!   first JSON object span in the response
//! - **Reconciliation**: upsert keyed by normalized `company|position`,
//!   never overwriting known data with unknown data
//! - **Driver**: sequential run with early exit and a run report
//!
//! # Example Usage
//!
//! ```no_run
//! use statussync_domain::traits::EmailSource;
//! use statussync_domain::{Email, FetchWindow};
//! use statussync_llm::MockProvider;
//! use statussync_pipeline::{Pipeline, PipelineConfig, PromptTemplates};
//! use statussync_store::MemorySheetStore;
//!
//! # async fn example(source: impl EmailSource, window: FetchWindow) -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("YES");
//! let mut pipeline = Pipeline::new(
//!     llm,
//!     source,
//!     MemorySheetStore::new(),
//!     PromptTemplates::builtin(),
//!     PipelineConfig::default(),
//! );
//!
//! let report = pipeline.run(&window).await?;
//! println!("Added: {}, updated: {}", report.added, report.updated);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod driver;
mod error;
mod extractor;
pub mod parser;
pub mod prompt;
mod reconciler;


pub use classifier::BatchClassifier;
pub use config::PipelineConfig;
pub use driver::{Pipeline, PipelineReport, Stage};
pub use error::PipelineError;
pub use extractor::Extractor;
pub use prompt::{PromptTemplates, TemplateError, TemplateKind};
pub use reconciler::{index_rows, merge, ReconcileOutcome, Reconciler};
