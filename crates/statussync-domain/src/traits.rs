//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and its
//! collaborators. Implementations live in other crates.

use crate::email::{Email, FetchWindow};
use crate::row::{SheetRow, StoredRow};
use std::future::Future;

/// Common behavior of collaborator errors
///
/// Most collaborator failures are per-item and recoverable. Authentication
/// failures point at configuration and abort the run.
pub trait CollaboratorError: std::error::Error + Send + Sync + 'static {
    /// Whether the failure is an authentication/authorization failure
    fn is_authentication(&self) -> bool;
}

/// Trait for natural-language inference backends
///
/// Implemented by the infrastructure layer (statussync-llm)
pub trait LlmProvider {
    /// Error type for inference operations
    type Error: CollaboratorError;

    /// Send a fully rendered prompt and return the first completion, trimmed
    ///
    /// Fails when the backend returns no completion, stops for any reason
    /// other than a natural stop, or returns no text. Implementations do not
    /// retry.
    fn infer(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model behind this provider, for logging
    fn model_name(&self) -> &str;
}

/// Trait for sources of inbox messages
///
/// Implemented by the infrastructure layer (statussync-mailbox)
pub trait EmailSource {
    /// Error type for fetch operations
    type Error: CollaboratorError;

    /// Fetch primary-inbox messages inside a date window, in source order
    fn fetch(&self, window: &FetchWindow) -> Result<Vec<Email>, Self::Error>;
}

/// Trait for the tabular store holding application rows
///
/// Implemented by the infrastructure layer (statussync-store)
pub trait TabularStore {
    /// Error type for store operations
    type Error: CollaboratorError;

    /// Read every data row of a sheet, in row order
    fn read_all(&self, sheet: &str) -> Result<Vec<StoredRow>, Self::Error>;

    /// Append a row after the last data row
    fn append_row(&mut self, sheet: &str, row: &SheetRow) -> Result<(), Self::Error>;

    /// Overwrite the row at `row_number`
    fn update_row(&mut self, sheet: &str, row_number: usize, row: &SheetRow) -> Result<(), Self::Error>;
}
