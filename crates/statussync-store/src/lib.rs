//! StatusSync Storage Layer
//!
//! Implements the `TabularStore` trait: a sheet of application rows with a
//! header at row 1 and data rows from row 2.
//!
//! # Stores
//!
//! - `SqliteSheetStore`: persistent sheets in a SQLite database
//! - `MemorySheetStore`: in-memory sheets with failure injection, for tests
//!
//! # Examples
//!
//! ```no_run
//! use statussync_store::SqliteSheetStore;
//!
//! let store = SqliteSheetStore::new("statussync.db").unwrap();
//! // Store is now ready for row operations
//! ```

#![warn(missing_docs)]

pub mod memory;
pub mod sqlite;

use statussync_domain::traits::CollaboratorError;
use thiserror::Error;

pub use memory::MemorySheetStore;
pub use sqlite::SqliteSheetStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Row number outside the sheet's data rows
    #[error("Row {row} is not a data row of sheet '{sheet}'")]
    RowOutOfRange {
        /// Sheet name
        sheet: String,
        /// Requested row number
        row: usize,
    },

    /// Store temporarily unreachable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl CollaboratorError for StoreError {
    fn is_authentication(&self) -> bool {
        matches!(self, StoreError::Authentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_authentication_is_fatal() {
        assert!(StoreError::Authentication("expired".into()).is_authentication());
        assert!(!StoreError::Unavailable("timeout".into()).is_authentication());
        assert!(!StoreError::RowOutOfRange { sheet: "Sheet1".into(), row: 1 }.is_authentication());
    }
}
