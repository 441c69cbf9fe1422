//! StatusSync Domain Layer
//!
//! This crate contains the core data model for StatusSync and the trait
//! interfaces every other layer depends upon. It carries no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Email**: a trimmed, immutable message produced by an email source
//! - **ApplicationStatus**: the closed set of lifecycle states of a job application
//! - **ApplicationStatusRecord**: the structured fields extracted from one email
//! - **UniqueKey**: normalized `company|position` identity of one application
//! - **StoredRow**: a persisted sheet row together with its row number
//!
//! ## Architecture
//!
//! - Pure data and decision helpers only
//! - Collaborators (inference backend, email source, tabular store) are
//!   traits here and implemented in other crates
//! - Absent fields are `None`; the `"unknown"` sentinel exists only at the
//!   store-write boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod email;
pub mod key;
pub mod record;
pub mod row;
pub mod run;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use email::{Email, FetchWindow};
pub use key::UniqueKey;
pub use record::{ApplicationStatusRecord, UNKNOWN};
pub use row::{SheetRow, StoredRow, FIRST_DATA_ROW, HEADER, HEADER_ROW};
pub use run::RunId;
pub use status::ApplicationStatus;
