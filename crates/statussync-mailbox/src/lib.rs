//! StatusSync Mailbox Layer
//!
//! Implements the `EmailSource` trait over a JSON export of an inbox: an
//! array of `{subject, body, from, to, date, category?}` objects.
//!
//! A fetch keeps messages dated inside the window (start inclusive, end
//! exclusive) in the primary category, in file order, up to the window's
//! result cap. Messages without a category count as primary; messages
//! whose date cannot be read are skipped.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use statussync_domain::traits::EmailSource;
//! use statussync_domain::FetchWindow;
//! use statussync_mailbox::JsonMailbox;
//!
//! let mailbox = JsonMailbox::new("inbox.json");
//! let window = FetchWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
//!     20,
//! );
//! let emails = mailbox.fetch(&window).unwrap();
//! ```

#![warn(missing_docs)]

mod date;
mod entry;

use statussync_domain::traits::{CollaboratorError, EmailSource};
use statussync_domain::{Email, FetchWindow};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub use date::parse_date;
pub use entry::{MailboxEntry, PRIMARY_CATEGORY};

/// Errors that can occur while reading a mailbox export
#[derive(Error, Debug)]
pub enum MailboxError {
    /// Export could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export is not valid JSON of the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Fetch window is unusable
    #[error("Invalid window: {0}")]
    InvalidWindow(String),
}

impl CollaboratorError for MailboxError {
    fn is_authentication(&self) -> bool {
        matches!(self, MailboxError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

/// Email source over a JSON mailbox export
#[derive(Debug, Clone)]
pub struct JsonMailbox {
    path: PathBuf,
}

impl JsonMailbox {
    /// Create a mailbox reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the export
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry of the export, unfiltered
    pub fn entries(&self) -> Result<Vec<MailboxEntry>, MailboxError> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Filter entries to a window, in order, up to its cap
pub fn select(entries: Vec<MailboxEntry>, window: &FetchWindow) -> Vec<Email> {
    let mut selected = Vec::new();
    for entry in entries {
        if selected.len() >= window.max_results {
            break;
        }
        if !entry.is_primary() {
            debug!(category = ?entry.category, "Skipping non-primary message");
            continue;
        }
        match parse_date(&entry.date) {
            Some(day) if window.contains(day) => selected.push(entry.into_email()),
            Some(_) => {}
            None => debug!(date = %entry.date, "Skipping message with unreadable date"),
        }
    }
    selected
}

impl EmailSource for JsonMailbox {
    type Error = MailboxError;

    fn fetch(&self, window: &FetchWindow) -> Result<Vec<Email>, Self::Error> {
        window.validate().map_err(MailboxError::InvalidWindow)?;

        let entries = self.entries()?;
        let total = entries.len();
        let emails = select(entries, window);

        info!(
            path = %self.path.display(),
            total,
            selected = emails.len(),
            "Fetched mailbox export"
        );
        Ok(emails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(subject: &str, date: &str, category: Option<&str>) -> MailboxEntry {
        MailboxEntry {
            subject: subject.to_string(),
            body: String::new(),
            from: "jobs@example.com".to_string(),
            to: "me@example.com".to_string(),
            date: date.to_string(),
            category: category.map(String::from),
        }
    }

    fn window(max_results: usize) -> FetchWindow {
        FetchWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            max_results,
        )
    }

    #[test]
    fn test_window_bounds() {
        let entries = vec![
            entry("before", "2023-12-31", None),
            entry("first", "2024-01-01", None),
            entry("last", "2024-01-30", None),
            entry("end", "2024-01-31", None),
        ];
        let subjects: Vec<String> = select(entries, &window(20))
            .iter()
            .map(|e| e.subject().to_string())
            .collect();
        assert_eq!(subjects, vec!["first", "last"]);
    }

    #[test]
    fn test_non_primary_and_undated_are_skipped() {
        let entries = vec![
            entry("promo", "2024-01-02", Some("promotions")),
            entry("undated", "", None),
            entry("garbled", "someday", None),
            entry("kept", "2024-01-02", Some("Primary")),
        ];
        let emails = select(entries, &window(20));
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].subject(), "kept");
    }

    #[test]
    fn test_cap_applies_after_filtering() {
        let entries = vec![
            entry("promo", "2024-01-02", Some("social")),
            entry("a", "2024-01-02", None),
            entry("b", "2024-01-03", None),
            entry("c", "2024-01-04", None),
        ];
        let emails = select(entries, &window(2));
        let subjects: Vec<&str> = emails.iter().map(|e| e.subject()).collect();
        assert_eq!(subjects, vec!["a", "b"]);
    }

    #[test]
    fn test_permission_denied_is_authentication() {
        let err = MailboxError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(err.is_authentication());
        let err = MailboxError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(!err.is_authentication());
    }
}
