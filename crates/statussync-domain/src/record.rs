//! Record module - structured fields extracted from one email

use crate::key::UniqueKey;
use crate::status::ApplicationStatus;

/// Sentinel written to the sheet for fields that could not be determined
pub const UNKNOWN: &str = "unknown";

/// Structured status of one job application, as extracted from one email
///
/// Text fields are `None` when not determinable. They are rendered as
/// [`UNKNOWN`] only when written to a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationStatusRecord {
    /// Hiring company
    pub company_name: Option<String>,

    /// Position applied for
    pub position_title: Option<String>,

    /// Where the position is based
    pub position_location: Option<String>,

    /// Current status of the application
    pub status: ApplicationStatus,

    /// Date of the action the email reports, as the model wrote it
    pub action_date: Option<String>,

    /// Whether the email reports a change in application state
    pub is_job_application_update: bool,
}

impl ApplicationStatusRecord {
    /// Create a record with the identifying fields and a status
    pub fn new(
        company_name: impl Into<String>,
        position_title: impl Into<String>,
        status: ApplicationStatus,
    ) -> Self {
        Self {
            company_name: known(company_name.into()),
            position_title: known(position_title.into()),
            status,
            ..Self::default()
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.position_location = known(location.into());
        self
    }

    /// Set the action date
    pub fn with_action_date(mut self, action_date: impl Into<String>) -> Self {
        self.action_date = known(action_date.into());
        self
    }

    /// Mark the record as a job application update
    pub fn as_update(mut self) -> Self {
        self.is_job_application_update = true;
        self
    }

    /// The key identifying this application across emails
    pub fn unique_key(&self) -> UniqueKey {
        UniqueKey::new(self.company(), self.position())
    }

    /// Company as written to the sheet
    pub fn company(&self) -> &str {
        self.company_name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Position as written to the sheet
    pub fn position(&self) -> &str {
        self.position_title.as_deref().unwrap_or(UNKNOWN)
    }

    /// Location as written to the sheet
    pub fn location(&self) -> &str {
        self.position_location.as_deref().unwrap_or(UNKNOWN)
    }

    /// Action date as written to the sheet
    pub fn date(&self) -> &str {
        self.action_date.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Treat empty text and the `"unknown"` sentinel as absent
///
/// # Examples
///
/// ```
/// use statussync_domain::record::known;
///
/// assert_eq!(known(" Acme ".to_string()), Some("Acme".to_string()));
/// assert_eq!(known("Unknown".to_string()), None);
/// assert_eq!(known("  ".to_string()), None);
/// ```
pub fn known(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN) {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = ApplicationStatusRecord::default();
        assert_eq!(record.status, ApplicationStatus::Unknown);
        assert!(!record.is_job_application_update);
        assert_eq!(record.company(), UNKNOWN);
        assert_eq!(record.location(), UNKNOWN);
    }

    #[test]
    fn test_builder_drops_sentinel_values() {
        let record = ApplicationStatusRecord::new("Acme", "Engineer", ApplicationStatus::Applied)
            .with_location("unknown")
            .with_action_date("2023-09-12");
        assert_eq!(record.position_location, None);
        assert_eq!(record.action_date.as_deref(), Some("2023-09-12"));
    }

    #[test]
    fn test_unique_key_of_record() {
        let record = ApplicationStatusRecord::new(" Acme ", "ENGINEER", ApplicationStatus::Offer);
        assert_eq!(record.unique_key().as_str(), "acme|engineer");
    }

    #[test]
    fn test_missing_identity_uses_sentinel_in_key() {
        let record = ApplicationStatusRecord::new("", "Engineer", ApplicationStatus::Applied);
        assert_eq!(record.unique_key().as_str(), "unknown|engineer");
    }
}
