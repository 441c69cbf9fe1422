//! Status module - lifecycle states of a job application

use std::fmt;

/// Status of a job application
///
/// A closed enumeration. Anything a model reports outside this set maps to
/// [`ApplicationStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplicationStatus {
    /// Application submitted
    Applied,

    /// Application turned down
    Rejected,

    /// An interview has been booked
    InterviewScheduled,

    /// An interview took place
    InterviewCompleted,

    /// An offer was extended
    Offer,

    /// The candidate accepted an offer
    OfferAccepted,

    /// The candidate declined an offer
    OfferDeclined,

    /// The candidate withdrew
    Withdrawn,

    /// The process is paused
    OnHold,

    /// Not determinable
    #[default]
    Unknown,
}

impl ApplicationStatus {
    /// Every status, in lifecycle order
    pub const ALL: [ApplicationStatus; 10] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Rejected,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::InterviewCompleted,
        ApplicationStatus::Offer,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::OfferDeclined,
        ApplicationStatus::Withdrawn,
        ApplicationStatus::OnHold,
        ApplicationStatus::Unknown,
    ];

    /// Get the status name as stored in the sheet
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::InterviewCompleted => "interview_completed",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::OfferAccepted => "offer_accepted",
            ApplicationStatus::OfferDeclined => "offer_declined",
            ApplicationStatus::Withdrawn => "withdrawn",
            ApplicationStatus::OnHold => "on_hold",
            ApplicationStatus::Unknown => "unknown",
        }
    }

    /// Parse a status, tolerating case, spaces and hyphens
    ///
    /// `"Interview Scheduled"` and `"interview-scheduled"` both parse to
    /// [`ApplicationStatus::InterviewScheduled`].
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
    }

    /// Parse a status, falling back to `Unknown` for unrecognized text
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or(ApplicationStatus::Unknown)
    }

    /// Whether this status carries information
    pub fn is_known(&self) -> bool {
        *self != ApplicationStatus::Unknown
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid application status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_formatting() {
        assert_eq!(
            ApplicationStatus::parse(" Interview Scheduled "),
            Some(ApplicationStatus::InterviewScheduled)
        );
        assert_eq!(
            ApplicationStatus::parse("on-hold"),
            Some(ApplicationStatus::OnHold)
        );
        assert_eq!(ApplicationStatus::parse("OFFER"), Some(ApplicationStatus::Offer));
    }

    #[test]
    fn test_unrecognized_status() {
        assert_eq!(ApplicationStatus::parse("ghosted"), None);
        assert_eq!(ApplicationStatus::parse_lossy("ghosted"), ApplicationStatus::Unknown);
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_unknown_is_default() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Unknown);
        assert!(!ApplicationStatus::Unknown.is_known());
        assert!(ApplicationStatus::Applied.is_known());
    }
}
