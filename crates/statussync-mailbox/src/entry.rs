//! Export entries

use serde::{Deserialize, Serialize};
use statussync_domain::Email;

/// Category of messages the pipeline reads
pub const PRIMARY_CATEGORY: &str = "primary";

/// One message of a mailbox export
///
/// Missing text fields read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxEntry {
    /// Subject line
    #[serde(default)]
    pub subject: String,

    /// Plain-text body
    #[serde(default)]
    pub body: String,

    /// The `From` header
    #[serde(default)]
    pub from: String,

    /// The `To` header
    #[serde(default)]
    pub to: String,

    /// The `Date` header
    #[serde(default)]
    pub date: String,

    /// Inbox category, absent for uncategorized exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MailboxEntry {
    /// Whether the entry belongs to the primary inbox
    pub fn is_primary(&self) -> bool {
        self.category
            .as_deref()
            .map_or(true, |c| c.trim().eq_ignore_ascii_case(PRIMARY_CATEGORY))
    }

    /// Convert into a domain email
    pub fn into_email(self) -> Email {
        Email::new(self.subject, self.body, self.from, self.to, self.date)
    }
}
