//! Email module - messages handed to the pipeline by an email source

use chrono::NaiveDate;

/// A single email message
///
/// All fields are plain text and trimmed on construction. Once built, an
/// email is never modified; the pipeline consumes it once for
/// classification and extraction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Email {
    subject: String,
    body: String,
    sender: String,
    recipient: String,
    date: String,
}

impl Email {
    /// Create a new email, trimming surrounding whitespace from every field
    ///
    /// # Examples
    ///
    /// ```
    /// use statussync_domain::Email;
    ///
    /// let email = Email::new("  Your application  ", "Thanks!\n", "jobs@acme.com", "", "");
    /// assert_eq!(email.subject(), "Your application");
    /// assert_eq!(email.body(), "Thanks!");
    /// ```
    pub fn new(
        subject: impl AsRef<str>,
        body: impl AsRef<str>,
        sender: impl AsRef<str>,
        recipient: impl AsRef<str>,
        date: impl AsRef<str>,
    ) -> Self {
        Self {
            subject: subject.as_ref().trim().to_string(),
            body: body.as_ref().trim().to_string(),
            sender: sender.as_ref().trim().to_string(),
            recipient: recipient.as_ref().trim().to_string(),
            date: date.as_ref().trim().to_string(),
        }
    }

    /// Subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Plain-text body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The `From` header
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// The `To` header
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// The `Date` header, as received
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Whether the subject line is empty
    pub fn has_subject(&self) -> bool {
        !self.subject.is_empty()
    }
}

/// Date window and result cap for a fetch from an email source
///
/// `start_date` is inclusive, `end_date` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// First day included
    pub start_date: NaiveDate,

    /// First day no longer included
    pub end_date: NaiveDate,

    /// Maximum number of messages to return
    pub max_results: usize,
}

impl FetchWindow {
    /// Create a new fetch window
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, max_results: usize) -> Self {
        Self {
            start_date,
            end_date,
            max_results,
        }
    }

    /// Whether a day falls inside the window
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start_date && day < self.end_date
    }

    /// Validate the window
    pub fn validate(&self) -> Result<(), String> {
        if self.end_date <= self.start_date {
            return Err(format!(
                "end date {} must be after start date {}",
                self.end_date, self.start_date
            ));
        }
        if self.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }
        Ok(())
    }
}
