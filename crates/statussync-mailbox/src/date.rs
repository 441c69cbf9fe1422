//! Date header parsing

use chrono::{DateTime, NaiveDate};

const DAY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Calendar day of a date header, in the sender's offset
///
/// Accepts RFC 2822 (with or without a trailing `(zone)` comment),
/// RFC 3339, `YYYY-MM-DD` and `YYYY/MM/DD`.
///
/// # Examples
///
/// ```
/// use statussync_mailbox::parse_date;
///
/// let day = parse_date("Tue, 2 Jan 2024 09:15:00 -0500 (EST)").unwrap();
/// assert_eq!(day.to_string(), "2024-01-02");
/// assert!(parse_date("next tuesday").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let without_comment = match raw.rfind(" (") {
        Some(at) if raw.ends_with(')') => &raw[..at],
        _ => raw,
    };
    if let Ok(dt) = DateTime::parse_from_rfc2822(without_comment) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DAY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(parse_date("Mon, 15 Jan 2024 10:00:00 +0000"), day(2024, 1, 15));
        assert_eq!(parse_date("Mon, 15 Jan 2024 10:00:00 +0000 (UTC)"), day(2024, 1, 15));
    }

    #[test]
    fn test_rfc3339_keeps_sender_offset() {
        assert_eq!(parse_date("2024-01-15T23:30:00-08:00"), day(2024, 1, 15));
    }

    #[test]
    fn test_plain_days() {
        assert_eq!(parse_date("2024-03-09"), day(2024, 3, 9));
        assert_eq!(parse_date(" 2024/03/09 "), day(2024, 3, 9));
    }

    #[test]
    fn test_unreadable() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}
