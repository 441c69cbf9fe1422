//! Parse model output into verdicts and records

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use statussync_domain::record::known;
use statussync_domain::{ApplicationStatus, ApplicationStatusRecord};
use thiserror::Error;

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("JSON object pattern is valid"));

static YES_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\byes\b").expect("YES pattern is valid"));

/// Keys every extraction response must carry as strings
pub const REQUIRED_KEYS: [&str; 3] = ["company_name", "position_title", "status"];

/// Reasons an extraction response yields no record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No `{...}` span in the response
    #[error("No JSON object found in response")]
    NoJsonObject,

    /// The span is not a JSON object
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A required key is absent or not a string
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// The first `{...}` span containing no `}` before its end
///
/// Nested objects are not supported: the span ends at the first `}`.
///
/// # Examples
///
/// ```
/// use statussync_pipeline::parser::extract_json_object;
///
/// let text = "Sure! Here it is:\n```json\n{\"a\": \"b\"}\n```";
/// assert_eq!(extract_json_object(text), Some("{\"a\": \"b\"}"));
/// assert_eq!(extract_json_object("{}"), None);
/// ```
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Whether a line of model output says YES, as a whole word in any case
pub fn is_yes(line: &str) -> bool {
    YES_WORD.is_match(line)
}

/// Map a batch classification response onto `expected` answers
///
/// Line `i` answers subject `i`, so a blank line is a `false` answer in
/// its own slot. Missing answers are `false`; lines past `expected` are
/// discarded.
pub fn parse_batch_answers(response: &str, expected: usize) -> Vec<bool> {
    let mut answers: Vec<bool> = response
        .lines()
        .take(expected)
        .map(is_yes)
        .collect();
    answers.resize(expected, false);
    answers
}

fn required<'a>(object: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, ParseError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingField(key))
}

fn optional(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .and_then(|value| known(value.to_string()))
}

/// Parse an extraction response into a record
///
/// # Errors
///
/// Fails when the response holds no JSON object span, the span is not a
/// JSON object, or a required key is absent or not a string.
pub fn parse_extraction(response: &str) -> Result<ApplicationStatusRecord, ParseError> {
    let span = extract_json_object(response).ok_or(ParseError::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(span).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ParseError::InvalidJson("not an object".to_string()))?;

    let company = required(object, "company_name")?;
    let position = required(object, "position_title")?;
    let status = required(object, "status")?;

    let is_update = object
        .get("is_job_application_update")
        .and_then(Value::as_str)
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("yes"));

    Ok(ApplicationStatusRecord {
        company_name: known(company.to_string()),
        position_title: known(position.to_string()),
        position_location: optional(object, "position_location"),
        status: ApplicationStatus::parse_lossy(status),
        action_date: optional(object, "action_date"),
        is_job_application_update: is_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "company_name": " Acme Corp ",
        "position_title": "Software Engineer",
        "position_location": "Remote",
        "status": "Interview Scheduled",
        "action_date": "2024-01-15",
        "is_job_application_update": " Yes "
    }"#;

    #[test]
    fn test_extract_span_from_chatter() {
        let text = format!("Here you go:\n```json\n{}\n```\nanything else?", FULL);
        let span = extract_json_object(&text).unwrap();
        assert!(span.starts_with('{'));
        assert!(span.ends_with('}'));
        assert!(span.contains("Acme Corp"));
    }

    #[test]
    fn test_span_stops_at_first_closing_brace() {
        let text = r#"{"a": {"b": "c"}, "d": "e"}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a": {"b": "c"}"#));
    }

    #[test]
    fn test_parse_full_record() {
        let record = parse_extraction(FULL).unwrap();
        assert_eq!(record.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(record.position_title.as_deref(), Some("Software Engineer"));
        assert_eq!(record.position_location.as_deref(), Some("Remote"));
        assert_eq!(record.status, ApplicationStatus::InterviewScheduled);
        assert_eq!(record.action_date.as_deref(), Some("2024-01-15"));
        assert!(record.is_job_application_update);
    }

    #[test]
    fn test_unknown_values_are_absent() {
        let response = r#"{"company_name": "Acme", "position_title": "UNKNOWN",
            "position_location": "unknown", "status": "ghosted", "action_date": ""}"#;
        let record = parse_extraction(response).unwrap();
        assert_eq!(record.position_title, None);
        assert_eq!(record.position_location, None);
        assert_eq!(record.action_date, None);
        assert_eq!(record.status, ApplicationStatus::Unknown);
        assert!(!record.is_job_application_update);
    }

    #[test]
    fn test_missing_required_key() {
        let response = r#"{"company_name": "Acme", "status": "applied"}"#;
        assert_eq!(
            parse_extraction(response).unwrap_err(),
            ParseError::MissingField("position_title")
        );
    }

    #[test]
    fn test_non_string_required_key() {
        let response = r#"{"company_name": 42, "position_title": "Engineer", "status": "applied"}"#;
        assert_eq!(
            parse_extraction(response).unwrap_err(),
            ParseError::MissingField("company_name")
        );
    }

    #[test]
    fn test_only_yes_marks_update() {
        for (value, expected) in [("\"yes\"", true), ("\"YES\"", true), ("\"no\"", false), ("\"yes!\"", false), ("true", false)] {
            let response = format!(
                r#"{{"company_name": "A", "position_title": "B", "status": "applied", "is_job_application_update": {}}}"#,
                value
            );
            let record = parse_extraction(&response).unwrap();
            assert_eq!(record.is_job_application_update, expected, "value {}", value);
        }
    }

    #[test]
    fn test_no_json_and_bad_json() {
        assert_eq!(parse_extraction("no idea").unwrap_err(), ParseError::NoJsonObject);
        assert!(matches!(
            parse_extraction("{company_name: Acme}"),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_batch_answers() {
        assert_eq!(parse_batch_answers("YES\nNO", 3), vec![true, false, false]);
        assert_eq!(parse_batch_answers("yes\n\n  \nno\nYes.", 5), vec![true, false, false, false, true]);
        assert_eq!(parse_batch_answers("YES\nYES\nYES", 2), vec![true, true]);
        assert_eq!(parse_batch_answers("", 2), vec![false, false]);
    }

    #[test]
    fn test_blank_line_keeps_later_answers_in_place() {
        assert_eq!(parse_batch_answers("YES\n\nYES", 3), vec![true, false, true]);
        assert_eq!(parse_batch_answers("NO\n   \nYES\nNO", 4), vec![false, false, true, false]);
    }

    #[test]
    fn test_yes_is_a_whole_word() {
        assert!(is_yes("1. YES"));
        assert!(is_yes("yes"));
        assert!(!is_yes("YESTERDAY"));
        assert!(!is_yes("eyes"));
        assert!(!is_yes("NO"));
    }
}
