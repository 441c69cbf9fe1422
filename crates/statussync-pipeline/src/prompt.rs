//! Prompt templates for classification and extraction
//!
//! Templates are plain text with `{name}` placeholders; `{{` and `}}` stand
//! for literal braces. Rendering fails on an unknown placeholder or a stray
//! brace, and the caller treats that like a gateway failure.

use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// The three named templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Classify one subject
    Classification,
    /// Classify a numbered list of subjects
    BatchClassification,
    /// Extract fields from one email
    Extraction,
}

impl TemplateKind {
    /// All template kinds
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::Classification,
        TemplateKind::BatchClassification,
        TemplateKind::Extraction,
    ];

    /// File name of the template inside a template directory
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::Classification => "classification_template.txt",
            TemplateKind::BatchClassification => "batch_classification_template.txt",
            TemplateKind::Extraction => "extraction_template.txt",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::Classification => "classification",
            TemplateKind::BatchClassification => "batch classification",
            TemplateKind::Extraction => "extraction",
        };
        f.write_str(name)
    }
}

/// Errors building a prompt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template was never loaded
    #[error("Template not available: {0}")]
    Missing(TemplateKind),

    /// Placeholder with no value
    #[error("Unknown placeholder: {{{0}}}")]
    UnknownPlaceholder(String),

    /// `{` without a closing `}`
    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),

    /// `}` that is neither doubled nor closing a placeholder
    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),

    /// Template directory could not be read
    #[error("Template directory error: {0}")]
    Directory(String),
}

/// Substitute `values` into `template` in a single pass
///
/// Substituted values are not scanned again, so braces inside them are
/// kept verbatim.
///
/// # Examples
///
/// ```
/// use statussync_pipeline::prompt::render;
///
/// let prompt = render("Subject: {email_subject} {{json}}", &[("email_subject", "Hi {you}")]).unwrap();
/// assert_eq!(prompt, "Subject: Hi {you} {json}");
/// assert!(render("{missing}", &[]).is_err());
/// ```
pub fn render(template: &str, values: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, ch)) => name.push(ch),
                        None => return Err(TemplateError::Unterminated(at)),
                    }
                }
                let value = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or(TemplateError::UnknownPlaceholder(name))?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnmatchedBrace(at));
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Subjects as a numbered list, one per line: `1. subject`
pub fn numbered_list<S: AsRef<str>>(subjects: &[S]) -> String {
    subjects
        .iter()
        .enumerate()
        .map(|(i, subject)| format!("{}. {}", i + 1, subject.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// At most the first `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// The set of loaded templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplates {
    classification: Option<String>,
    batch_classification: Option<String>,
    extraction: Option<String>,
}

impl PromptTemplates {
    /// No templates loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Templates compiled into the binary
    pub fn builtin() -> Self {
        Self::empty()
            .with_template(
                TemplateKind::Classification,
                include_str!("../prompt_templates/classification_template.txt"),
            )
            .with_template(
                TemplateKind::BatchClassification,
                include_str!("../prompt_templates/batch_classification_template.txt"),
            )
            .with_template(
                TemplateKind::Extraction,
                include_str!("../prompt_templates/extraction_template.txt"),
            )
    }

    /// Load templates from a directory
    ///
    /// A missing file leaves that template unavailable; only an unreadable
    /// directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, TemplateError> {
        if !dir.is_dir() {
            return Err(TemplateError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut templates = Self::empty();
        for kind in TemplateKind::ALL {
            let path = dir.join(kind.file_name());
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(template = %kind, path = %path.display(), "Loaded template");
                    templates = templates.with_template(kind, text);
                }
                Err(e) => warn!(template = %kind, path = %path.display(), error = %e, "Template not loaded"),
            }
        }
        Ok(templates)
    }

    /// Set one template
    pub fn with_template(mut self, kind: TemplateKind, text: impl Into<String>) -> Self {
        *self.slot(kind) = Some(text.into());
        self
    }

    fn slot(&mut self, kind: TemplateKind) -> &mut Option<String> {
        match kind {
            TemplateKind::Classification => &mut self.classification,
            TemplateKind::BatchClassification => &mut self.batch_classification,
            TemplateKind::Extraction => &mut self.extraction,
        }
    }

    /// Text of one template
    pub fn get(&self, kind: TemplateKind) -> Result<&str, TemplateError> {
        let text = match kind {
            TemplateKind::Classification => &self.classification,
            TemplateKind::BatchClassification => &self.batch_classification,
            TemplateKind::Extraction => &self.extraction,
        };
        text.as_deref().ok_or(TemplateError::Missing(kind))
    }

    /// Whether a template is loaded
    pub fn has(&self, kind: TemplateKind) -> bool {
        self.get(kind).is_ok()
    }

    /// Prompt classifying one subject
    pub fn classification(&self, subject: &str) -> Result<String, TemplateError> {
        render(
            self.get(TemplateKind::Classification)?,
            &[("email_subject", subject)],
        )
    }

    /// Prompt classifying a list of subjects
    pub fn batch_classification<S: AsRef<str>>(&self, subjects: &[S]) -> Result<String, TemplateError> {
        let listed = numbered_list(subjects);
        render(
            self.get(TemplateKind::BatchClassification)?,
            &[("email_subjects", &listed)],
        )
    }

    /// Prompt extracting fields from one email
    ///
    /// Only the first `max_body_chars` characters of the body are used.
    pub fn extraction(
        &self,
        subject: &str,
        sender: &str,
        body: &str,
        max_body_chars: usize,
    ) -> Result<String, TemplateError> {
        render(
            self.get(TemplateKind::Extraction)?,
            &[
                ("email_subject", subject),
                ("email_sender", sender),
                ("email_body", truncate_chars(body, max_body_chars)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_escapes() {
        let out = render("{{\"a\": \"{v}\"}}", &[("v", "1")]).unwrap();
        assert_eq!(out, "{\"a\": \"1\"}");
    }

    #[test]
    fn test_render_errors() {
        assert_eq!(
            render("Hello {name}", &[]).unwrap_err(),
            TemplateError::UnknownPlaceholder("name".to_string())
        );
        assert_eq!(render("Hello {name", &[("name", "x")]).unwrap_err(), TemplateError::Unterminated(6));
        assert_eq!(render("a } b", &[]).unwrap_err(), TemplateError::UnmatchedBrace(2));
        assert!(matches!(render("{}", &[]), Err(TemplateError::UnknownPlaceholder(_))));
    }

    #[test]
    fn test_numbered_list() {
        assert_eq!(numbered_list(&["a", "b"]), "1. a\n2. b");
        assert_eq!(numbered_list::<&str>(&[]), "");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_builtin_templates_render() {
        let templates = PromptTemplates::builtin();
        for kind in TemplateKind::ALL {
            assert!(templates.has(kind), "{} missing", kind);
        }
        assert!(templates.classification("Your application").unwrap().contains("Your application"));
        assert!(templates.batch_classification(&["x", "y"]).unwrap().contains("2. y"));
        let prompt = templates
            .extraction("Offer", "hr@acme.com", "Welcome aboard", 1500)
            .unwrap();
        assert!(prompt.contains("hr@acme.com"));
        assert!(prompt.contains("Welcome aboard"));
    }

    #[test]
    fn test_missing_template() {
        let templates = PromptTemplates::empty().with_template(TemplateKind::Classification, "{email_subject}");
        assert_eq!(templates.classification("x").unwrap(), "x");
        assert_eq!(
            templates.extraction("s", "f", "b", 10).unwrap_err(),
            TemplateError::Missing(TemplateKind::Extraction)
        );
    }

    #[test]
    fn test_load_dir_with_partial_templates() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("classification_template.txt"),
            "Is this job related? {email_subject}",
        )
        .unwrap();

        let templates = PromptTemplates::load_dir(dir.path()).unwrap();
        assert!(templates.has(TemplateKind::Classification));
        assert!(!templates.has(TemplateKind::BatchClassification));
        assert!(!templates.has(TemplateKind::Extraction));
    }

    #[test]
    fn test_load_dir_rejects_missing_dir() {
        let result = PromptTemplates::load_dir(Path::new("/nonexistent/templates"));
        assert!(matches!(result, Err(TemplateError::Directory(_))));
    }
}
