//! Integration tests for the statussync CLI

use chrono::NaiveDate;
use statussync_cli::commands::classify::classify_subjects;
use statussync_cli::commands::run::run_pipeline;
use statussync_cli::config::OutputFormat;
use statussync_cli::{Config, Formatter};
use statussync_domain::traits::TabularStore;
use statussync_domain::FetchWindow;
use statussync_llm::{LlmError, MockProvider};
use statussync_mailbox::JsonMailbox;
use statussync_pipeline::{PipelineConfig, PromptTemplates, Stage};
use statussync_store::SqliteSheetStore;
use std::fs;
use tempfile::TempDir;

const EXPORT: &str = r#"[
  {"subject": "Application received - Software Engineer", "body": "Thanks for applying to Acme.",
   "from": "jobs@acme.com", "to": "me@example.com", "date": "2024-01-15"},
  {"subject": "Weekly newsletter", "body": "Top stories.", "from": "news@example.com",
   "to": "me@example.com", "date": "2024-01-16"}
]"#;

const ACME_APPLIED: &str = r#"{"company_name": "Acme", "position_title": "Software Engineer",
  "position_location": "Remote", "status": "applied", "action_date": "2024-01-15",
  "is_job_application_update": "yes"}"#;

fn january() -> FetchWindow {
    FetchWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        100,
    )
}

fn llm() -> MockProvider {
    let mut llm = MockProvider::new("NO");
    llm.add_response("Subjects:", "YES\nNO");
    llm.add_response("Thanks for applying to Acme", ACME_APPLIED);
    llm
}

#[tokio::test]
async fn test_run_writes_to_sqlite() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("inbox.json");
    fs::write(&export, EXPORT).unwrap();
    let db = dir.path().join("statussync.db");

    let report = run_pipeline(
        llm(),
        JsonMailbox::new(&export),
        SqliteSheetStore::new(&db).unwrap(),
        PromptTemplates::builtin(),
        PipelineConfig::default(),
        &january(),
    )
    .await
    .unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.job_related, 1);
    assert_eq!(report.added, 1);
    assert!(!report.is_early_exit());

    let store = SqliteSheetStore::new(&db).unwrap();
    let rows = store.read_all("Sheet1").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].row_number, 2);
    assert_eq!(rows[0].row.company, "Acme");
    assert_eq!(rows[0].row.location, "Remote");

    // A second identical run finds nothing new to write.
    let report = run_pipeline(
        llm(),
        JsonMailbox::new(&export),
        SqliteSheetStore::new(&db).unwrap(),
        PromptTemplates::builtin(),
        PipelineConfig::default(),
        &january(),
    )
    .await
    .unwrap();
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.writes(), 0);
}

#[tokio::test]
async fn test_run_with_missing_export_reports_fetch_error() {
    let dir = TempDir::new().unwrap();

    let report = run_pipeline(
        llm(),
        JsonMailbox::new(dir.path().join("absent.json")),
        SqliteSheetStore::in_memory().unwrap(),
        PromptTemplates::builtin(),
        PipelineConfig::default(),
        &january(),
    )
    .await
    .unwrap();

    assert_eq!(report.stopped_at, Some(Stage::Fetch));
    assert!(report.fetch_error.is_some());

    let output = Formatter::new(OutputFormat::Table, false).format_report(&report).unwrap();
    assert!(output.contains("Email source failed"));
}

#[tokio::test]
async fn test_run_aborts_on_rejected_credentials() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("inbox.json");
    fs::write(&export, EXPORT).unwrap();

    let result = run_pipeline(
        MockProvider::failing(LlmError::Authentication("bad key".into())),
        JsonMailbox::new(&export),
        SqliteSheetStore::in_memory().unwrap(),
        PromptTemplates::builtin(),
        PipelineConfig::default(),
        &january(),
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_classify_subjects_pairs_verdicts() {
    let verdicts = classify_subjects(
        llm(),
        PromptTemplates::builtin(),
        PipelineConfig::default(),
        vec!["Offer letter".to_string(), "Newsletter".to_string()],
        false,
    )
    .await
    .unwrap();

    assert_eq!(
        verdicts,
        vec![("Offer letter".to_string(), true), ("Newsletter".to_string(), false)]
    );
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.store.path = dir.path().join("apps.db");
    config.mailbox.path = Some(dir.path().join("inbox.json"));
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.store.path, dir.path().join("apps.db"));
    assert_eq!(loaded.mailbox_path().unwrap(), dir.path().join("inbox.json"));
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_custom_prompt_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("classification_template.txt"), "Job? {email_subject}").unwrap();

    let mut config = Config::default();
    config.prompts.dir = Some(dir.path().to_path_buf());
    let templates = config.templates().unwrap();
    assert_eq!(templates.classification("Offer").unwrap(), "Job? Offer");
}
