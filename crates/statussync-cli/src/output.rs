//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use statussync_domain::{ApplicationStatus, ApplicationStatusRecord, StoredRow, HEADER};
use statussync_pipeline::PipelineReport;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format stored application rows.
    pub fn format_rows(&self, rows: &[StoredRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_rows: Vec<serde_json::Value> = rows
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "row": r.row_number,
                            "status": r.row.status,
                            "company": r.row.company,
                            "position": r.row.position,
                            "location": r.row.location,
                            "action_date": r.row.action_date,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json_rows)?)
            }
            OutputFormat::Table => {
                if rows.is_empty() {
                    return Ok(self.colorize("No applications found.", "yellow"));
                }

                let mut builder = Builder::default();
                let mut header = vec!["Row"];
                header.extend(HEADER);
                builder.push_record(header);

                for stored in rows {
                    let [status, company, position, location, action_date] = stored.row.to_cells();
                    builder.push_record([
                        stored.row_number.to_string(),
                        self.status_colored(&status),
                        company,
                        position,
                        location,
                        action_date,
                    ]);
                }
                Ok(self.render(builder))
            }
            OutputFormat::Quiet => Ok(rows
                .iter()
                .map(|r| format!("{}\t{}", r.unique_key(), r.row.status))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format classification verdicts, one per subject.
    pub fn format_verdicts(&self, verdicts: &[(String, bool)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = verdicts
                    .iter()
                    .map(|(subject, related)| serde_json::json!({ "subject": subject, "job_related": related }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "Subject", "Job-related"]);
                for (i, (subject, related)) in verdicts.iter().enumerate() {
                    let verdict = if *related {
                        self.colorize("yes", "green")
                    } else {
                        self.colorize("no", "red")
                    };
                    builder.push_record([(i + 1).to_string(), subject.clone(), verdict]);
                }
                Ok(self.render(builder))
            }
            OutputFormat::Quiet => Ok(verdicts
                .iter()
                .map(|(_, related)| if *related { "YES" } else { "NO" })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format an extracted record, or its absence.
    pub fn format_record(&self, record: Option<&ApplicationStatusRecord>) -> Result<String> {
        let Some(record) = record else {
            return Ok(match self.format {
                OutputFormat::Json => "null".to_string(),
                OutputFormat::Table => self.warning("No application details could be extracted."),
                OutputFormat::Quiet => String::new(),
            });
        };

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "company_name": record.company_name,
                "position_title": record.position_title,
                "position_location": record.position_location,
                "status": record.status.as_str(),
                "action_date": record.action_date,
                "is_job_application_update": record.is_job_application_update,
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Company".to_string(), record.company().to_string()]);
                builder.push_record(["Position".to_string(), record.position().to_string()]);
                builder.push_record(["Location".to_string(), record.location().to_string()]);
                builder.push_record(["Status".to_string(), self.status_colored(record.status.as_str())]);
                builder.push_record(["Action Date".to_string(), record.date().to_string()]);
                builder.push_record([
                    "Update".to_string(),
                    if record.is_job_application_update { "yes" } else { "no" }.to_string(),
                ]);
                Ok(self.render(builder))
            }
            OutputFormat::Quiet => Ok(record.unique_key().to_string()),
        }
    }

    /// Format a run report.
    pub fn format_report(&self, report: &PipelineReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Stage", "Count"]);
                for (stage, count) in [
                    ("Fetched", report.fetched),
                    ("With subject", report.with_subject),
                    ("Processed", report.processed),
                    ("Job-related", report.job_related),
                    ("Extracted", report.extracted),
                    ("Added", report.added),
                    ("Updated", report.updated),
                    ("Unchanged", report.unchanged),
                    ("Failed", report.failed),
                ] {
                    builder.push_record([stage.to_string(), count.to_string()]);
                }

                let mut out = self.render(builder);
                out.push('\n');
                if let Some(error) = &report.fetch_error {
                    out.push_str(&self.error(&format!("Email source failed: {}", error)));
                    out.push('\n');
                }
                let summary = match report.stopped_at {
                    Some(stage) => self.info(&format!("Run {}: nothing to do after {}", report.run_id, stage)),
                    None if report.failed > 0 => self.warning(&format!(
                        "Run {} finished with {} failed record(s)",
                        report.run_id, report.failed
                    )),
                    None => self.success(&format!("Run {} complete", report.run_id)),
                };
                out.push_str(&summary);
                Ok(out)
            }
            OutputFormat::Quiet => Ok(format!(
                "{} {} {} {}",
                report.added, report.updated, report.unchanged, report.failed
            )),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn status_colored(&self, status: &str) -> String {
        let color = match ApplicationStatus::parse(status) {
            Some(ApplicationStatus::Offer | ApplicationStatus::OfferAccepted) => "green",
            Some(ApplicationStatus::Rejected | ApplicationStatus::OfferDeclined | ApplicationStatus::Withdrawn) => "red",
            Some(ApplicationStatus::InterviewScheduled | ApplicationStatus::InterviewCompleted) => "cyan",
            Some(ApplicationStatus::Applied) => "blue",
            Some(ApplicationStatus::OnHold) => "yellow",
            _ => "",
        };
        self.colorize(status, color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
