//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// StatusSync - Track job application status from your inbox.
#[derive(Debug, Parser)]
#[command(name = "statussync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "STATUSSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline over a date window
    Run(RunArgs),

    /// Classify subject lines as job-related or not
    Classify(ClassifyArgs),

    /// Extract application fields from one email
    Extract(ExtractArgs),

    /// List tracked applications
    List(ListArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// First day included (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: NaiveDate,

    /// First day excluded (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: NaiveDate,

    /// Maximum emails processed this run
    #[arg(short, long)]
    pub max: Option<usize>,

    /// Mailbox export to read instead of the configured one
    #[arg(long)]
    pub mailbox: Option<PathBuf>,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Subject lines to classify
    #[arg(required = true)]
    pub subjects: Vec<String>,

    /// Classify each subject in its own request
    #[arg(long)]
    pub single: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// JSON file holding one email ({subject, body, from, to, date})
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read the email JSON from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Sheet to list instead of the configured one
    #[arg(long)]
    pub sheet: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
