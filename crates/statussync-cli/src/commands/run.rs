//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use statussync_domain::traits::{EmailSource, LlmProvider, TabularStore};
use statussync_domain::FetchWindow;
use statussync_mailbox::JsonMailbox;
use statussync_pipeline::{Pipeline, PipelineConfig, PipelineReport, PromptTemplates};
use statussync_store::SqliteSheetStore;
use std::fs;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let window = FetchWindow::new(args.start, args.end, config.pipeline.fetch_limit);
    window.validate().map_err(CliError::InvalidInput)?;

    let mut pipeline_config = config.pipeline.clone();
    if let Some(max) = args.max {
        if max == 0 {
            return Err(CliError::InvalidInput("--max must be greater than 0".to_string()));
        }
        pipeline_config.max_emails = max;
    }

    let mailbox = match args.mailbox {
        Some(path) => JsonMailbox::new(path),
        None => JsonMailbox::new(config.mailbox_path()?),
    };

    if let Some(parent) = config.store.path.parent() {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteSheetStore::new(&config.store.path)?;
    let llm = config.llm.build()?;
    let templates = config.templates()?;

    let report = run_pipeline(llm, mailbox, store, templates, pipeline_config, &window).await?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Run the pipeline once over `window`.
pub async fn run_pipeline<L, E, S>(
    llm: L,
    source: E,
    store: S,
    templates: PromptTemplates,
    config: PipelineConfig,
    window: &FetchWindow,
) -> Result<PipelineReport>
where
    L: LlmProvider,
    E: EmailSource,
    S: TabularStore,
{
    let mut pipeline = Pipeline::new(llm, source, store, templates, config);
    Ok(pipeline.run(window).await?)
}
