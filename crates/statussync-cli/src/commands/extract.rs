//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use statussync_domain::traits::LlmProvider;
use statussync_domain::{ApplicationStatusRecord, Email};
use statussync_mailbox::MailboxEntry;
use statussync_pipeline::{Extractor, PipelineConfig, PromptTemplates};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let json_data = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(file_path) = args.file {
        fs::read_to_string(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ));
    };

    let email = parse_email(&json_data)?;
    let llm = config.llm.build()?;
    let templates = config.templates()?;

    let record = extract_email(llm, templates, config.pipeline.clone(), &email).await?;
    println!("{}", formatter.format_record(record.as_ref())?);
    Ok(())
}

/// Parse one email from mailbox-export JSON.
pub fn parse_email(json: &str) -> Result<Email> {
    let entry: MailboxEntry = serde_json::from_str(json)?;
    Ok(entry.into_email())
}

/// Extract the application fields of one email.
pub async fn extract_email<L: LlmProvider>(
    llm: L,
    templates: PromptTemplates,
    config: PipelineConfig,
    email: &Email,
) -> Result<Option<ApplicationStatusRecord>> {
    let extractor = Extractor::new(Arc::new(llm), Arc::new(templates), config);
    Ok(extractor.extract(email).await?)
}
