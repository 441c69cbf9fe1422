//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use statussync_domain::traits::LlmProvider;
use statussync_pipeline::{BatchClassifier, PipelineConfig, PromptTemplates};
use std::sync::Arc;

/// Execute the classify command.
pub async fn execute_classify(args: ClassifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let llm = config.llm.build()?;
    let templates = config.templates()?;

    let verdicts = classify_subjects(llm, templates, config.pipeline.clone(), args.subjects, args.single).await?;
    println!("{}", formatter.format_verdicts(&verdicts)?);
    Ok(())
}

/// Classify subjects in one batch call or one call each.
pub async fn classify_subjects<L: LlmProvider>(
    llm: L,
    templates: PromptTemplates,
    config: PipelineConfig,
    subjects: Vec<String>,
    single: bool,
) -> Result<Vec<(String, bool)>> {
    let classifier = BatchClassifier::new(Arc::new(llm), Arc::new(templates), config);

    let verdicts = if single {
        let mut verdicts = Vec::with_capacity(subjects.len());
        for subject in &subjects {
            verdicts.push(classifier.classify(subject).await?);
        }
        verdicts
    } else {
        classifier.classify_batch(&subjects).await?
    };

    Ok(subjects.into_iter().zip(verdicts).collect())
}
