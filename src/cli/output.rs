//! CLI output formatting

use crate::core::Job;
use crate::render::PipelineDocument;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ARROW: Emoji<'_, '_> = Emoji("➜ ", "> ");

/// One line per job, showing what gates it
pub fn format_job(job: &Job) -> String {
    let upstream = job.upstream_jobs();
    if upstream.is_empty() {
        format!("{}", style(&job.name).cyan())
    } else {
        let passed: Vec<String> = upstream.iter().map(|name| name.to_string()).collect();
        format!(
            "{} {} {}",
            style(passed.join(", ")).dim(),
            ARROW,
            style(&job.name).cyan()
        )
    }
}

/// Counts for a generated document
pub fn format_document_summary(document: &PipelineDocument) -> String {
    format!(
        "  Resource types: {}\n  Resources: {}\n  Jobs: {}",
        style(document.resource_types().len()).cyan(),
        style(document.resources().len()).cyan(),
        style(document.jobs().len()).cyan()
    )
}
