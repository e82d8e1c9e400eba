//! Output formatting module
//!
//! This module handles formatting learning summaries and test reports for different output formats.

use crate::{
    Result,
    cli::OutputFormat,
    report::SessionReport,
    session::LearnSummary,
};
use serde_json::json;

/// Output a learning summary
pub fn output_learn(
    w: &mut impl std::io::Write,
    source: &str,
    summary: &LearnSummary,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(w, "{}:", source)?;
            write!(w, "{}", summary.render())?;
        }
        OutputFormat::Json => {
            let output = json!({
                "source": source,
                "summary": {
                    "sentences": summary.sentences.len(),
                    "learned": summary.learned(),
                    "already_accepted": summary.already_accepted(),
                    "refused": summary.rejected(),
                    "new_rules": summary.added_transitions(),
                },
                "sentences": summary.sentences.iter().map(|(text, outcome)| {
                    json!({ "text": text, "outcome": outcome })
                }).collect::<Vec<_>>(),
            });
            serde_json::to_writer_pretty(&mut *w, &output)?;
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Output a test report
pub fn output_report(
    w: &mut impl std::io::Write,
    source: &str,
    report: &SessionReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(w, "{}:", source)?;
            write!(w, "{}", report.render())?;
        }
        OutputFormat::Json => {
            let output = json!({
                "source": source,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "passed": report.all_passed(),
                "summary": {
                    "total": report.total(),
                    "failed": report.failures().len(),
                    "errors": report.errors().len(),
                },
                "results": report.results,
            });
            serde_json::to_writer_pretty(&mut *w, &output)?;
            writeln!(w)?; // Add trailing newline
        }
    }
    Ok(())
}
