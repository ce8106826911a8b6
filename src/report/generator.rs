//! Analysis artifact generation.
//!
//! The artifact is either the plain analysis text or a JSON report that
//! also carries the run metadata and per-skill tallies.

use crate::cli::OutputFormat;
use crate::models::{AnalysisReport, ReportMetadata, SkillSummary};
use anyhow::{Context, Result};
use std::path::Path;

/// Assemble the JSON report for a finished analysis.
pub fn build_report(
    summary: &SkillSummary,
    metadata: ReportMetadata,
    analysis: &str,
) -> AnalysisReport {
    AnalysisReport {
        metadata,
        job_titles: summary.job_titles.iter().cloned().collect(),
        categories: summary.categories.iter().cloned().collect(),
        skills: summary.tallies(),
        analysis: analysis.to_string(),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render the artifact content for the chosen format.
pub fn render_artifact(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.analysis.clone()),
        OutputFormat::Json => generate_json_report(report),
    }
}

/// Write the artifact, replacing any previous content.
pub fn write_artifact(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write analysis to {}", path.display()))
}

/// Terminal summary of per-skill results.
pub fn generate_skill_table(summary: &SkillSummary) -> String {
    let mut lines = Vec::new();

    for tally in summary.tallies() {
        let accuracy = match tally.accuracy() {
            Some(a) => format!("{:>3.0}%", a * 100.0),
            None => "   -".to_string(),
        };
        lines.push(format!(
            "   {}  ✔ {} ✘ {}  {}",
            accuracy, tally.correct, tally.incorrect, tally.skill
        ));
    }

    lines.join("\n")
}
