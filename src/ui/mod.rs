//! User interface module - terminal output of a run.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing a whole run report, as text or JSON

use std::io::{self, Write};

use crate::cli::RunReport;
use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, format_classification_report, format_outcome,
    format_version_change,
};

/// Write the report for humans.
///
/// Warnings go to stderr so stdout stays limited to the run summary.
pub fn print_report(report: &RunReport) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report)?;

    for warning in &report.warnings {
        display_boundary_warning(warning);
    }
    Ok(())
}

/// Write the report as a single JSON document
pub fn print_json(report: &RunReport) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let document = serde_json::json!({
        "current_version": report.current_version,
        "next_version": report.next_version(),
        "metadata": report.metadata(),
        "report": report.report,
        "warnings": report.warnings,
    });
    serde_json::to_writer_pretty(&mut out, &document)
        .map_err(|e| crate::error::GitBumpError::Io(e.into()))?;
    writeln!(out)?;
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &RunReport) -> Result<()> {
    let current = report.current_version.as_ref().map(|v| v.to_string());
    writeln!(
        out,
        "{} on '{}': {}",
        report.scheme,
        report.branch,
        format_version_change(current.as_deref(), report.bump.as_ref())
    )?;

    if let Some(outcome) = &report.outcome {
        writeln!(out, "{}", format_outcome(outcome))?;
    }

    for line in format_classification_report(&report.report) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ClassificationReport;
    use crate::config::VersionScheme;
    use crate::domain::VersionNumber;

    #[test]
    fn test_write_report_without_bump() {
        let report = RunReport {
            scheme: VersionScheme::SemVer,
            branch: "main".to_string(),
            current_version: VersionNumber::parse("v2.0.1"),
            bump: None,
            outcome: None,
            report: ClassificationReport::default(),
            warnings: Vec::new(),
        };

        let mut buffer = Vec::new();
        write_report(&mut buffer, &report).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("semver on 'main': "));
        assert!(text.contains("v2.0.1"));
        assert!(text.contains("0 compliant, 0 ignored, 0 non-compliant"));
    }
}
