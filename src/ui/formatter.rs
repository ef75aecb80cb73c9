//! Pure formatting functions for UI output.
//!
//! The `format_*` functions build strings and are testable; the `display_*`
//! functions only print them.

use console::style;

use crate::analyzer::ClassificationReport;
use crate::boundary::BoundaryWarning;
use crate::domain::{Classification, ClassifiedCommit};
use crate::policy::BumpResult;
use crate::publish::PublishOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// The version change of a run, or the version it stayed at.
///
/// # Arguments
/// * `current` - Version the run started from (None without an anchor tag)
/// * `bump` - The computed bump, if any
pub fn format_version_change(current: Option<&str>, bump: Option<&BumpResult>) -> String {
    match (bump, current) {
        (Some(bump), _) => format!(
            "{} {} {} ({})",
            style(&bump.from).red(),
            style("->").dim(),
            style(&bump.to).green().bold(),
            bump.kind
        ),
        (None, Some(current)) => format!("{} (unchanged)", style(current).cyan()),
        (None, None) => "no version found".to_string(),
    }
}

/// One line describing what the publish step did
pub fn format_outcome(outcome: &PublishOutcome) -> String {
    if let Some(reason) = outcome.skipped {
        return format!("Not published: {}", reason);
    }

    let mut parts = Vec::new();
    if let Some(release) = &outcome.release {
        let flavour = if release.is_draft {
            "draft release"
        } else if release.is_prerelease {
            "prerelease"
        } else {
            "release"
        };
        parts.push(format!("{} '{}'", flavour, release.name));
    }
    if let Some(tag) = &outcome.tag {
        parts.push(format!("tag '{}' at {}", tag.name, short(&tag.target_sha)));
    }
    format!("Published {}", parts.join(" and "))
}

fn short(sha: &str) -> &str {
    crate::domain::short_sha(sha)
}

fn format_commit(commit: &ClassifiedCommit) -> String {
    let subject: String = commit.subject().chars().take(60).collect();
    format!("{} {}", style(commit.short_sha()).dim(), subject)
}

/// Lines listing the commits that did not count towards the bump.
///
/// Non-compliant commits come with every rule they break; ignored commits
/// with the reason they were skipped.
pub fn format_classification_report(report: &ClassificationReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} compliant, {} ignored, {} non-compliant",
        report.compliant,
        report.ignored.len(),
        report.non_compliant.len()
    )];

    for commit in &report.non_compliant {
        lines.push(format!("  {} {}", style("✗").red(), format_commit(commit)));
        if let Classification::Invalid { violations } = &commit.classification {
            for violation in violations {
                lines.push(format!("      {}", violation));
            }
        }
    }

    for commit in &report.ignored {
        if let Classification::Ignored { reason } = &commit.classification {
            lines.push(format!(
                "  {} {} ({})",
                style("-").dim(),
                format_commit(commit),
                reason
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IgnoreReason, Release, Tag, VersionNumber, Violation};
    use crate::policy::BumpKind;

    fn commit(sha: &str, message: &str, classification: Classification) -> ClassifiedCommit {
        ClassifiedCommit {
            sha: sha.to_string(),
            raw_message: message.to_string(),
            classification,
        }
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_format_version_change() {
        let bump = BumpResult {
            from: VersionNumber::parse("1.2.0").unwrap(),
            to: VersionNumber::parse("1.3.0").unwrap(),
            kind: BumpKind::Rel,
        };
        let line = format_version_change(Some("1.2.0"), Some(&bump));
        assert!(line.contains("1.2.0"));
        assert!(line.contains("1.3.0"));
        assert!(line.contains("(rel)"));

        assert!(format_version_change(Some("1.2.0"), None).contains("unchanged"));
        assert_eq!(format_version_change(None, None), "no version found");
    }

    #[test]
    fn test_format_skipped_outcome() {
        let outcome = PublishOutcome {
            version: VersionNumber::parse("1.3.0").unwrap(),
            release: None,
            tag: None,
            skipped: Some(crate::publish::SkipReason::PullRequest),
        };
        assert_eq!(format_outcome(&outcome), "Not published: no publish from PR context");
    }

    #[test]
    fn test_format_published_outcome() {
        let outcome = PublishOutcome {
            version: VersionNumber::parse("1.3.0-rc01").unwrap(),
            release: Some(Release {
                id: 7,
                name: "1.3.0-rc01".to_string(),
                tag_name: "1.3.0-rc01".to_string(),
                target_sha: "abcdef1234567890".to_string(),
                body: String::new(),
                is_draft: false,
                is_prerelease: true,
            }),
            tag: Some(Tag::new("1.3.0-rc01", "abcdef1234567890")),
            skipped: None,
        };
        assert_eq!(
            format_outcome(&outcome),
            "Published prerelease '1.3.0-rc01' and tag '1.3.0-rc01' at abcdef12"
        );
    }

    #[test]
    fn test_format_classification_report() {
        let report = ClassificationReport {
            compliant: 2,
            ignored: vec![commit(
                "1111111111",
                "Merge branch 'x'",
                Classification::Ignored {
                    reason: IgnoreReason::Merge,
                },
            )],
            non_compliant: vec![commit(
                "2222222222",
                "Update stuff",
                Classification::Invalid {
                    violations: vec![Violation::new("header-format", "header is not conventional")],
                },
            )],
        };

        let lines = format_classification_report(&report);
        assert_eq!(lines[0], "2 compliant, 1 ignored, 1 non-compliant");
        assert!(lines[1].contains("Update stuff"));
        assert!(lines[2].contains("[header-format] header is not conventional"));
        assert!(lines[3].contains("Merge branch 'x'"));
    }
}
