use serde::Serialize;
use std::fmt;

/// Non-fatal conditions met during a run.
/// These are reported to the user but never fail the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryWarning {
    /// No version tag matching the prefix filter in the walked history
    NoAnchorTag { prefix: String },
    /// The commits since the anchor do not require a bump
    NothingToBump { current: String },
    /// Breaking changes were treated as non-breaking because of the max-major ceiling
    BreakingChangeSuppressed { max_major: u64, commits: usize },
    /// The dev prerelease had no numeric suffix, so a fresh dev chain was started
    DevPrereleaseFallback { current: String, next: String },
    /// HEAD already carries the anchor tag, so no new version is made
    HeadAlreadyTagged { tag: String },
    /// A draft release continued the prerelease chain instead of the tag
    DraftSubstituted { draft: String, tag: String },
    /// The release branch to create exists already
    ReleaseBranchExists { branch: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoAnchorTag { prefix } => {
                write!(f, "No version tag matching prefix '{}' found in history", prefix)
            }
            BoundaryWarning::NothingToBump { current } => {
                write!(f, "No bump required since '{}'", current)
            }
            BoundaryWarning::BreakingChangeSuppressed { max_major, commits } => write!(
                f,
                "{} breaking change(s) treated as non-breaking: major version ceiling {} reached",
                commits, max_major
            ),
            BoundaryWarning::DevPrereleaseFallback { current, next } => write!(
                f,
                "Prerelease of '{}' has no numeric suffix; starting new dev chain at '{}'",
                current, next
            ),
            BoundaryWarning::HeadAlreadyTagged { tag } => {
                write!(f, "HEAD is already tagged '{}'; not bumping again", tag)
            }
            BoundaryWarning::DraftSubstituted { draft, tag } => write!(
                f,
                "Continuing from draft release '{}' instead of tag '{}'",
                draft, tag
            ),
            BoundaryWarning::ReleaseBranchExists { branch } => {
                write!(f, "Release branch '{}' already exists", branch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppressed_breaking_display() {
        let warning = BoundaryWarning::BreakingChangeSuppressed {
            max_major: 3,
            commits: 2,
        };
        let msg = warning.to_string();
        assert!(msg.contains("2 breaking change(s)"));
        assert!(msg.contains("ceiling 3"));
    }

    #[test]
    fn test_release_branch_exists_display() {
        let warning = BoundaryWarning::ReleaseBranchExists {
            branch: "release/1.3".to_string(),
        };
        assert_eq!(warning.to_string(), "Release branch 'release/1.3' already exists");
    }

    #[test]
    fn test_dev_fallback_display() {
        let warning = BoundaryWarning::DevPrereleaseFallback {
            current: "1.2.0-dev".to_string(),
            next: "1.3.0-dev001.abcdef12".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("1.2.0-dev"));
        assert!(msg.contains("1.3.0-dev001.abcdef12"));
    }
}
