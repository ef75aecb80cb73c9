use crate::domain::version::BumpLevel;
use serde::Serialize;
use std::fmt;

/// Why a commit was skipped without counting as an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreReason {
    Merge,
    Revert,
    Fixup,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::Merge => write!(f, "merge commit"),
            IgnoreReason::Revert => write!(f, "revert commit"),
            IgnoreReason::Fixup => write!(f, "fixup commit"),
        }
    }
}

/// A single rule breach reported for a non-compliant commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: String,
    pub message: String,
}

impl Violation {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

/// Outcome of classifying one commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Classification {
    /// Compliant commit with the bump it requires
    Classified { bump: BumpLevel, breaking: bool },
    /// Merge/revert/fixup shapes: skipped, not an error
    Ignored { reason: IgnoreReason },
    /// Non-compliant commit with every rule it breaks
    Invalid { violations: Vec<Violation> },
}

impl Classification {
    /// Bump contributed to aggregation; nothing for ignored or invalid commits
    pub fn bump(&self) -> BumpLevel {
        match self {
            Classification::Classified { bump, .. } => *bump,
            _ => BumpLevel::None,
        }
    }

    pub fn is_breaking(&self) -> bool {
        matches!(self, Classification::Classified { breaking: true, .. })
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Classification::Classified { .. })
    }
}

/// A commit together with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedCommit {
    pub sha: String,
    pub raw_message: String,
    pub classification: Classification,
}

impl ClassifiedCommit {
    /// First line of the raw message
    pub fn subject(&self) -> &str {
        self.raw_message.lines().next().unwrap_or_default()
    }

    /// Abbreviated commit hash
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }
}

/// First 8 characters of a commit hash
pub fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}
