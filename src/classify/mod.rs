//! Commit classification
//!
//! The engine consumes classifiers through [`CommitClassifier`]; the
//! Conventional Commits implementation in [`conventional`] is the default.

pub mod conventional;

pub use conventional::{ConventionalClassifier, ParsedCommit};

use crate::domain::Classification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Header must be `type(scope)!: description`
pub const RULE_HEADER_FORMAT: &str = "header-format";
/// Type must be lowercase
pub const RULE_TYPE_LOWERCASE: &str = "type-lowercase";
/// Type must be one of the allowed types
pub const RULE_TYPE_ENUM: &str = "type-enum";
/// Description must not end with a period
pub const RULE_SUBJECT_TRAILING_PERIOD: &str = "subject-trailing-period";
/// Header must not exceed [`MAX_HEADER_LENGTH`] characters
pub const RULE_SUBJECT_MAX_LENGTH: &str = "subject-max-length";

pub const MAX_HEADER_LENGTH: usize = 80;

/// Converts a raw commit message into a [`Classification`]
pub trait CommitClassifier {
    fn classify(&self, message: &str, rules: &RuleConfig) -> Classification;
}

/// Returns the default list of conventional commit types.
fn default_types() -> Vec<String> {
    [
        "feat", "fix", "docs", "style", "refactor", "test", "chore", "build", "ci", "perf",
        "revert", "improvement",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

/// Rule set applied by a classifier. Immutable; relaxed variants are derived.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleConfig {
    #[serde(default = "default_types")]
    pub allowed_types: Vec<String>,

    #[serde(default)]
    pub disabled: BTreeSet<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            allowed_types: default_types(),
            disabled: BTreeSet::new(),
        }
    }
}

impl RuleConfig {
    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled.contains(rule)
    }

    /// A copy of this rule set with the given rules disabled as well
    pub fn with_rules_disabled<I, S>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut disabled = self.disabled.clone();
        disabled.extend(ids.into_iter().map(Into::into));

        RuleConfig {
            allowed_types: self.allowed_types.clone(),
            disabled,
        }
    }

    /// Rule set used when classifying for a version bump: cosmetic rules
    /// never make a commit non-compliant there.
    pub fn relaxed_for_bump(&self) -> Self {
        self.with_rules_disabled([RULE_SUBJECT_TRAILING_PERIOD, RULE_SUBJECT_MAX_LENGTH])
    }
}
