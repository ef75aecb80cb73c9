use crate::classify::{
    CommitClassifier, RuleConfig, MAX_HEADER_LENGTH, RULE_HEADER_FORMAT,
    RULE_SUBJECT_MAX_LENGTH, RULE_SUBJECT_TRAILING_PERIOD, RULE_TYPE_ENUM, RULE_TYPE_LOWERCASE,
};
use crate::domain::{BumpLevel, Classification, IgnoreReason, Violation};
use regex::Regex;
use std::sync::OnceLock;

fn header_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<type>[A-Za-z][\w-]*)",
            r"(?:\((?P<scope>[^()]*)\))?",
            r"(?P<bang>!)?:\s*(?P<description>.*)$",
        ))
        .ok()
    })
    .as_ref()
}

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message in Conventional Commits form
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// Returns `None` for any other header shape.
    pub fn parse(message: &str) -> Option<Self> {
        let header = message.lines().next().unwrap_or_default().trim_end();
        let captures = header_regex()?.captures(header)?;

        let r#type = captures
            .name("type")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let scope = captures.name("scope").map(|m| m.as_str().to_string());
        let has_exclamation = captures.name("bang").is_some();
        let description = captures
            .name("description")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let has_footer = message
            .lines()
            .skip(1)
            .any(|line| BREAKING_FOOTERS.iter().any(|f| line.starts_with(f)));

        Some(ParsedCommit {
            r#type,
            scope,
            description,
            is_breaking_change: has_exclamation || has_footer,
        })
    }

    /// Bump this commit requires on its own
    pub fn bump_level(&self) -> BumpLevel {
        if self.is_breaking_change {
            return BumpLevel::Major;
        }
        match self.r#type.as_str() {
            "feat" => BumpLevel::Minor,
            "fix" => BumpLevel::Patch,
            _ => BumpLevel::None,
        }
    }
}

/// Commit shapes produced by git tooling rather than by authors
fn ignore_reason(header: &str) -> Option<IgnoreReason> {
    if header.starts_with("Merge ") {
        Some(IgnoreReason::Merge)
    } else if header.starts_with("Revert \"") {
        Some(IgnoreReason::Revert)
    } else if ["fixup! ", "squash! ", "amend! "]
        .iter()
        .any(|p| header.starts_with(p))
    {
        Some(IgnoreReason::Fixup)
    } else {
        None
    }
}

/// Classifies commit messages following the Conventional Commits format
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalClassifier;

impl ConventionalClassifier {
    pub fn new() -> Self {
        ConventionalClassifier
    }

    fn check_rules(
        &self,
        header: &str,
        parsed: &ParsedCommit,
        rules: &RuleConfig,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        if parsed.description.trim().is_empty() && rules.is_enabled(RULE_HEADER_FORMAT) {
            violations.push(Violation::new(RULE_HEADER_FORMAT, "description is empty"));
        }

        if parsed.r#type != parsed.r#type.to_lowercase() && rules.is_enabled(RULE_TYPE_LOWERCASE) {
            violations.push(Violation::new(
                RULE_TYPE_LOWERCASE,
                format!("type '{}' must be lowercase", parsed.r#type),
            ));
        }

        let known = rules
            .allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&parsed.r#type));
        if !known && rules.is_enabled(RULE_TYPE_ENUM) {
            violations.push(Violation::new(
                RULE_TYPE_ENUM,
                format!(
                    "type '{}' is not one of: {}",
                    parsed.r#type,
                    rules.allowed_types.join(", ")
                ),
            ));
        }

        if parsed.description.ends_with('.') && rules.is_enabled(RULE_SUBJECT_TRAILING_PERIOD) {
            violations.push(Violation::new(
                RULE_SUBJECT_TRAILING_PERIOD,
                "description must not end with a period",
            ));
        }

        let length = header.chars().count();
        if length > MAX_HEADER_LENGTH && rules.is_enabled(RULE_SUBJECT_MAX_LENGTH) {
            violations.push(Violation::new(
                RULE_SUBJECT_MAX_LENGTH,
                format!("header is {} characters, limit is {}", length, MAX_HEADER_LENGTH),
            ));
        }

        violations
    }
}

impl CommitClassifier for ConventionalClassifier {
    fn classify(&self, message: &str, rules: &RuleConfig) -> Classification {
        let header = message.lines().next().unwrap_or_default().trim_end();

        if let Some(reason) = ignore_reason(header) {
            return Classification::Ignored { reason };
        }

        let Some(parsed) = ParsedCommit::parse(message) else {
            return Classification::Invalid {
                violations: vec![Violation::new(
                    RULE_HEADER_FORMAT,
                    format!("'{}' is not of the form 'type(scope)!: description'", header),
                )],
            };
        };

        let violations = self.check_rules(header, &parsed, rules);
        if !violations.is_empty() {
            return Classification::Invalid { violations };
        }

        Classification::Classified {
            bump: parsed.bump_level(),
            breaking: parsed.is_breaking_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(message: &str) -> Classification {
        ConventionalClassifier::new().classify(message, &RuleConfig::default())
    }

    #[test]
    fn test_parse_with_scope() {
        let commit = ParsedCommit::parse("feat(auth): add login").unwrap();
        assert_eq!(commit.r#type, "feat");
        assert_eq!(commit.scope, Some("auth".to_string()));
        assert_eq!(commit.description, "add login");
        assert!(!commit.is_breaking_change);
    }

    #[test]
    fn test_parse_with_breaking_marker() {
        let commit = ParsedCommit::parse("feat(auth)!: redesign login").unwrap();
        assert!(commit.is_breaking_change);
        assert_eq!(commit.bump_level(), BumpLevel::Major);
    }

    #[test]
    fn test_parse_breaking_without_scope() {
        let commit = ParsedCommit::parse("feat!: redesign").unwrap();
        assert_eq!(commit.scope, None);
        assert!(commit.is_breaking_change);
    }

    #[test]
    fn test_parse_breaking_change_footer() {
        let commit = ParsedCommit::parse("fix: something\n\nBREAKING CHANGE: desc").unwrap();
        assert!(commit.is_breaking_change);
        let commit = ParsedCommit::parse("fix: something\n\nBREAKING-CHANGE: desc").unwrap();
        assert!(commit.is_breaking_change);
    }

    #[test]
    fn test_parse_non_conventional() {
        assert!(ParsedCommit::parse("Random commit message").is_none());
    }

    #[test]
    fn test_classify_bump_levels() {
        assert_eq!(classify("feat: add api").bump(), BumpLevel::Minor);
        assert_eq!(classify("fix(db): pool size").bump(), BumpLevel::Patch);
        assert_eq!(classify("docs: readme").bump(), BumpLevel::None);
        assert_eq!(classify("refactor!: drop v1 api").bump(), BumpLevel::Major);
        assert!(classify("refactor!: drop v1 api").is_breaking());
    }

    #[test]
    fn test_classify_ignored_shapes() {
        for message in [
            "Merge branch 'main' into feature",
            "Merge pull request #12 from org/branch",
            "Revert \"feat: add api\"",
            "fixup! feat: add api",
            "squash! fix: thing",
        ] {
            assert!(
                matches!(classify(message), Classification::Ignored { .. }),
                "expected '{}' to be ignored",
                message
            );
        }
    }

    #[test]
    fn test_classify_invalid_header() {
        match classify("Updated stuff") {
            Classification::Invalid { violations } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].rule, RULE_HEADER_FORMAT);
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_unknown_type() {
        match classify("feet: add api") {
            Classification::Invalid { violations } => {
                assert_eq!(violations[0].rule, RULE_TYPE_ENUM);
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_uppercase_type() {
        match classify("Feat: add api") {
            Classification::Invalid { violations } => {
                assert!(violations.iter().any(|v| v.rule == RULE_TYPE_LOWERCASE));
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_cosmetic_rules_relaxed_for_bump() {
        let classifier = ConventionalClassifier::new();
        let message = "fix: handle empty input.";
        assert!(!classifier
            .classify(message, &RuleConfig::default())
            .is_compliant());
        assert_eq!(
            classifier
                .classify(message, &RuleConfig::default().relaxed_for_bump())
                .bump(),
            BumpLevel::Patch
        );
    }

    #[test]
    fn test_disabled_type_enum_accepts_custom_type() {
        let rules = RuleConfig::default().with_rules_disabled([RULE_TYPE_ENUM]);
        let classification = ConventionalClassifier::new().classify("wip: half done", &rules);
        assert_eq!(
            classification,
            Classification::Classified {
                bump: BumpLevel::None,
                breaking: false
            }
        );
    }
}
