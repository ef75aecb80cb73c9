use crate::analyzer::tag_matcher::{Anchor, MatchResult};
use crate::classify::{CommitClassifier, RuleConfig};
use crate::domain::{BumpLevel, Classification, ClassifiedCommit, VersionNumber};
use serde::Serialize;
use tracing::debug;

/// Everything a bump policy needs, computed fresh for one run
#[derive(Debug, Clone, PartialEq)]
pub struct BumpContext {
    pub anchor: Option<Anchor>,
    pub required_bump: BumpLevel,
    pub commits: Vec<ClassifiedCommit>,
    pub initial_development: bool,
}

impl BumpContext {
    pub fn anchor_version(&self) -> Option<&VersionNumber> {
        self.anchor.as_ref().map(|a| &a.version)
    }

    /// Any compliant commit marked breaking
    pub fn has_breaking_change(&self) -> bool {
        self.commits.iter().any(|c| c.classification.is_breaking())
    }

    /// Number of compliant commits marked breaking
    pub fn breaking_count(&self) -> usize {
        self.commits
            .iter()
            .filter(|c| c.classification.is_breaking())
            .count()
    }

    /// Report of the commits that did not count towards the bump
    pub fn report(&self) -> ClassificationReport {
        let mut report = ClassificationReport::default();
        for commit in &self.commits {
            match &commit.classification {
                Classification::Classified { .. } => report.compliant += 1,
                Classification::Ignored { .. } => report.ignored.push(commit.clone()),
                Classification::Invalid { .. } => report.non_compliant.push(commit.clone()),
            }
        }
        report
    }
}

/// Human-facing summary of the classification step
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ClassificationReport {
    pub compliant: usize,
    pub ignored: Vec<ClassifiedCommit>,
    pub non_compliant: Vec<ClassifiedCommit>,
}

impl ClassificationReport {
    pub fn is_clean(&self) -> bool {
        self.non_compliant.is_empty()
    }
}

/// Analyzes commits to determine version bump type
pub struct VersionAnalyzer<'a, C: CommitClassifier + ?Sized> {
    classifier: &'a C,
    rules: RuleConfig,
    initial_development: bool,
}

impl<'a, C: CommitClassifier + ?Sized> VersionAnalyzer<'a, C> {
    /// Create a new version analyzer; classification uses the bump-relaxed rules
    pub fn new(classifier: &'a C, rules: &RuleConfig, initial_development: bool) -> Self {
        VersionAnalyzer {
            classifier,
            rules: rules.relaxed_for_bump(),
            initial_development,
        }
    }

    /// Classify every commit since the anchor and aggregate the required bump
    pub fn analyze(&self, matched: MatchResult) -> BumpContext {
        let commits: Vec<ClassifiedCommit> = matched
            .commits
            .into_iter()
            .map(|commit| {
                let classification = self.classifier.classify(&commit.message, &self.rules);
                if let Classification::Invalid { violations } = &classification {
                    debug!(
                        sha = %commit.sha,
                        violations = violations.len(),
                        "Non-compliant commit"
                    );
                }
                ClassifiedCommit {
                    sha: commit.sha,
                    raw_message: commit.message,
                    classification,
                }
            })
            .collect();

        let required_bump = commits
            .iter()
            .map(|c| c.classification.bump())
            .max()
            .unwrap_or(BumpLevel::None);

        let initial_development = self.initial_development
            && matched
                .anchor
                .as_ref()
                .map_or(true, |anchor| anchor.version.major() == 0);

        BumpContext {
            anchor: matched.anchor,
            required_bump,
            commits,
            initial_development,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ConventionalClassifier;
    use crate::domain::Tag;
    use crate::git::CommitInfo;

    fn commit(sha: &str, message: &str) -> CommitInfo {
        CommitInfo {
            sha: sha.to_string(),
            message: message.to_string(),
            author: "Test Author".to_string(),
        }
    }

    fn matched(anchor: Option<&str>, messages: &[&str]) -> MatchResult {
        MatchResult {
            anchor: anchor.map(|name| Anchor {
                tag: Tag::new(name, "c0"),
                version: VersionNumber::parse(name).unwrap(),
            }),
            commits: messages
                .iter()
                .enumerate()
                .map(|(i, m)| commit(&format!("c{}", i + 1), m))
                .collect(),
        }
    }

    fn analyze(anchor: Option<&str>, messages: &[&str]) -> BumpContext {
        let classifier = ConventionalClassifier::new();
        VersionAnalyzer::new(&classifier, &RuleConfig::default(), true)
            .analyze(matched(anchor, messages))
    }

    #[test]
    fn test_analyze_major() {
        let ctx = analyze(Some("1.0.0"), &["feat: new feature", "fix(api)!: breaking change"]);
        assert_eq!(ctx.required_bump, BumpLevel::Major);
        assert!(ctx.has_breaking_change());
    }

    #[test]
    fn test_analyze_minor() {
        let ctx = analyze(Some("1.0.0"), &["feat: new feature", "fix: bug fix"]);
        assert_eq!(ctx.required_bump, BumpLevel::Minor);
        assert!(!ctx.has_breaking_change());
    }

    #[test]
    fn test_analyze_patch() {
        let ctx = analyze(Some("1.0.0"), &["fix: bug fix", "refactor: code cleanup"]);
        assert_eq!(ctx.required_bump, BumpLevel::Patch);
    }

    #[test]
    fn test_analyze_nothing_to_bump() {
        let ctx = analyze(Some("1.0.0"), &["docs: update readme", "chore: update deps"]);
        assert_eq!(ctx.required_bump, BumpLevel::None);
    }

    #[test]
    fn test_analyze_empty() {
        let ctx = analyze(Some("1.0.0"), &[]);
        assert_eq!(ctx.required_bump, BumpLevel::None);
        assert!(ctx.report().is_clean());
    }

    #[test]
    fn test_non_compliant_commits_reported_not_counted() {
        let ctx = analyze(
            Some("1.0.0"),
            &["Updated stuff", "feet!: typo in type", "fix: real fix"],
        );
        assert_eq!(ctx.required_bump, BumpLevel::Patch);

        let report = ctx.report();
        assert_eq!(report.compliant, 1);
        assert_eq!(report.non_compliant.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_merge_commits_ignored() {
        let ctx = analyze(
            Some("1.0.0"),
            &["Merge branch 'feature' into main", "feat: add api"],
        );
        let report = ctx.report();
        assert_eq!(report.ignored.len(), 1);
        assert!(report.is_clean());
        assert_eq!(ctx.required_bump, BumpLevel::Minor);
    }

    #[test]
    fn test_initial_development_flag() {
        assert!(analyze(Some("0.4.2"), &["feat: x"]).initial_development);
        assert!(analyze(None, &["feat: x"]).initial_development);
        assert!(!analyze(Some("1.0.0"), &["feat: x"]).initial_development);

        let classifier = ConventionalClassifier::new();
        let ctx = VersionAnalyzer::new(&classifier, &RuleConfig::default(), false)
            .analyze(matched(Some("0.4.2"), &["feat: x"]));
        assert!(!ctx.initial_development);
    }

    #[test]
    fn test_cosmetic_violations_do_not_block_bump() {
        let ctx = analyze(Some("1.0.0"), &["feat: add thing."]);
        assert_eq!(ctx.required_bump, BumpLevel::Minor);
    }
}
