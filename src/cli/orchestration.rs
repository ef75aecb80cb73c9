//! Main workflow orchestration logic
//!
//! Runs one invocation end to end: anchor lookup, classification, the bump
//! policy of the configured scheme, then the publish step. Everything the run
//! depends on comes in through [Config] and [RunRequest]; nothing here reads
//! the environment.

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzer::{ClassificationReport, TagCommitMatcher, VersionAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::classify::CommitClassifier;
use crate::config::{Config, VersionScheme};
use crate::domain::{short_sha, BumpLevel, Classification, ClassifiedCommit, VersionNumber};
use crate::error::{GitBumpError, Result};
use crate::git::{ReleaseStore, Repository};
use crate::policy::{
    BumpKind, BumpResult, DraftReconciler, PolicyOutcome, SdkVerBump, SdkVerPolicy, SemVerPolicy,
};
use crate::publish::{PublishDecision, PublishOutcome, ReleaseMode};

/// Inputs of a single run
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic,
/// so the pipeline can be driven programmatically without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Revision to compute the version for
    pub head: String,
    /// Branch the run is for
    pub branch: String,
    pub is_pull_request: bool,
    pub release_mode: ReleaseMode,
    /// Requested kind for SdkVer runs
    pub sdkver_bump: SdkVerBump,
    pub discussion_category: Option<String>,
    /// Release body; generated from the commits when absent
    pub release_notes: Option<String>,
}

impl RunRequest {
    pub fn new(branch: impl Into<String>) -> Self {
        RunRequest {
            head: "HEAD".to_string(),
            branch: branch.into(),
            is_pull_request: false,
            release_mode: ReleaseMode::None,
            sdkver_bump: SdkVerBump::default(),
            discussion_category: None,
            release_notes: None,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub scheme: VersionScheme,
    pub branch: String,
    /// Version the bump started from, after draft substitution
    pub current_version: Option<VersionNumber>,
    pub bump: Option<BumpResult>,
    pub outcome: Option<PublishOutcome>,
    pub report: ClassificationReport,
    pub warnings: Vec<BoundaryWarning>,
}

/// Structured bump metadata for machine consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpMetadata {
    pub from: VersionNumber,
    pub to: VersionNumber,
    pub kind: BumpKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl RunReport {
    pub fn next_version(&self) -> Option<&VersionNumber> {
        self.bump.as_ref().map(|b| &b.to)
    }

    pub fn metadata(&self) -> Option<BumpMetadata> {
        let bump = self.bump.as_ref()?;
        let outcome = self.outcome.as_ref();
        Some(BumpMetadata {
            from: bump.from.clone(),
            to: bump.to.clone(),
            kind: bump.kind,
            release: outcome.and_then(|o| o.release.as_ref()).map(|r| r.name.clone()),
            tag: outcome.and_then(|o| o.tag.as_ref()).map(|t| t.name.clone()),
        })
    }
}

/// Run the whole pipeline for one target commit
///
/// # Arguments
///
/// * `config` - Validated before anything else happens
/// * `repo` - Tag and history source
/// * `store` - Release platform used for drafts and publishing
/// * `classifier` - Commit message classifier
/// * `request` - Per-run inputs
///
/// # Returns
///
/// The run report, or the fatal condition that stopped the run. Policy
/// violations and computation failures are raised before any publish call.
pub fn run_pipeline<R, S, C>(
    config: &Config,
    repo: &R,
    store: &S,
    classifier: &C,
    request: &RunRequest,
) -> Result<RunReport>
where
    R: Repository + ?Sized,
    S: ReleaseStore + ?Sized,
    C: CommitClassifier + ?Sized,
{
    config.validate()?;
    let branch = config.branch_context(&request.branch)?;
    let prefix = config.prefix_filter();

    let head_sha = resolve_head(repo, &request.head)?;
    info!(
        scheme = %config.version_scheme,
        branch = %branch.name,
        head = %short_sha(&head_sha),
        release_branch = branch.is_release,
        "Starting version run"
    );

    let matched = TagCommitMatcher::new(prefix.clone()).find_anchor(repo, &request.head)?;
    let mut warnings = Vec::new();
    if matched.anchor.is_none() {
        warnings.push(BoundaryWarning::NoAnchorTag {
            prefix: prefix.pattern.clone(),
        });
    }

    let context = VersionAnalyzer::new(classifier, &config.rules, config.initial_development)
        .analyze(matched);
    debug!(
        required = %context.required_bump,
        commits = context.commits.len(),
        initial_development = context.initial_development,
        "Analyzed commits"
    );

    let decision = PublishDecision::new(request.release_mode, &branch, request.is_pull_request)
        .with_discussion_category(request.discussion_category.as_deref());
    let reconciler = DraftReconciler::new(store, prefix);

    let mut current_version = context.anchor_version().cloned();
    let mut draft_id = None;

    let policy = match config.version_scheme {
        VersionScheme::SemVer => {
            let outcome = SemVerPolicy::new(&context, &branch).evaluate()?;
            let fallback_prefix = config
                .prerelease_prefix
                .as_deref()
                .filter(|_| outcome.bump.is_none())
                .filter(|_| request.release_mode == ReleaseMode::Release)
                .filter(|_| decision.permits_publish());

            match (fallback_prefix, context.anchor_version()) {
                (Some(word), Some(anchor)) => {
                    let (next, id) = reconciler.semver_prerelease(anchor, word)?;
                    draft_id = id;
                    PolicyOutcome {
                        bump: Some(BumpResult {
                            from: anchor.clone(),
                            to: next,
                            kind: BumpKind::Patch,
                        }),
                        warnings: Vec::new(),
                    }
                }
                _ => outcome,
            }
        }
        VersionScheme::SdkVer => match &context.anchor {
            None => PolicyOutcome::default(),
            Some(anchor) => {
                let draft = reconciler.reconcile(&anchor.version, branch.is_release)?;
                if let Some(draft) = &draft {
                    warnings.push(BoundaryWarning::DraftSubstituted {
                        draft: draft.release.name.clone(),
                        tag: anchor.tag.name.clone(),
                    });
                    current_version = Some(draft.version.clone());
                    draft_id = Some(draft.release.id);
                }

                // re-read from the platform rather than trusting the anchor's sha
                let head_matches = if request.head == "HEAD" {
                    repo.head_matches_tag(&anchor.tag.name)?
                } else {
                    repo.find_tag(&anchor.tag.name)?
                        .is_some_and(|tag| tag.target_sha == head_sha)
                };

                let mut policy =
                    SdkVerPolicy::new(&context, &branch, request.sdkver_bump, &head_sha)
                        .with_head_matches(head_matches)
                        .with_max_major(config.max_major());
                if let Some(draft) = &draft {
                    policy = policy.with_current(&draft.version);
                }
                policy.evaluate()?
            }
        },
    };
    warnings.extend(policy.warnings);
    let report = context.report();

    let Some(bump) = policy.bump else {
        info!("No new version");
        return Ok(RunReport {
            scheme: config.version_scheme,
            branch: branch.name.clone(),
            current_version,
            bump: None,
            outcome: None,
            report,
            warnings,
        });
    };

    let notes = match &request.release_notes {
        Some(notes) => notes.clone(),
        None => release_notes(&context.commits),
    };
    let outcome = decision.publish(store, repo, &bump.to, &head_sha, draft_id, &notes)?;

    if config.version_scheme == VersionScheme::SdkVer
        && !branch.is_release
        && bump.kind != BumpKind::Dev
        && decision.permits_publish()
    {
        if let Some(branch_prefix) = &config.sdkver_create_release_branches {
            if let Some(warning) =
                decision.create_release_branch(store, branch_prefix, &bump.to, &head_sha)?
            {
                warnings.push(warning);
            }
        }
    }

    Ok(RunReport {
        scheme: config.version_scheme,
        branch: branch.name.clone(),
        current_version,
        bump: Some(bump),
        outcome: Some(outcome),
        report,
        warnings,
    })
}

fn resolve_head<R: Repository + ?Sized>(repo: &R, rev: &str) -> Result<String> {
    match repo.ancestry_from(rev)?.next() {
        Some(commit) => Ok(commit?.sha),
        None => Err(GitBumpError::computation(format!(
            "no commit found for '{}'",
            rev
        ))),
    }
}

/// Release body listing the commits that made up the bump, most significant first
fn release_notes(commits: &[ClassifiedCommit]) -> String {
    let mut entries: Vec<(BumpLevel, String)> = commits
        .iter()
        .filter_map(|commit| match &commit.classification {
            Classification::Classified { bump, .. } => Some((
                *bump,
                format!("- {} ({})", commit.subject(), commit.short_sha()),
            )),
            _ => None,
        })
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0));

    entries
        .into_iter()
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}
