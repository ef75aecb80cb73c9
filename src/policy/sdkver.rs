use super::{BumpKind, BumpResult, PolicyOutcome};
use crate::analyzer::BumpContext;
use crate::boundary::BoundaryWarning;
use crate::domain::{short_sha, BranchContext, PrereleaseKind, VersionNumber};
use crate::error::{GitBumpError, Result};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

const RC_WIDTH: usize = 2;
const DEV_WIDTH: usize = 3;

/// The kind of SdkVer version a run asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SdkVerBump {
    Rel,
    Rc,
    #[default]
    Dev,
}

impl FromStr for SdkVerBump {
    type Err = GitBumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "rel" | "release" => Ok(SdkVerBump::Rel),
            "rc" => Ok(SdkVerBump::Rc),
            "dev" => Ok(SdkVerBump::Dev),
            other => Err(GitBumpError::config(format!(
                "unknown sdkver bump '{}'; expected rel, rc or dev",
                other
            ))),
        }
    }
}

impl fmt::Display for SdkVerBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkVerBump::Rel => write!(f, "rel"),
            SdkVerBump::Rc => write!(f, "rc"),
            SdkVerBump::Dev => write!(f, "dev"),
        }
    }
}

/// What the current version is, from the policy's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Current {
    Release,
    Rc,
    Dev,
    Other,
}

impl Current {
    fn of(version: &VersionNumber) -> Self {
        match version.prerelease_kind() {
            None => Current::Release,
            Some(PrereleaseKind::Rc) => Current::Rc,
            Some(PrereleaseKind::Dev) => Current::Dev,
            Some(PrereleaseKind::Other(_)) => Current::Other,
        }
    }
}

/// SDK versioning: releases, release candidates and dev builds, with
/// release branches that only take patches.
pub struct SdkVerPolicy<'a> {
    context: &'a BumpContext,
    branch: &'a BranchContext,
    current: Option<&'a VersionNumber>,
    requested: SdkVerBump,
    head_sha: &'a str,
    head_matches_current: bool,
    max_major: Option<u64>,
}

impl<'a> SdkVerPolicy<'a> {
    /// Create a policy for the anchor version of `context`
    pub fn new(
        context: &'a BumpContext,
        branch: &'a BranchContext,
        requested: SdkVerBump,
        head_sha: &'a str,
    ) -> Self {
        SdkVerPolicy {
            context,
            branch,
            current: context.anchor_version(),
            requested,
            head_sha,
            head_matches_current: false,
            max_major: None,
        }
    }

    /// Use a different current version, such as one taken from a draft release
    pub fn with_current(mut self, current: &'a VersionNumber) -> Self {
        self.current = Some(current);
        self
    }

    /// Whether HEAD is the commit the current version is tagged on
    pub fn with_head_matches(mut self, head_matches: bool) -> Self {
        self.head_matches_current = head_matches;
        self
    }

    /// Ceiling past which breaking changes no longer bump the major version; 0 disables it
    pub fn with_max_major(mut self, max_major: Option<u64>) -> Self {
        self.max_major = max_major.filter(|m| *m > 0);
        self
    }

    /// Compute the next version
    pub fn evaluate(&self) -> Result<PolicyOutcome> {
        let Some(current) = self.current else {
            return Ok(PolicyOutcome::default());
        };

        let mut warnings = Vec::new();
        let breaking = self.effective_breaking(current, &mut warnings);
        let state = Current::of(current);

        let next = if self.branch.is_release_branch() {
            self.on_release_branch(current, state, breaking, &mut warnings)?
        } else {
            self.on_other_branch(current, state, breaking, &mut warnings)?
        };

        let bump = next.map(|(to, kind)| {
            info!(from = %current, to = %to, kind = %kind, "Computed sdkver bump");
            BumpResult {
                from: current.clone(),
                to,
                kind,
            }
        });

        Ok(PolicyOutcome { bump, warnings })
    }

    fn effective_breaking(
        &self,
        current: &VersionNumber,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> bool {
        if !self.context.has_breaking_change() {
            return false;
        }
        match self.max_major {
            Some(max_major) if current.major() >= max_major => {
                let commits = self.context.breaking_count();
                warn!(
                    max_major,
                    commits,
                    current = %current,
                    "Breaking changes ignored, major version ceiling reached"
                );
                warnings.push(BoundaryWarning::BreakingChangeSuppressed { max_major, commits });
                false
            }
            _ => true,
        }
    }

    fn on_release_branch(
        &self,
        current: &VersionNumber,
        state: Current,
        breaking: bool,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<Option<(VersionNumber, BumpKind)>> {
        if matches!(state, Current::Dev | Current::Other) {
            return Err(GitBumpError::policy(format!(
                "release branch '{}' may only carry release or release-candidate versions, \
                 found '{}'",
                self.branch.name, current
            )));
        }

        let first_rc_of_major =
            state == Current::Rc && current.minor() == 0 && current.patch() == 0;
        if breaking && !first_rc_of_major {
            return Err(GitBumpError::policy(format!(
                "breaking changes are not allowed on release branch '{}' (pattern '{}') after '{}'",
                self.branch.name, self.branch.release_pattern, current
            )));
        }

        let promoting = state == Current::Rc && self.requested == SdkVerBump::Rel;
        if self.head_matches_current && !promoting {
            warnings.push(BoundaryWarning::HeadAlreadyTagged {
                tag: current.to_string(),
            });
            return Ok(None);
        }

        let next = match (state, self.requested) {
            (Current::Release, _) => (current.next_patch()?, BumpKind::Rel),
            (Current::Rc, SdkVerBump::Rel) => (current.finalized(), BumpKind::Rel),
            (Current::Rc, SdkVerBump::Rc | SdkVerBump::Dev) => {
                (self.next_in_chain(current, RC_WIDTH)?, BumpKind::Rc)
            }
            (Current::Dev | Current::Other, _) => return Ok(None),
        };
        Ok(Some(next))
    }

    fn on_other_branch(
        &self,
        current: &VersionNumber,
        state: Current,
        breaking: bool,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<Option<(VersionNumber, BumpKind)>> {
        let release_bump = || {
            if breaking {
                current.next_major()
            } else {
                current.next_minor()
            }
        };

        let next = match (state, self.requested) {
            (Current::Rc, SdkVerBump::Rel) if self.head_matches_current => {
                (current.finalized(), BumpKind::Rel)
            }
            (Current::Release | Current::Rc, SdkVerBump::Rel) => (release_bump()?, BumpKind::Rel),
            (Current::Dev, SdkVerBump::Rel) => (current.finalized(), BumpKind::Rel),

            (Current::Release | Current::Rc, SdkVerBump::Rc) => {
                (release_bump()?.with_prerelease(first_of("rc", RC_WIDTH)), BumpKind::Rc)
            }
            (Current::Dev, SdkVerBump::Rc) => (
                current.finalized().with_prerelease(first_of("rc", RC_WIDTH)),
                BumpKind::Rc,
            ),

            (Current::Release | Current::Rc, SdkVerBump::Dev) => (
                self.with_head_suffix(&release_bump()?.with_prerelease(first_of("dev", DEV_WIDTH))),
                BumpKind::Dev,
            ),
            (Current::Dev, SdkVerBump::Dev) => match current.next_prerelease(Some(DEV_WIDTH)) {
                Some(next) => (self.with_head_suffix(&next), BumpKind::Dev),
                None => {
                    let next = self.with_head_suffix(
                        &current.next_minor()?.with_prerelease(first_of("dev", DEV_WIDTH)),
                    );
                    warn!(current = %current, next = %next, "Dev prerelease without number");
                    warnings.push(BoundaryWarning::DevPrereleaseFallback {
                        current: current.to_string(),
                        next: next.to_string(),
                    });
                    (next, BumpKind::Dev)
                }
            },

            (Current::Other, _) => {
                return Err(GitBumpError::computation(format!(
                    "cannot derive a {} version from '{}': prerelease '{}' is neither rc nor dev",
                    self.requested,
                    current,
                    current.prerelease()
                )))
            }
        };
        Ok(Some(next))
    }

    fn next_in_chain(&self, current: &VersionNumber, width: usize) -> Result<VersionNumber> {
        current.next_prerelease(Some(width)).ok_or_else(|| {
            GitBumpError::computation(format!(
                "prerelease of '{}' has no numeric suffix to increment",
                current
            ))
        })
    }

    fn with_head_suffix(&self, version: &VersionNumber) -> VersionNumber {
        version
            .with_prerelease(format!("{}.{}", version.prerelease(), short_sha(self.head_sha)))
            .with_build("")
    }
}

fn first_of(word: &str, width: usize) -> String {
    format!("{}{:0width$}", word, 1, width = width)
}
