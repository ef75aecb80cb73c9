use crate::boundary::BoundaryWarning;
use crate::domain::{BranchContext, Release, Tag, VersionNumber};
use crate::error::{GitBumpError, Result};
use crate::git::{NewRelease, ReleaseStore, ReleaseUpdate, Repository};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// What a run publishes once a new version is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    #[default]
    None,
    Tag,
    Release,
}

impl FromStr for ReleaseMode {
    type Err = GitBumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ReleaseMode::None),
            "tag" => Ok(ReleaseMode::Tag),
            "release" => Ok(ReleaseMode::Release),
            other => Err(GitBumpError::config(format!(
                "unknown release mode '{}'; expected none, tag or release",
                other
            ))),
        }
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseMode::None => write!(f, "none"),
            ReleaseMode::Tag => write!(f, "tag"),
            ReleaseMode::Release => write!(f, "release"),
        }
    }
}

/// Why a computed version was not published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ModeNone,
    BranchNotAllowed,
    PullRequest,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ModeNone => write!(f, "release mode is none"),
            SkipReason::BranchNotAllowed => write!(f, "branch not allowed"),
            SkipReason::PullRequest => write!(f, "no publish from PR context"),
        }
    }
}

/// Result of the publish step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishOutcome {
    pub version: VersionNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl PublishOutcome {
    fn skipped(version: &VersionNumber, reason: SkipReason) -> Self {
        PublishOutcome {
            version: version.clone(),
            release: None,
            tag: None,
            skipped: Some(reason),
        }
    }

    pub fn is_published(&self) -> bool {
        self.release.is_some() || self.tag.is_some()
    }
}

/// Maps a computed version to a publish action
#[derive(Debug, Clone)]
pub struct PublishDecision<'a> {
    pub mode: ReleaseMode,
    pub branch: &'a BranchContext,
    pub is_pull_request: bool,
    pub discussion_category: Option<&'a str>,
}

impl<'a> PublishDecision<'a> {
    pub fn new(mode: ReleaseMode, branch: &'a BranchContext, is_pull_request: bool) -> Self {
        PublishDecision {
            mode,
            branch,
            is_pull_request,
            discussion_category: None,
        }
    }

    pub fn with_discussion_category(mut self, category: Option<&'a str>) -> Self {
        self.discussion_category = category;
        self
    }

    /// Reason publishing is not attempted, checked in order: mode, branch, pull request
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.mode == ReleaseMode::None {
            Some(SkipReason::ModeNone)
        } else if !self.branch.may_publish {
            Some(SkipReason::BranchNotAllowed)
        } else if self.is_pull_request {
            Some(SkipReason::PullRequest)
        } else {
            None
        }
    }

    pub fn permits_publish(&self) -> bool {
        self.skip_reason().is_none()
    }

    /// Publish `version` at `head_sha`.
    ///
    /// In release mode an existing draft is renamed and retargeted when
    /// `draft_id` is given; a new release is created only if that update
    /// yields nothing. An "already exists" answer is read back and turned
    /// into [GitBumpError::AlreadyExists].
    pub fn publish<S, R>(
        &self,
        store: &S,
        repo: &R,
        version: &VersionNumber,
        head_sha: &str,
        draft_id: Option<u64>,
        body: &str,
    ) -> Result<PublishOutcome>
    where
        S: ReleaseStore + ?Sized,
        R: Repository + ?Sized,
    {
        if let Some(reason) = self.skip_reason() {
            info!(version = %version, reason = %reason, "Not publishing");
            return Ok(PublishOutcome::skipped(version, reason));
        }

        let name = version.to_string();
        let mut outcome = PublishOutcome {
            version: version.clone(),
            release: None,
            tag: None,
            skipped: None,
        };

        let attempt = match self.mode {
            ReleaseMode::Tag => store.create_tag(&name, head_sha).map(|tag| {
                info!(tag = %tag.name, sha = %tag.target_sha, "Created tag");
                outcome.tag = Some(tag);
            }),
            ReleaseMode::Release => self
                .publish_release(store, version, head_sha, draft_id, body)
                .map(|release| {
                    info!(
                        release = %release.name,
                        id = release.id,
                        draft = release.is_draft,
                        prerelease = release.is_prerelease,
                        "Published release"
                    );
                    outcome.release = Some(release);
                }),
            ReleaseMode::None => Ok(()),
        };

        match attempt {
            Ok(()) => Ok(outcome),
            Err(GitBumpError::PlatformConflict { name }) => {
                // drafts have a release record but no tag yet
                let target_sha = match repo.find_tag(&name)? {
                    Some(tag) => Some(tag.target_sha),
                    None => store.find_release(&name)?.map(|release| release.target_sha),
                };
                warn!(name = %name, target = ?target_sha, "Version already exists");
                Err(GitBumpError::AlreadyExists { name, target_sha })
            }
            Err(other) => Err(other),
        }
    }

    fn publish_release<S: ReleaseStore + ?Sized>(
        &self,
        store: &S,
        version: &VersionNumber,
        head_sha: &str,
        draft_id: Option<u64>,
        body: &str,
    ) -> Result<Release> {
        let name = version.to_string();
        let prerelease = version.is_release_candidate();
        let draft = version.is_prerelease() && !prerelease;

        if let Some(id) = draft_id {
            let update = ReleaseUpdate {
                name: name.clone(),
                tag_name: name.clone(),
                target_sha: head_sha.to_string(),
                body: body.to_string(),
                draft: Some(draft),
                prerelease: Some(prerelease),
            };
            match store.update_release(id, &update)? {
                Some(release) => return Ok(release),
                None => warn!(id, release = %name, "Draft update failed, creating a new release"),
            }
        }

        store.create_release(&NewRelease {
            name,
            target_sha: head_sha.to_string(),
            body: body.to_string(),
            draft,
            prerelease,
            discussion_category: self.discussion_category.map(str::to_string),
        })
    }

    /// Create the release branch `<prefix><major>.<minor>` for `version`.
    ///
    /// An existing branch is reported as a warning.
    pub fn create_release_branch<S: ReleaseStore + ?Sized>(
        &self,
        store: &S,
        branch_prefix: &str,
        version: &VersionNumber,
        head_sha: &str,
    ) -> Result<Option<BoundaryWarning>> {
        let branch = format!("{}{}.{}", branch_prefix, version.major(), version.minor());
        match store.create_branch(&branch, head_sha) {
            Ok(()) => {
                info!(branch = %branch, sha = %head_sha, "Created release branch");
                Ok(None)
            }
            Err(GitBumpError::PlatformConflict { .. }) => {
                warn!(branch = %branch, "Release branch already exists");
                Ok(Some(BoundaryWarning::ReleaseBranchExists { branch }))
            }
            Err(other) => Err(other),
        }
    }
}
