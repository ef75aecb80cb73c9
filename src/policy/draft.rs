use crate::domain::{PrefixFilter, Release, VersionNumber};
use crate::error::{GitBumpError, Result};
use crate::git::{ReleaseQuery, ReleaseStore};
use tracing::{debug, info};

/// A draft release whose version continues a prerelease chain
#[derive(Debug, Clone, PartialEq)]
pub struct DraftCandidate {
    pub release: Release,
    pub version: VersionNumber,
}

/// Looks up draft releases so that consecutive unpublished prereleases keep
/// counting up instead of restarting from the last tag.
pub struct DraftReconciler<'a, S: ReleaseStore + ?Sized> {
    store: &'a S,
    prefix: PrefixFilter,
}

impl<'a, S: ReleaseStore + ?Sized> DraftReconciler<'a, S> {
    pub fn new(store: &'a S, prefix: PrefixFilter) -> Self {
        DraftReconciler { store, prefix }
    }

    /// Latest draft for the given major (and optionally minor) version
    pub fn find_draft(&self, major: u64, minor: Option<u64>) -> Result<Option<DraftCandidate>> {
        let query = ReleaseQuery {
            prefix: self.prefix.clone(),
            draft_only: true,
            full_releases_only: false,
            major_minor: Some((major, minor)),
        };

        let found = self.store.get_release(&query)?.and_then(|release| {
            let version = self.prefix.parse(&release.name)?;
            Some(DraftCandidate { release, version })
        });
        debug!(major, ?minor, found = found.is_some(), "Draft lookup");
        Ok(found)
    }

    /// Draft that should replace `anchor` as the current version of an SdkVer run.
    ///
    /// Drafts for the next major and the next minor are considered; the higher
    /// one is used when it ranks above the anchor. Release branches never
    /// substitute.
    pub fn reconcile(
        &self,
        anchor: &VersionNumber,
        is_release_branch: bool,
    ) -> Result<Option<DraftCandidate>> {
        if is_release_branch {
            return Ok(None);
        }

        // no draft can exist past the largest representable component
        let next_major = match anchor.major().checked_add(1) {
            Some(major) => self.find_draft(major, Some(0))?,
            None => None,
        };
        let next_minor = match anchor.minor().checked_add(1) {
            Some(minor) => self.find_draft(anchor.major(), Some(minor))?,
            None => None,
        };

        let best = match (next_major, next_minor) {
            (Some(a), Some(b)) => Some(if a.version.compare(&b.version).is_ge() { a } else { b }),
            (a, b) => a.or(b),
        };

        let best = best.filter(|draft| draft.version.compare(anchor).is_gt());
        if let Some(draft) = &best {
            info!(draft = %draft.release.name, anchor = %anchor, "Continuing from draft release");
        }
        Ok(best)
    }

    /// Next SemVer prerelease when no bump is required.
    ///
    /// An existing draft for the next patch's `major.minor` has its chain
    /// advanced; otherwise a fresh `<prefix>1` prerelease of the next patch is
    /// started. Returns the version together with the draft to update, if any.
    pub fn semver_prerelease(
        &self,
        anchor: &VersionNumber,
        prerelease_prefix: &str,
    ) -> Result<(VersionNumber, Option<u64>)> {
        let patch = anchor.next_patch()?;

        let draft = self
            .find_draft(patch.major(), Some(patch.minor()))?
            .filter(|draft| draft.version.compare(anchor).is_gt());

        match draft {
            Some(draft) => {
                let next = draft.version.next_prerelease(None).ok_or_else(|| {
                    GitBumpError::computation(format!(
                        "draft release '{}' has no numeric prerelease suffix to increment",
                        draft.release.name
                    ))
                })?;
                info!(draft = %draft.release.name, next = %next, "Advancing draft prerelease");
                Ok((next, Some(draft.release.id)))
            }
            None => Ok((patch.with_prerelease(format!("{}1", prerelease_prefix)), None)),
        }
    }
}
