//! Version-control and release platform abstraction layer
//!
//! The engine talks to the hosting platform through two narrow traits:
//!
//! - [Repository]: reading tags and commit ancestry
//! - [ReleaseStore]: looking up, creating and updating releases, tags and branches
//!
//! The concrete implementations include:
//!
//! - [repository::Git2Repository]: a local repository through the `git2` crate
//! - [mock::MockRepository]: an in-memory platform for testing
//!
//! # Usage
//!
//! ```rust
//! # use git_bump::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_bump::Result<()> {
//! let tags = repo.list_tags()?;
//! for commit in repo.ancestry_from("HEAD")? {
//!     let commit = commit?;
//!     let tagged = tags.iter().any(|t| t.target_sha == commit.sha);
//!     println!("{} {}", commit.sha, tagged);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{PrefixFilter, Release, Tag, VersionNumber};
use crate::error::Result;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub sha: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// Lazy, finite sequence of commits in reverse-chronological ancestry order
pub type CommitWalk<'a> = Box<dyn Iterator<Item = Result<CommitInfo>> + 'a>;

/// Read access to tags and commit history
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map their
/// transport errors to [crate::error::GitBumpError::PlatformTransport] (or
/// [crate::error::GitBumpError::Git] for local repositories).
pub trait Repository {
    /// All tags with the commit they point at
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Walk ancestry starting at (and including) the given revision, newest first.
    ///
    /// Each call starts a fresh walk.
    fn ancestry_from(&self, rev: &str) -> Result<CommitWalk<'_>>;

    /// Whether HEAD is the commit the named tag points at
    fn head_matches_tag(&self, tag_name: &str) -> Result<bool>;

    /// Commits reachable from `to` but not from `from`, newest first
    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>>;

    /// Find a tag by name
    ///
    /// # Returns
    /// * `Ok(Some(Tag))` - The tag and the commit it points at
    /// * `Ok(None)` - If the tag doesn't exist
    /// * `Err` - If the lookup itself failed
    fn find_tag(&self, tag_name: &str) -> Result<Option<Tag>>;
}

/// Criteria for looking up the latest release
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseQuery {
    pub prefix: PrefixFilter,
    /// Only draft releases
    pub draft_only: bool,
    /// Only published, final releases
    pub full_releases_only: bool,
    /// Required major version, and optionally minor version
    pub major_minor: Option<(u64, Option<u64>)>,
}

impl ReleaseQuery {
    /// Whether a release satisfies every criterion of the query
    pub fn matches(&self, release: &Release) -> bool {
        let Some(version) = self.prefix.parse(&release.name) else {
            return false;
        };

        if self.draft_only && !release.is_draft {
            return false;
        }
        if self.full_releases_only
            && (release.is_draft || release.is_prerelease || version.is_prerelease())
        {
            return false;
        }

        match self.major_minor {
            Some((major, _)) if version.major() != major => false,
            Some((_, Some(minor))) if version.minor() != minor => false,
            _ => true,
        }
    }

    /// The matching release with the highest version
    pub fn select_latest<'a, I>(&self, releases: I) -> Option<(Release, VersionNumber)>
    where
        I: IntoIterator<Item = &'a Release>,
    {
        releases
            .into_iter()
            .filter(|release| self.matches(release))
            .filter_map(|release| release.version().map(|v| (release.clone(), v)))
            .max_by(|(_, a), (_, b)| a.compare(b))
    }
}

/// Parameters for creating a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub name: String,
    pub target_sha: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    pub discussion_category: Option<String>,
}

/// Parameters for updating an existing release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseUpdate {
    pub name: String,
    pub tag_name: String,
    pub target_sha: String,
    pub body: String,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
}

/// Write access to the release platform
///
/// Creating something whose name already exists fails with
/// [crate::error::GitBumpError::PlatformConflict].
pub trait ReleaseStore {
    /// Latest release matching the query
    fn get_release(&self, query: &ReleaseQuery) -> Result<Option<Release>>;

    /// Release whose name or tag name is exactly `name`, drafts included
    fn find_release(&self, name: &str) -> Result<Option<Release>>;

    /// Create a release (its tag is named after the release)
    fn create_release(&self, release: &NewRelease) -> Result<Release>;

    /// Rename and retarget an existing release; `None` if the update failed
    fn update_release(&self, id: u64, update: &ReleaseUpdate) -> Result<Option<Release>>;

    /// Create a lightweight tag
    fn create_tag(&self, name: &str, sha: &str) -> Result<Tag>;

    /// Create a branch
    fn create_branch(&self, name: &str, sha: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(id: u64, name: &str, draft: bool, prerelease: bool) -> Release {
        Release {
            id,
            name: name.to_string(),
            tag_name: name.to_string(),
            target_sha: "abc".to_string(),
            body: String::new(),
            is_draft: draft,
            is_prerelease: prerelease,
        }
    }

    #[test]
    fn test_query_draft_only() {
        let query = ReleaseQuery {
            draft_only: true,
            ..ReleaseQuery::default()
        };
        assert!(query.matches(&release(1, "1.2.0-dev001", true, false)));
        assert!(!query.matches(&release(2, "1.2.0", false, false)));
    }

    #[test]
    fn test_query_full_releases_only() {
        let query = ReleaseQuery {
            full_releases_only: true,
            ..ReleaseQuery::default()
        };
        assert!(query.matches(&release(1, "1.2.0", false, false)));
        assert!(!query.matches(&release(2, "1.3.0-rc01", false, true)));
        assert!(!query.matches(&release(3, "1.3.0-dev001", true, false)));
    }

    #[test]
    fn test_query_major_minor_constraint() {
        let query = ReleaseQuery {
            major_minor: Some((1, Some(3))),
            ..ReleaseQuery::default()
        };
        assert!(query.matches(&release(1, "1.3.0-dev002", true, false)));
        assert!(!query.matches(&release(2, "1.4.0-dev002", true, false)));

        let major_only = ReleaseQuery {
            major_minor: Some((2, None)),
            ..ReleaseQuery::default()
        };
        assert!(major_only.matches(&release(3, "2.7.1", false, false)));
    }

    #[test]
    fn test_query_prefix() {
        let query = ReleaseQuery {
            prefix: PrefixFilter::new("v"),
            ..ReleaseQuery::default()
        };
        assert!(query.matches(&release(1, "v1.0.0", false, false)));
        assert!(!query.matches(&release(2, "1.0.0", false, false)));
        assert!(!query.matches(&release(3, "nightly", false, false)));
    }

    #[test]
    fn test_select_latest_by_precedence() {
        let releases = vec![
            release(1, "1.3.0-dev009", true, false),
            release(2, "1.3.0-dev010", true, false),
            release(3, "1.2.0-dev099", true, false),
        ];
        let (latest, version) = ReleaseQuery::default()
            .select_latest(releases.iter())
            .unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(version.prerelease(), "dev010");
    }
}
