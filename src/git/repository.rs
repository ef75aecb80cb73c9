use crate::domain::{Release, Tag};
use crate::error::{GitBumpError, Result};
use crate::git::{
    CommitInfo, CommitWalk, NewRelease, ReleaseQuery, ReleaseStore, ReleaseUpdate, Repository,
};
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Sort};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface.
///
/// A plain git repository has no release records: lookups find nothing and
/// creating a release is rejected; tags and branches are created locally.
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Resolve a revision (sha, tag, branch, `HEAD`) to a commit id
    pub fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(commit.id())
    }

    /// Short name of the checked-out branch, if HEAD is on a branch
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Ok(None);
        }
        Ok(head.shorthand().map(str::to_string))
    }

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;

        let message = commit.message().unwrap_or("(empty message)").to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();

        Ok(CommitInfo {
            sha: oid.to_string(),
            message,
            author,
        })
    }

    fn tag_target(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference.peel(ObjectType::Commit)?.id();
                Ok(Some(oid))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Map "already exists" to a platform conflict, anything else to a git error
fn map_create_error(name: &str, e: git2::Error) -> GitBumpError {
    if e.code() == ErrorCode::Exists {
        GitBumpError::conflict(name)
    } else {
        GitBumpError::Git(e)
    }
}

impl Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        let names = self.repo.tag_names(None)?;

        let mut tags = Vec::new();
        for name in names.iter().flatten() {
            match self.tag_target(name) {
                Ok(Some(oid)) => tags.push(Tag::new(name, oid.to_string())),
                Ok(None) => {}
                // Tags on trees or blobs carry no version history
                Err(GitBumpError::Git(e))
                    if matches!(e.code(), ErrorCode::Peel | ErrorCode::InvalidSpec) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(tags)
    }

    fn ancestry_from(&self, rev: &str) -> Result<CommitWalk<'_>> {
        let start = self.resolve_commit(rev)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start)?;

        Ok(Box::new(revwalk.map(move |oid_result| {
            let oid = oid_result?;
            self.commit_info(oid)
        })))
    }

    fn head_matches_tag(&self, tag_name: &str) -> Result<bool> {
        let head = self.resolve_commit("HEAD")?;
        Ok(self.tag_target(tag_name)? == Some(head))
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.resolve_commit(to)?)?;
        revwalk.hide(self.resolve_commit(from)?)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            commits.push(self.commit_info(oid_result?)?);
        }
        Ok(commits)
    }

    fn find_tag(&self, tag_name: &str) -> Result<Option<Tag>> {
        Ok(self
            .tag_target(tag_name)?
            .map(|oid| Tag::new(tag_name, oid.to_string())))
    }
}

impl ReleaseStore for Git2Repository {
    fn get_release(&self, _query: &ReleaseQuery) -> Result<Option<Release>> {
        Ok(None)
    }

    fn find_release(&self, _name: &str) -> Result<Option<Release>> {
        Ok(None)
    }

    fn create_release(&self, release: &NewRelease) -> Result<Release> {
        Err(GitBumpError::transport(
            501,
            format!(
                "cannot create release '{}': a local git repository has no releases",
                release.name
            ),
        ))
    }

    fn update_release(&self, _id: u64, _update: &ReleaseUpdate) -> Result<Option<Release>> {
        Ok(None)
    }

    fn create_tag(&self, name: &str, sha: &str) -> Result<Tag> {
        let oid = self.resolve_commit(sha)?;
        let object = self.repo.find_object(oid, None)?;

        self.repo
            .tag_lightweight(name, &object, false)
            .map_err(|e| map_create_error(name, e))?;

        Ok(Tag::new(name, oid.to_string()))
    }

    fn create_branch(&self, name: &str, sha: &str) -> Result<()> {
        let commit = self.repo.find_commit(self.resolve_commit(sha)?)?;

        self.repo
            .branch(name, &commit, false)
            .map_err(|e| map_create_error(name, e))?;

        Ok(())
    }
}
