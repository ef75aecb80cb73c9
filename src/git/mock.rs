use crate::domain::{Release, Tag};
use crate::error::{GitBumpError, Result};
use crate::git::{
    CommitInfo, CommitWalk, NewRelease, ReleaseQuery, ReleaseStore, ReleaseUpdate, Repository,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MockState {
    commits: HashMap<String, (CommitInfo, Option<String>)>,
    head: String,
    tags: BTreeMap<String, String>,
    releases: Vec<Release>,
    branches: BTreeMap<String, String>,
    next_release_id: u64,
    write_failure: Option<(u16, String)>,
}

/// In-memory platform for testing without actual git or network operations.
///
/// History is a first-parent chain; `"HEAD"` resolves to the configured head.
#[derive(Default)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn state_mut(&mut self) -> &mut MockState {
        self.state
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a commit with its parent
    pub fn add_commit(&mut self, sha: &str, message: &str, parent: Option<&str>) {
        let info = CommitInfo {
            sha: sha.to_string(),
            message: message.to_string(),
            author: "Test Author".to_string(),
        };
        self.state_mut()
            .commits
            .insert(sha.to_string(), (info, parent.map(str::to_string)));
    }

    /// Add a linear history, oldest first, and point HEAD at the last commit
    pub fn add_history(&mut self, commits: &[(&str, &str)]) {
        let mut parent: Option<String> = None;
        for (sha, message) in commits {
            self.add_commit(sha, message, parent.as_deref());
            parent = Some(sha.to_string());
        }
        if let Some(head) = parent {
            self.set_head(&head);
        }
    }

    /// Point HEAD at a commit
    pub fn set_head(&mut self, sha: &str) {
        self.state_mut().head = sha.to_string();
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: &str, sha: &str) {
        self.state_mut()
            .tags
            .insert(name.to_string(), sha.to_string());
    }

    /// Add an existing release, returning its id
    pub fn add_release(&mut self, name: &str, sha: &str, draft: bool, prerelease: bool) -> u64 {
        let state = self.state_mut();
        state.next_release_id += 1;
        let id = state.next_release_id;
        state.releases.push(Release {
            id,
            name: name.to_string(),
            tag_name: name.to_string(),
            target_sha: sha.to_string(),
            body: String::new(),
            is_draft: draft,
            is_prerelease: prerelease,
        });
        id
    }

    /// Add an existing branch
    pub fn add_branch(&mut self, name: &str, sha: &str) {
        self.state_mut()
            .branches
            .insert(name.to_string(), sha.to_string());
    }

    /// Make every subsequent create/update call fail with a transport error
    pub fn fail_writes_with(&mut self, status: u16, message: &str) {
        self.state_mut().write_failure = Some((status, message.to_string()));
    }

    pub fn tags(&self) -> BTreeMap<String, String> {
        self.state().tags.clone()
    }

    pub fn releases(&self) -> Vec<Release> {
        self.state().releases.clone()
    }

    pub fn branches(&self) -> BTreeMap<String, String> {
        self.state().branches.clone()
    }

    fn check_write(state: &MockState) -> Result<()> {
        match &state.write_failure {
            Some((status, message)) => Err(GitBumpError::transport(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn resolve(state: &MockState, rev: &str) -> Option<String> {
        if rev == "HEAD" {
            return Some(state.head.clone());
        }
        if state.commits.contains_key(rev) {
            return Some(rev.to_string());
        }
        state.tags.get(rev).cloned()
    }

    fn walk(state: &MockState, rev: &str) -> Result<Vec<CommitInfo>> {
        let mut current = Self::resolve(state, rev);
        if current.is_none() {
            return Err(GitBumpError::transport(404, format!("No commit found for '{}'", rev)));
        }

        let mut commits = Vec::new();
        while let Some(sha) = current {
            let Some((info, parent)) = state.commits.get(&sha) else {
                break;
            };
            commits.push(info.clone());
            current = parent.clone();
        }
        Ok(commits)
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self
            .state()
            .tags
            .iter()
            .map(|(name, sha)| Tag::new(name.clone(), sha.clone()))
            .collect())
    }

    fn ancestry_from(&self, rev: &str) -> Result<CommitWalk<'_>> {
        let commits = Self::walk(&self.state(), rev)?;
        Ok(Box::new(commits.into_iter().map(Ok)))
    }

    fn head_matches_tag(&self, tag_name: &str) -> Result<bool> {
        let state = self.state();
        Ok(state.tags.get(tag_name) == Some(&state.head))
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>> {
        let state = self.state();
        let stop = Self::resolve(&state, from);
        Ok(Self::walk(&state, to)?
            .into_iter()
            .take_while(|commit| Some(&commit.sha) != stop.as_ref())
            .collect())
    }

    fn find_tag(&self, tag_name: &str) -> Result<Option<Tag>> {
        Ok(self
            .state()
            .tags
            .get(tag_name)
            .map(|sha| Tag::new(tag_name, sha.clone())))
    }
}

impl ReleaseStore for MockRepository {
    fn get_release(&self, query: &ReleaseQuery) -> Result<Option<Release>> {
        Ok(query
            .select_latest(self.state().releases.iter())
            .map(|(release, _)| release))
    }

    fn find_release(&self, name: &str) -> Result<Option<Release>> {
        Ok(self
            .state()
            .releases
            .iter()
            .find(|r| r.name == name || r.tag_name == name)
            .cloned())
    }

    fn create_release(&self, release: &NewRelease) -> Result<Release> {
        let mut state = self.state();
        Self::check_write(&state)?;

        if state.releases.iter().any(|r| r.tag_name == release.name) {
            return Err(GitBumpError::conflict(&release.name));
        }

        if !release.draft {
            state
                .tags
                .entry(release.name.clone())
                .or_insert_with(|| release.target_sha.clone());
        }

        state.next_release_id += 1;
        let created = Release {
            id: state.next_release_id,
            name: release.name.clone(),
            tag_name: release.name.clone(),
            target_sha: release.target_sha.clone(),
            body: release.body.clone(),
            is_draft: release.draft,
            is_prerelease: release.prerelease,
        };
        state.releases.push(created.clone());
        Ok(created)
    }

    fn update_release(&self, id: u64, update: &ReleaseUpdate) -> Result<Option<Release>> {
        let mut state = self.state();
        Self::check_write(&state)?;

        let Some(existing) = state.releases.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        existing.name = update.name.clone();
        existing.tag_name = update.tag_name.clone();
        existing.target_sha = update.target_sha.clone();
        existing.body = update.body.clone();
        if let Some(draft) = update.draft {
            existing.is_draft = draft;
        }
        if let Some(prerelease) = update.prerelease {
            existing.is_prerelease = prerelease;
        }
        let updated = existing.clone();
        if !updated.is_draft {
            state
                .tags
                .entry(updated.tag_name.clone())
                .or_insert_with(|| updated.target_sha.clone());
        }
        Ok(Some(updated))
    }

    fn create_tag(&self, name: &str, sha: &str) -> Result<Tag> {
        let mut state = self.state();
        Self::check_write(&state)?;

        if state.tags.contains_key(name) {
            return Err(GitBumpError::conflict(name));
        }
        state.tags.insert(name.to_string(), sha.to_string());
        Ok(Tag::new(name, sha))
    }

    fn create_branch(&self, name: &str, sha: &str) -> Result<()> {
        let mut state = self.state();
        Self::check_write(&state)?;

        if state.branches.contains_key(name) {
            return Err(GitBumpError::conflict(name));
        }
        state.branches.insert(name.to_string(), sha.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_history(&[
            ("c1", "feat: first"),
            ("c2", "fix: second"),
            ("c3", "feat: third"),
        ]);
        repo.add_tag("v1.0.0", "c1");
        repo
    }

    #[test]
    fn test_ancestry_newest_first() {
        let repo = repo();
        let shas: Vec<String> = repo
            .ancestry_from("HEAD")
            .unwrap()
            .map(|c| c.unwrap().sha)
            .collect();
        assert_eq!(shas, vec!["c3", "c2", "c1"]);
    }

    #[test]
    fn test_ancestry_unknown_revision() {
        assert!(repo().ancestry_from("nope").is_err());
    }

    #[test]
    fn test_commits_between_tag_and_head() {
        let repo = repo();
        let commits = repo.commits_between("v1.0.0", "HEAD").unwrap();
        let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["c3", "c2"]);
    }

    #[test]
    fn test_head_matches_tag() {
        let mut repo = repo();
        assert!(!repo.head_matches_tag("v1.0.0").unwrap());
        repo.set_head("c1");
        assert!(repo.head_matches_tag("v1.0.0").unwrap());
        assert!(!repo.head_matches_tag("v9.9.9").unwrap());
    }

    #[test]
    fn test_create_tag_conflict() {
        let repo = repo();
        assert!(repo.create_tag("v1.1.0", "c3").is_ok());
        assert!(matches!(
            repo.create_tag("v1.1.0", "c3"),
            Err(GitBumpError::PlatformConflict { .. })
        ));
    }

    #[test]
    fn test_find_release_by_name() {
        let mut repo = repo();
        let id = repo.add_release("v1.1.0-dev1", "c2", true, false);

        let found = repo.find_release("v1.1.0-dev1").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.target_sha, "c2");
        assert!(repo.find_release("v1.1.0").unwrap().is_none());
    }

    #[test]
    fn test_update_unknown_release() {
        let repo = repo();
        let update = ReleaseUpdate {
            name: "1.0.1".to_string(),
            tag_name: "1.0.1".to_string(),
            target_sha: "c3".to_string(),
            body: String::new(),
            draft: None,
            prerelease: None,
        };
        assert_eq!(repo.update_release(42, &update).unwrap(), None);
    }

    #[test]
    fn test_write_failure_injection() {
        let mut repo = repo();
        repo.fail_writes_with(503, "service unavailable");
        assert!(matches!(
            repo.create_branch("release/1.1", "c3"),
            Err(GitBumpError::PlatformTransport { status: 503, .. })
        ));
    }
}
