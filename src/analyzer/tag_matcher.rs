use crate::domain::{PrefixFilter, Tag, VersionNumber};
use crate::error::Result;
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;
use tracing::{debug, info};

/// The nearest ancestor tag carrying a version
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub tag: Tag,
    pub version: VersionNumber,
}

/// Result of walking history from a target commit
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Nearest matching tag, if any was found
    pub anchor: Option<Anchor>,
    /// Visited commits newer than the anchor, newest first
    pub commits: Vec<CommitInfo>,
}

/// Matches the nearest ancestor version tag to a target commit
pub struct TagCommitMatcher {
    filter: PrefixFilter,
}

impl TagCommitMatcher {
    /// Create a new matcher for the given prefix filter
    pub fn new(filter: PrefixFilter) -> Self {
        TagCommitMatcher { filter }
    }

    /// Walk ancestry from `target` until a commit carries a matching tag.
    ///
    /// When several matching tags point at the same commit the highest version
    /// wins. Without any match the whole visited history is returned.
    pub fn find_anchor<R: Repository + ?Sized>(
        &self,
        repo: &R,
        target: &str,
    ) -> Result<MatchResult> {
        let mut candidates: HashMap<String, Vec<(Tag, VersionNumber)>> = HashMap::new();
        for tag in repo.list_tags()? {
            if let Some(version) = self.filter.parse(&tag.name) {
                candidates
                    .entry(tag.target_sha.clone())
                    .or_default()
                    .push((tag, version));
            }
        }

        let mut commits = Vec::new();
        for commit in repo.ancestry_from(target)? {
            let commit = commit?;

            if let Some(mut matches) = candidates.remove(&commit.sha) {
                matches.sort_by(|(_, a), (_, b)| b.compare(a));
                if let Some((tag, version)) = matches.into_iter().next() {
                    info!(
                        tag = %tag.name,
                        sha = %commit.sha,
                        commits = commits.len(),
                        "Found anchor tag"
                    );
                    return Ok(MatchResult {
                        anchor: Some(Anchor { tag, version }),
                        commits,
                    });
                }
            }

            debug!(sha = %commit.sha, "No matching tag on commit");
            commits.push(commit);
        }

        info!(
            prefix = %self.filter.pattern,
            commits = commits.len(),
            "No matching tag found in history"
        );
        Ok(MatchResult {
            anchor: None,
            commits,
        })
    }
}
