use regex::Regex;

/// Represents the branch a run is executed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_release: bool,
    pub may_publish: bool,
    /// Pattern release branches are recognised by, for diagnostics
    pub release_pattern: String,
}

impl BranchContext {
    /// Create a branch context from the configured release and publish patterns
    pub fn new(name: impl Into<String>, release_pattern: &Regex, allowed_pattern: &Regex) -> Self {
        let name = name.into();
        let is_release = release_pattern.is_match(&name);
        let may_publish = allowed_pattern.is_match(&name);

        BranchContext {
            name,
            is_release,
            may_publish,
            release_pattern: release_pattern.as_str().to_string(),
        }
    }

    /// Check if this is a release branch
    pub fn is_release_branch(&self) -> bool {
        self.is_release
    }
}
