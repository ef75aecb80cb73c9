use crate::domain::version::VersionNumber;
use serde::Serialize;

/// A tag on the platform, pointing at a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub target_sha: String,
}

impl Tag {
    /// Create a new tag reference
    pub fn new(name: impl Into<String>, target_sha: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            target_sha: target_sha.into(),
        }
    }

    /// Version carried by the tag name, if any
    pub fn version(&self) -> Option<VersionNumber> {
        VersionNumber::parse(&self.name)
    }
}

/// A release record on the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub id: u64,
    pub name: String,
    pub tag_name: String,
    pub target_sha: String,
    pub body: String,
    pub is_draft: bool,
    pub is_prerelease: bool,
}

impl Release {
    /// Version carried by the release name, if any
    pub fn version(&self) -> Option<VersionNumber> {
        VersionNumber::parse(&self.name)
    }
}

/// Which version prefixes a tag or release name may carry
/// (e.g. `"v"`, `"sdk-"`, or `"*"` for any prefix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFilter {
    pub pattern: String,
}

impl PrefixFilter {
    /// Create a new prefix filter
    pub fn new(pattern: impl Into<String>) -> Self {
        PrefixFilter {
            pattern: pattern.into(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.pattern == "*"
    }

    /// Whether a parsed version satisfies this filter
    pub fn matches(&self, version: &VersionNumber) -> bool {
        self.is_wildcard() || version.prefix() == self.pattern
    }

    /// Parse a name and keep it only if its prefix satisfies the filter
    pub fn parse(&self, name: &str) -> Option<VersionNumber> {
        VersionNumber::parse(name).filter(|version| self.matches(version))
    }
}

impl Default for PrefixFilter {
    fn default() -> Self {
        PrefixFilter::new("*")
    }
}
