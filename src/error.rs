use thiserror::Error;

/// Unified error type for git-bump operations
#[derive(Error, Debug)]
pub enum GitBumpError {
    /// A branch rule forbids the computed bump; nothing is published
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    /// The next version could not be derived from the current one
    #[error("Bump computation failed: {0}")]
    BumpComputation(String),

    /// Raw "already exists" answer from the platform
    #[error("'{name}' already exists on the platform")]
    PlatformConflict { name: String },

    /// An "already exists" conflict after read-back of the existing target
    #[error("{}", already_exists_message(.name, .target_sha.as_deref()))]
    AlreadyExists {
        name: String,
        target_sha: Option<String>,
    },

    #[error("Platform request failed with status {status}: {message}")]
    PlatformTransport { status: u16, message: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn already_exists_message(name: &str, target_sha: Option<&str>) -> String {
    match target_sha {
        Some(sha) => format!(
            "Tag '{}' already exists and points at commit {}; inspect it with `git show {}`",
            name, sha, name
        ),
        None => format!(
            "Release '{}' already exists; inspect the existing release '{}' on the platform",
            name, name
        ),
    }
}

/// Convenience type alias for Results in git-bump
pub type Result<T> = std::result::Result<T, GitBumpError>;

impl GitBumpError {
    /// Create a policy violation with context
    pub fn policy(msg: impl Into<String>) -> Self {
        GitBumpError::PolicyViolation(msg.into())
    }

    /// Create a bump computation failure with context
    pub fn computation(msg: impl Into<String>) -> Self {
        GitBumpError::BumpComputation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitBumpError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitBumpError::Version(msg.into())
    }

    /// Create a platform conflict for an existing name
    pub fn conflict(name: impl Into<String>) -> Self {
        GitBumpError::PlatformConflict { name: name.into() }
    }

    /// Create a transport failure with its status and message
    pub fn transport(status: u16, msg: impl Into<String>) -> Self {
        GitBumpError::PlatformTransport {
            status,
            message: msg.into(),
        }
    }

    /// True for the fatal conditions raised before any publish call
    pub fn is_fatal_policy(&self) -> bool {
        matches!(
            self,
            GitBumpError::PolicyViolation(_) | GitBumpError::BumpComputation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitBumpError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitBumpError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_transport_error_carries_status() {
        let err = GitBumpError::transport(502, "bad gateway");
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("bad gateway"));
    }

    #[test]
    fn test_already_exists_names_tag_and_commit() {
        let err = GitBumpError::AlreadyExists {
            name: "v1.1.0".to_string(),
            target_sha: Some("c2c2c2c2".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("v1.1.0"));
        assert!(msg.contains("c2c2c2c2"));
        assert!(msg.contains("git show v1.1.0"));
    }

    #[test]
    fn test_already_exists_without_target() {
        let err = GitBumpError::AlreadyExists {
            name: "1.2.0-dev001".to_string(),
            target_sha: None,
        };
        assert!(err.to_string().contains("Release '1.2.0-dev001' already exists"));
    }

    #[test]
    fn test_fatal_policy_classification() {
        assert!(GitBumpError::policy("x").is_fatal_policy());
        assert!(GitBumpError::computation("x").is_fatal_policy());
        assert!(!GitBumpError::conflict("v1.0.0").is_fatal_policy());
        assert!(!GitBumpError::transport(500, "x").is_fatal_policy());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitBumpError::policy("x"), "Policy violation"),
            (GitBumpError::computation("x"), "Bump computation failed"),
            (GitBumpError::config("x"), "Configuration error"),
            (GitBumpError::version("x"), "Version parsing error"),
            (GitBumpError::transport(422, "x"), "Platform request failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
