use crate::classify::RuleConfig;
use crate::domain::{BranchContext, PrefixFilter};
use crate::error::{GitBumpError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

const LOCAL_CONFIG: &str = "./gitbump.toml";
const USER_CONFIG: &str = ".gitbump.toml";

/// Versioning scheme a run follows
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersionScheme {
    #[default]
    SemVer,
    SdkVer,
}

impl fmt::Display for VersionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionScheme::SemVer => write!(f, "semver"),
            VersionScheme::SdkVer => write!(f, "sdkver"),
        }
    }
}

fn default_tag_prefix() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

fn default_release_branches() -> String {
    "^release/.*".to_string()
}

fn default_allowed_branches() -> String {
    ".*".to_string()
}

/// Represents the complete configuration for git-bump.
///
/// Immutable once loaded; rule sets for other contexts are derived from `rules`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub version_scheme: VersionScheme,

    /// Version prefix tags and releases must carry, `*` for any
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Treat `0.y.z` as initial development, capping breaking changes to MINOR
    #[serde(default = "default_true")]
    pub initial_development: bool,

    /// Regex for branches that only take patch releases
    #[serde(default = "default_release_branches")]
    pub release_branches: String,

    /// Regex for branches that may publish
    #[serde(default = "default_allowed_branches")]
    pub allowed_branches: String,

    /// Prerelease word for SemVer draft prereleases (e.g. `dev`)
    #[serde(default)]
    pub prerelease_prefix: Option<String>,

    #[serde(default)]
    pub sdkver_max_major: Option<u64>,

    /// Branch-name prefix for release branches created after a SdkVer release
    #[serde(default)]
    pub sdkver_create_release_branches: Option<String>,

    #[serde(default)]
    pub rules: RuleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version_scheme: VersionScheme::default(),
            tag_prefix: default_tag_prefix(),
            initial_development: true,
            release_branches: default_release_branches(),
            allowed_branches: default_allowed_branches(),
            prerelease_prefix: None,
            sdkver_max_major: None,
            sdkver_create_release_branches: None,
            rules: RuleConfig::default(),
        }
    }
}

impl Config {
    /// Check every value that can be wrong independently of the repository
    pub fn validate(&self) -> Result<()> {
        self.release_pattern()?;
        self.allowed_pattern()?;

        if self.tag_prefix.chars().any(|c| c.is_ascii_digit()) {
            return Err(GitBumpError::config(format!(
                "tag_prefix '{}' must not contain digits",
                self.tag_prefix
            )));
        }

        if let Some(prefix) = &self.prerelease_prefix {
            if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(GitBumpError::config(format!(
                    "prerelease_prefix '{}' must be a non-empty alphabetic word",
                    prefix
                )));
            }
        }

        if self.rules.allowed_types.is_empty() {
            return Err(GitBumpError::config("rules.allowed_types must not be empty"));
        }

        Ok(())
    }

    pub fn release_pattern(&self) -> Result<Regex> {
        compile("release_branches", &self.release_branches)
    }

    pub fn allowed_pattern(&self) -> Result<Regex> {
        compile("allowed_branches", &self.allowed_branches)
    }

    pub fn prefix_filter(&self) -> PrefixFilter {
        PrefixFilter::new(self.tag_prefix.clone())
    }

    /// Branch context for `name` under the configured patterns
    pub fn branch_context(&self, name: &str) -> Result<BranchContext> {
        Ok(BranchContext::new(
            name,
            &self.release_pattern()?,
            &self.allowed_pattern()?,
        ))
    }

    /// Max-major ceiling, with 0 meaning none
    pub fn max_major(&self) -> Option<u64> {
        self.sdkver_max_major.filter(|m| *m > 0)
    }
}

fn compile(field: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| GitBumpError::config(format!("{} is not a valid regex: {}", field, e)))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitbump.toml` in current directory
/// 3. `.gitbump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG).exists() {
        fs::read_to_string(LOCAL_CONFIG)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| GitBumpError::config(e.to_string()))
}
