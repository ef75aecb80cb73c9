use crate::domain::prerelease::{Prerelease, PrereleaseKind};
use crate::error::{GitBumpError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn version_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<prefix>.*?)",
            r"(?P<major>0|[1-9]\d*)\.(?P<minor>0|[1-9]\d*)\.(?P<patch>0|[1-9]\d*)",
            r"(?:-(?P<prerelease>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?",
            r"(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
        ))
        .ok()
    })
    .as_ref()
}

/// Version bump level derived from commits, ordered `None < Patch < Minor < Major`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpLevel::None => write!(f, "none"),
            BumpLevel::Patch => write!(f, "patch"),
            BumpLevel::Minor => write!(f, "minor"),
            BumpLevel::Major => write!(f, "major"),
        }
    }
}

/// A versioned identifier as found in tag and release names,
/// e.g. `v1.2.3`, `1.3.0-rc02`, `sdk-2.0.0-dev004.a1b2c3d4+build.7`.
///
/// Values are immutable: every bump produces a new instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionNumber {
    prefix: String,
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: String,
    build: String,
}

impl VersionNumber {
    /// Create a final version without prefix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        VersionNumber {
            prefix: String::new(),
            major,
            minor,
            patch,
            prerelease: String::new(),
            build: String::new(),
        }
    }

    /// Parse a tag or release name; `None` if it is not a versioned identifier
    pub fn parse(text: &str) -> Option<Self> {
        let captures = version_regex()?.captures(text.trim())?;
        let field = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };

        Some(VersionNumber {
            prefix: field("prefix"),
            major: field("major").parse().ok()?,
            minor: field("minor").parse().ok()?,
            patch: field("patch").parse().ok()?,
            prerelease: field("prerelease"),
            build: field("build"),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Prerelease field; empty for a final release
    pub fn prerelease(&self) -> &str {
        &self.prerelease
    }

    /// Build metadata; empty when absent
    pub fn build(&self) -> &str {
        &self.build
    }

    /// Copy with a different prefix
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        VersionNumber {
            prefix: prefix.into(),
            ..self.clone()
        }
    }

    /// Copy with a different prerelease field
    pub fn with_prerelease(&self, prerelease: impl Into<String>) -> Self {
        VersionNumber {
            prerelease: prerelease.into(),
            ..self.clone()
        }
    }

    /// Copy with different build metadata
    pub fn with_build(&self, build: impl Into<String>) -> Self {
        VersionNumber {
            build: build.into(),
            ..self.clone()
        }
    }

    /// Same `major.minor.patch` without prerelease and build
    pub fn finalized(&self) -> Self {
        self.with_prerelease("").with_build("")
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Structured view of the prerelease field
    pub fn prerelease_info(&self) -> Option<Prerelease> {
        Prerelease::parse(&self.prerelease)
    }

    /// Kind of the prerelease field; `None` for final releases
    pub fn prerelease_kind(&self) -> Option<PrereleaseKind> {
        self.prerelease_info().map(|p| p.kind())
    }

    pub fn is_release_candidate(&self) -> bool {
        self.prerelease_kind() == Some(PrereleaseKind::Rc)
    }

    pub fn is_dev(&self) -> bool {
        self.prerelease_kind() == Some(PrereleaseKind::Dev)
    }

    /// Precedence comparison; prefix and build metadata do not participate.
    ///
    /// `major.minor.patch` is compared numerically first, then a final release
    /// ranks above `rc`, which ranks above `dev`, which ranks above any other
    /// prerelease kind; equal kinds compare by their numeric suffix.
    pub fn compare(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.prerelease_info(), other.prerelease_info()) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(own), Some(theirs)) => own.precedence(&theirs),
            })
    }

    pub fn next_major(&self) -> Result<Self> {
        Ok(VersionNumber {
            major: self.incremented(self.major, "major")?,
            minor: 0,
            patch: 0,
            ..self.finalized()
        })
    }

    pub fn next_minor(&self) -> Result<Self> {
        Ok(VersionNumber {
            minor: self.incremented(self.minor, "minor")?,
            patch: 0,
            ..self.finalized()
        })
    }

    pub fn next_patch(&self) -> Result<Self> {
        Ok(VersionNumber {
            patch: self.incremented(self.patch, "patch")?,
            ..self.finalized()
        })
    }

    fn incremented(&self, component: u64, label: &str) -> Result<u64> {
        component.checked_add(1).ok_or_else(|| {
            GitBumpError::computation(format!(
                "{} version of '{}' cannot be incremented",
                label, self
            ))
        })
    }

    /// Increment the numeric suffix of the prerelease field, zero-padding the
    /// number to at least `pad_width` digits. Build metadata and anything
    /// following the number are dropped.
    ///
    /// Returns `None` if there is no prerelease or it has no numeric suffix.
    pub fn next_prerelease(&self, pad_width: Option<usize>) -> Option<Self> {
        let next = self.prerelease_info()?.increment(pad_width)?;
        Some(self.with_prerelease(next.to_string()).with_build(""))
    }

    /// Apply a bump level, honouring initial development (`0.y.z`).
    ///
    /// While `initial_development` holds, a MAJOR bump of a `0.y.z` version is
    /// capped to MINOR. Once it no longer holds, any bump of a `0.y.z` version
    /// promotes it to `1.0.0`. Returns the new version together with the level
    /// that was actually applied, or `None` for [`BumpLevel::None`].
    pub fn bump(
        &self,
        level: BumpLevel,
        initial_development: bool,
    ) -> Result<Option<(Self, BumpLevel)>> {
        let applied = match level {
            BumpLevel::None => return Ok(None),
            _ if self.major == 0 && !initial_development => BumpLevel::Major,
            BumpLevel::Major if self.major == 0 => BumpLevel::Minor,
            other => other,
        };

        let next = match applied {
            BumpLevel::Major => self.next_major()?,
            BumpLevel::Minor => self.next_minor()?,
            BumpLevel::Patch => self.next_patch()?,
            BumpLevel::None => return Ok(None),
        };

        Ok(Some((next, applied)))
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}.{}.{}",
            self.prefix, self.major, self.minor, self.patch
        )?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for VersionNumber {
    type Err = GitBumpError;

    fn from_str(s: &str) -> Result<Self> {
        VersionNumber::parse(s).ok_or_else(|| {
            GitBumpError::version(format!("'{}' is not a versioned identifier", s))
        })
    }
}

impl Serialize for VersionNumber {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> VersionNumber {
        VersionNumber::parse(text).unwrap()
    }

    #[test]
    fn test_parse_with_prefix() {
        let version = v("v1.2.3");
        assert_eq!(version.prefix(), "v");
        assert_eq!(
            (version.major(), version.minor(), version.patch()),
            (1, 2, 3)
        );
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_multi_digit_major_after_prefix() {
        let version = v("v11.0.4");
        assert_eq!(version.prefix(), "v");
        assert_eq!(version.major(), 11);
    }

    #[test]
    fn test_parse_full() {
        let version = v("sdk-2.0.0-dev004.a1b2c3d4+build.7");
        assert_eq!(version.prefix(), "sdk-");
        assert_eq!(version.prerelease(), "dev004.a1b2c3d4");
        assert_eq!(version.build(), "build.7");
        assert!(version.is_dev());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(VersionNumber::parse("1.2").is_none());
        assert!(VersionNumber::parse("release").is_none());
        assert!(VersionNumber::parse("v1.2.3-").is_none());
    }

    #[test]
    fn test_format_round_trip() {
        for text in [
            "1.0.0",
            "v0.3.1",
            "internal-2.0.0",
            "1.2.0-rc03",
            "v3.1.4-dev012.0a1b2c3d+meta",
        ] {
            assert_eq!(v(text).to_string(), text);
            assert_eq!(VersionNumber::parse(&v(text).to_string()), Some(v(text)));
        }
    }

    #[test]
    fn test_from_str_error() {
        let err = "not-a-version".parse::<VersionNumber>().unwrap_err();
        assert!(err.to_string().contains("not-a-version"));
    }

    #[test]
    fn test_compare_numeric_not_lexicographic() {
        assert_eq!(v("2.0.0-rc9").compare(&v("2.0.0-rc10")), Ordering::Less);
        assert_eq!(v("1.10.0").compare(&v("1.9.0")), Ordering::Greater);
    }

    #[test]
    fn test_compare_final_over_rc_over_dev() {
        assert_eq!(v("1.2.0").compare(&v("1.2.0-rc01")), Ordering::Greater);
        assert_eq!(v("1.2.0-rc01").compare(&v("1.2.0-dev999")), Ordering::Greater);
        assert_eq!(v("1.2.0-dev001").compare(&v("1.2.0-alpha9")), Ordering::Greater);
        assert_eq!(v("1.2.0-rc01").compare(&v("1.1.9")), Ordering::Greater);
    }

    #[test]
    fn test_compare_ignores_prefix_and_build() {
        assert_eq!(v("v1.2.3+a").compare(&v("1.2.3+b")), Ordering::Equal);
    }

    #[test]
    fn test_bump_none_is_absent() {
        assert!(v("1.2.3").bump(BumpLevel::None, false).unwrap().is_none());
        assert!(v("0.1.0").bump(BumpLevel::None, true).unwrap().is_none());
    }

    #[test]
    fn test_bump_levels() {
        let base = v("v1.2.3");
        let next = |level| base.bump(level, false).unwrap().unwrap().0;
        assert_eq!(next(BumpLevel::Major), v("v2.0.0"));
        assert_eq!(next(BumpLevel::Minor), v("v1.3.0"));
        assert_eq!(next(BumpLevel::Patch), v("v1.2.4"));
    }

    #[test]
    fn test_bump_initial_development_caps_major() {
        let (next, applied) = v("0.3.1").bump(BumpLevel::Major, true).unwrap().unwrap();
        assert_eq!(next, v("0.4.0"));
        assert_eq!(applied, BumpLevel::Minor);
    }

    #[test]
    fn test_bump_leaving_initial_development_promotes() {
        for level in [BumpLevel::Patch, BumpLevel::Minor, BumpLevel::Major] {
            let (next, applied) = v("0.3.1").bump(level, false).unwrap().unwrap();
            assert_eq!(next, v("1.0.0"));
            assert_eq!(applied, BumpLevel::Major);
        }
    }

    #[test]
    fn test_bump_clears_prerelease_and_build() {
        let (next, _) = v("1.2.0-rc02+abc")
            .bump(BumpLevel::Patch, false)
            .unwrap()
            .unwrap();
        assert_eq!(next.to_string(), "1.2.1");
    }

    #[test]
    fn test_bump_at_component_limit_is_error() {
        let max = u64::MAX;
        let top_major = v(&format!("{}.0.0", max));
        assert!(matches!(
            top_major.bump(BumpLevel::Major, false),
            Err(GitBumpError::BumpComputation(_))
        ));
        assert!(top_major.next_major().is_err());

        let top_minor = v(&format!("1.{}.0", max));
        assert!(top_minor.next_minor().is_err());
        assert_eq!(top_minor.next_major().unwrap().to_string(), "2.0.0");

        let top_patch = v(&format!("1.2.{}", max));
        let err = top_patch.bump(BumpLevel::Patch, false).unwrap_err();
        assert!(err.to_string().contains("patch"));
    }

    #[test]
    fn test_next_prerelease() {
        assert_eq!(
            v("1.2.0-rc1+meta").next_prerelease(Some(2)),
            Some(v("1.2.0-rc02"))
        );
        assert_eq!(
            v("1.2.0-dev007.abcdef12").next_prerelease(Some(3)),
            Some(v("1.2.0-dev008"))
        );
        assert!(v("1.2.0-beta").next_prerelease(None).is_none());
        assert!(v("1.2.0").next_prerelease(None).is_none());
    }

    #[test]
    fn test_bump_level_ordering() {
        assert!(BumpLevel::Major > BumpLevel::Minor);
        assert!(BumpLevel::Minor > BumpLevel::Patch);
        assert!(BumpLevel::Patch > BumpLevel::None);
    }
}
