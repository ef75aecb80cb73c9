//! Bump policies turning a [BumpContext](crate::analyzer::BumpContext) into the next version
//!
//! - [SemVerPolicy]: plain semantic versioning driven by the required bump level
//! - [SdkVerPolicy]: SDK versioning with release candidates, dev builds and release branches
//! - [DraftReconciler]: continues prerelease chains from draft releases

pub mod draft;
pub mod sdkver;
pub mod semver;

pub use draft::{DraftCandidate, DraftReconciler};
pub use sdkver::{SdkVerBump, SdkVerPolicy};
pub use semver::SemVerPolicy;

use crate::boundary::BoundaryWarning;
use crate::domain::{BumpLevel, VersionNumber};
use serde::Serialize;
use std::fmt;

/// The kind of version change a run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    Rel,
    Rc,
    Dev,
}

impl BumpKind {
    /// Kind matching an applied SemVer bump level
    pub fn from_level(level: BumpLevel) -> Option<Self> {
        match level {
            BumpLevel::None => None,
            BumpLevel::Patch => Some(BumpKind::Patch),
            BumpLevel::Minor => Some(BumpKind::Minor),
            BumpLevel::Major => Some(BumpKind::Major),
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::Rel => "rel",
            BumpKind::Rc => "rc",
            BumpKind::Dev => "dev",
        };
        write!(f, "{}", name)
    }
}

/// A computed version change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BumpResult {
    pub from: VersionNumber,
    pub to: VersionNumber,
    pub kind: BumpKind,
}

/// What a policy decided, with the non-fatal conditions it ran into
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyOutcome {
    pub bump: Option<BumpResult>,
    pub warnings: Vec<BoundaryWarning>,
}

impl PolicyOutcome {
    fn unchanged(warnings: Vec<BoundaryWarning>) -> Self {
        PolicyOutcome {
            bump: None,
            warnings,
        }
    }
}
