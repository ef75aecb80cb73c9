//! Analysis engine for determining version bumps from commits

pub mod tag_matcher;
pub mod version_analyzer;

pub use tag_matcher::{Anchor, MatchResult, TagCommitMatcher};
pub use version_analyzer::{BumpContext, ClassificationReport, VersionAnalyzer};
