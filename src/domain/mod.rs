//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use commit::{short_sha, Classification, ClassifiedCommit, IgnoreReason, Violation};
pub use prerelease::{Prerelease, PrereleaseKind};
pub use tag::{PrefixFilter, Release, Tag};
pub use version::{BumpLevel, VersionNumber};
