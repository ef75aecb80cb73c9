//! Programmatic entry point behind the `git-bump` binary

pub mod orchestration;

pub use orchestration::{run_pipeline, BumpMetadata, RunReport, RunRequest};
