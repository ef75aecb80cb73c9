pub mod analyzer;
pub mod boundary;
pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod policy;
pub mod publish;
pub mod ui;

pub use error::{GitBumpError, Result};
