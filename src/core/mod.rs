//! Core building blocks shared by every command
//!
//! - **config**: rail.toml parsing and validation
//! - **context**: Repository context built once per invocation
//! - **error**: Error types with contextual help messages and exit codes
//! - **vcs**: Git operations abstraction (`Vcs` trait, SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
