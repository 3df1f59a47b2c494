//! Core building blocks shared by every feature-release command
//!
//! - **config**: release.toml parsing and validation
//! - **context**: release root + configuration, built once per invocation
//! - **error**: error categories, exit codes and help messages

pub mod config;
pub mod context;
pub mod error;
