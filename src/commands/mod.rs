//! CLI commands for feature-release
//!
//! - **run**: the full release pipeline (default command)
//! - **version**: print the feature version from the descriptor
//! - **init**: write a release.toml with the built-in defaults
//!
//! Commands that work on a release take `&ReleaseContext`.

pub mod init;
pub mod run;
pub mod version;

pub use init::run_init;
pub use run::run_release;
pub use version::run_version;
