//! Release context - build once, pass everywhere
//!
//! `main.rs` resolves the release root and configuration a single time and
//! hands `&ReleaseContext` to the command that runs.

use crate::core::config::ReleaseConfig;
use crate::core::error::ReleaseResult;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Release root plus the configuration that applies to it.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
  /// Directory every relative path in the configuration is resolved against
  pub root: PathBuf,

  /// Loaded (or default) configuration
  pub config: Arc<ReleaseConfig>,

  /// File the configuration came from, if any
  pub config_path: Option<PathBuf>,
}

impl ReleaseContext {
  /// Build the context for `root`.
  ///
  /// An explicit `--config` path must exist. Otherwise the usual search
  /// locations are tried and built-in defaults apply when none is present.
  pub fn build(root: &Path, explicit_config: Option<&Path>) -> ReleaseResult<Self> {
    let root = root.to_path_buf();
    let (config, config_path) = match explicit_config {
      Some(path) => {
        let path = if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
        (ReleaseConfig::load_from(&path)?, Some(path))
      }
      None => (ReleaseConfig::load(&root)?, ReleaseConfig::find_config_path(&root)),
    };

    Ok(Self {
      root,
      config: Arc::new(config),
      config_path,
    })
  }

  /// Wrap an already-built configuration
  pub fn with_config(root: &Path, config: ReleaseConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      config: Arc::new(config),
      config_path: None,
    }
  }

  /// Resolve a configured path against the release root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { self.root.join(path) }
  }

  /// Absolute release output root
  pub fn output_dir(&self) -> PathBuf {
    self.resolve(&self.config.output.dir)
  }
}
