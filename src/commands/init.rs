//! `feature-release init`

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, ReleaseResult};
use std::path::Path;

/// Write a release.toml holding the built-in defaults
///
/// Refuses to replace an existing configuration unless `force` is set.
pub fn run_init(root: &Path, force: bool) -> ReleaseResult<()> {
  if let Some(existing) = ReleaseConfig::find_config_path(root)
    && !force
  {
    return Err(ReleaseError::with_help(
      format!("Configuration already exists: {}", existing.display()),
      "Re-run with --force to overwrite it.",
    ));
  }

  let path = ReleaseConfig::default().save(root)?;

  println!("📝 Wrote {}", path.display());
  println!();
  println!("Next steps:");
  println!("  1. Point each [[variants]] tool_home at a local host tool installation");
  println!("  2. Check the [feature] paths against your feature project");
  println!("  3. feature-release run --dry-run");

  Ok(())
}
