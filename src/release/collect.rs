//! Build artifact collection
//!
//! Copies a variant's build output tree into its release directory.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Summary of a collected tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectStats {
  pub files: usize,
  pub bytes: u64,
}

/// Recursively copy `source` to `dest`
///
/// `source` must be an existing directory and `dest` must not exist yet.
/// Symbolic links in `source` are copied as the files and directories they
/// point to.
pub fn collect_artifacts(source: &Path, dest: &Path) -> ReleaseResult<CollectStats> {
  if !source.is_dir() {
    return Err(ReleaseError::with_help(
      format!("Build output directory not found: {}", source.display()),
      "The feature build did not produce any output for this variant.",
    ));
  }
  if dest.exists() {
    return Err(ReleaseError::with_help(
      format!("Release directory already exists: {}", dest.display()),
      "Remove it or re-run with --clean.",
    ));
  }

  let mut stats = CollectStats::default();
  // Symlinks are resolved so the release holds real files
  for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
    let entry = entry?;
    let relative = entry.path().strip_prefix(source)?;
    let target = dest.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).with_context(|| format!("Failed to create {}", target.display()))?;
    } else {
      let bytes = fs::copy(entry.path(), &target).with_context(|| {
        format!(
          "Failed to copy {} to {}",
          entry.path().display(),
          target.display()
        )
      })?;
      stats.files += 1;
      stats.bytes += bytes;
    }
  }

  tracing::debug!(from = %source.display(), to = %dest.display(), files = stats.files, "collected artifacts");
  Ok(stats)
}
