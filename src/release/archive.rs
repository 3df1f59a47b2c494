//! Release archives
//!
//! A variant's release directory is zipped into `<output>/<label>.zip`, next
//! to the directory itself. Entry names are relative to the directory and use
//! forward slashes.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveStats {
  pub entries: usize,
  pub bytes: u64,
}

/// Zip the contents of `dir` into `archive_path`, replacing any existing archive
pub fn archive_directory(dir: &Path, archive_path: &Path) -> ReleaseResult<ArchiveStats> {
  if !dir.is_dir() {
    return Err(ReleaseError::message(format!(
      "Release directory not found: {}",
      dir.display()
    )));
  }
  if archive_path.starts_with(dir) {
    return Err(ReleaseError::message(format!(
      "Archive {} must not be written inside the directory being archived",
      archive_path.display()
    )));
  }

  let file = File::create(archive_path).with_context(|| format!("Failed to create {}", archive_path.display()))?;
  let mut zip = ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

  let mut stats = ArchiveStats::default();
  for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    let name = entry_name(entry.path().strip_prefix(dir)?);

    if entry.file_type().is_dir() {
      zip.add_directory(name, options)?;
    } else {
      let len = entry.metadata()?.len();
      zip.start_file(name, options.large_file(needs_zip64(len)))?;
      let mut source = File::open(entry.path()).with_context(|| format!("Failed to open {}", entry.path().display()))?;
      stats.bytes += io::copy(&mut source, &mut zip)
        .with_context(|| format!("Failed to add {} to archive", entry.path().display()))?;
    }
    stats.entries += 1;
  }

  zip.finish()?;
  tracing::debug!(archive = %archive_path.display(), entries = stats.entries, "wrote archive");
  Ok(stats)
}

/// Remove a previous archive, if any
pub fn remove_archive(archive_path: &Path) -> ReleaseResult<()> {
  match fs::remove_file(archive_path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(ReleaseError::from(e).context(format!("Failed to remove {}", archive_path.display()))),
  }
}

/// Entries at or above this size need ZIP64 headers
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

fn needs_zip64(len: u64) -> bool {
  len >= ZIP64_THRESHOLD
}

fn entry_name(relative: &Path) -> String {
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
