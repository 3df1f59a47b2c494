//! Artifact checksums
//!
//! The checksum line has `sha256sum` layout (`<hex>  <path>`) whichever
//! method produced it, so READMEs look the same either way.

use crate::core::config::{HashConfig, HashMethod};
use crate::core::error::{BuildError, ReleaseError, ReleaseResult, ResultExt, ValidationError};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolve `pattern` under `dir` to exactly one file
pub fn resolve_artifact(dir: &Path, pattern: &str) -> ReleaseResult<PathBuf> {
  // Only `pattern` is a glob; the directory is matched literally
  let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
  let full_pattern = Path::new(&escaped_dir).join(pattern);
  let full_pattern = full_pattern.to_string_lossy();

  let mut matches = Vec::new();
  for entry in glob::glob(&full_pattern)? {
    let path = entry.map_err(|e| ReleaseError::message(format!("Failed to read {}: {}", e.path().display(), e)))?;
    if path.is_file() {
      matches.push(path);
    }
  }

  if matches.len() != 1 {
    return Err(ReleaseError::Validation(ValidationError::ArtifactMatch {
      pattern: pattern.to_string(),
      matches,
    }));
  }

  Ok(matches.remove(0))
}

/// SHA-256 of a file as lowercase hex
pub fn sha256_file(path: &Path) -> ReleaseResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let mut hasher = Sha256::new();
  let mut buf = [0u8; 64 * 1024];
  loop {
    let n = match file.read(&mut buf) {
      Ok(0) => break,
      Ok(n) => n,
      Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
      Err(e) => return Err(ReleaseError::from(e).context(format!("Failed to read {}", path.display()))),
    };
    hasher.update(&buf[..n]);
  }
  Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the checksum line for the artifact matching `config.pattern` in `release_dir`
///
/// `root` is the directory the external utility runs in; paths in the
/// checksum line are shown relative to it.
pub fn compute_hash(root: &Path, release_dir: &Path, config: &HashConfig) -> ReleaseResult<String> {
  let artifact = resolve_artifact(release_dir, &config.pattern)?;
  let shown = display_path(root, &artifact);

  match config.method {
    HashMethod::Builtin => {
      let digest = sha256_file(&artifact)?;
      Ok(format!("{}  {}", digest, shown))
    }
    HashMethod::Command => {
      let program = config.command.as_deref().unwrap_or("sha256sum");
      run_hash_command(root, program, &shown)
    }
  }
}

fn run_hash_command(root: &Path, program: &str, artifact: &str) -> ReleaseResult<String> {
  tracing::debug!(program, artifact, "running hash utility");
  let output = Command::new(program)
    .arg(artifact)
    .current_dir(root)
    .output()
    .map_err(|e| {
      ReleaseError::Build(BuildError::ToolNotFound {
        program: PathBuf::from(program),
        reason: e.to_string(),
      })
    })?;

  if !output.status.success() {
    return Err(ReleaseError::Build(BuildError::HashCommandFailed {
      command: format!("{} {}", program, artifact),
      stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
    }));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Path relative to `root` with forward slashes, or the full path when outside it
fn display_path(root: &Path, path: &Path) -> String {
  match path.strip_prefix(root) {
    Ok(rel) => rel
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/"),
    Err(_) => path.display().to_string(),
  }
}
