//! External feature build
//!
//! Each variant is built by launching the host tool's Eclipse executable with
//! the Ant runner application. The call blocks until the tool exits; there is
//! no timeout.

use crate::core::config::VariantConfig;
use crate::core::error::{BuildError, ReleaseError, ReleaseResult, ResultExt};
use crate::ui::console::Console;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Eclipse application that runs Ant build files headlessly
pub const ANT_RUNNER_APPLICATION: &str = "org.eclipse.ant.core.antRunner";

/// Values shared by every variant's build
#[derive(Debug, Clone)]
pub struct BuildParams {
  pub feature_id: String,
  pub version: String,
  pub build_file: PathBuf,
  pub base_location: PathBuf,
  pub working_dir: PathBuf,
}

/// A fully resolved build command for one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
  pub variant: String,
  pub program: PathBuf,
  pub args: Vec<String>,
  pub working_dir: PathBuf,
  pub destination: PathBuf,
}

impl BuildInvocation {
  /// Assemble the build command for `variant`, writing into `destination`
  pub fn new(variant: &VariantConfig, params: &BuildParams, destination: &Path) -> Self {
    let args = vec![
      "-nosplash".to_string(),
      "-application".to_string(),
      ANT_RUNNER_APPLICATION.to_string(),
      "-buildfile".to_string(),
      params.build_file.display().to_string(),
      format!("-DbaseLocation={}", params.base_location.display()),
      format!("-Ddestination={}", destination.display()),
      format!("-DfeatureId={}", params.feature_id),
      format!("-DfeatureVersion={}", params.version),
      format!("-DarchiveFileName={}", archive_file_name(&params.feature_id, &variant.label, &params.version)),
      "-DzipSuffix=true".to_string(),
    ];

    Self {
      variant: variant.label.clone(),
      program: variant.program(),
      args,
      working_dir: params.working_dir.clone(),
      destination: destination.to_path_buf(),
    }
  }

  /// Shell-like rendering for logs and dry runs
  pub fn command_line(&self) -> String {
    std::iter::once(self.program.display().to_string())
      .chain(self.args.iter().cloned())
      .map(|part| if part.contains(' ') { format!("\"{}\"", part) } else { part })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Archive name the build tool is asked to produce
pub fn archive_file_name(feature_id: &str, label: &str, version: &str) -> String {
  format!("{}.{}.{}.zip", feature_id, label, version)
}

/// What the external build reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
  pub succeeded: bool,
  /// `None` when the process was terminated by a signal
  pub exit_code: Option<i32>,
  #[serde(skip)]
  pub stdout: String,
  #[serde(skip)]
  pub stderr: String,
}

impl BuildOutcome {
  /// Turn a failed outcome into a build error for `variant`
  pub fn check(&self, variant: &str) -> ReleaseResult<()> {
    if self.succeeded {
      Ok(())
    } else {
      Err(ReleaseError::Build(BuildError::Failed {
        variant: variant.to_string(),
        exit_code: self.exit_code,
      }))
    }
  }
}

/// Runs a build invocation to completion
pub trait BuildRunner {
  fn run(&self, invocation: &BuildInvocation) -> ReleaseResult<BuildOutcome>;
}

/// Spawns the real host tool
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBuildRunner;

impl BuildRunner for SystemBuildRunner {
  fn run(&self, invocation: &BuildInvocation) -> ReleaseResult<BuildOutcome> {
    tracing::debug!(command = %invocation.command_line(), cwd = %invocation.working_dir.display(), "spawning feature build");

    let output = Command::new(&invocation.program)
      .args(&invocation.args)
      .current_dir(&invocation.working_dir)
      .output()
      .map_err(|e| {
        ReleaseError::Build(BuildError::ToolNotFound {
          program: invocation.program.clone(),
          reason: e.to_string(),
        })
      })?;

    let outcome = BuildOutcome {
      succeeded: output.status.success(),
      exit_code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    tracing::debug!(variant = %invocation.variant, exit_code = ?outcome.exit_code, "feature build finished");

    Ok(outcome)
  }
}

/// Remove whatever a previous build left in `destination`
///
/// The directory belongs to the build tool; only output of the current build
/// may reach the release directory.
pub fn clear_build_output(destination: &Path) -> ReleaseResult<()> {
  if destination.exists() {
    tracing::debug!(dir = %destination.display(), "removing previous build output");
    fs::remove_dir_all(destination).with_context(|| format!("Failed to remove {}", destination.display()))?;
  }
  Ok(())
}

/// Print the captured streams, whatever the exit status
pub fn print_outcome(console: &Console, outcome: &BuildOutcome) {
  console.line("Feature build completed.");
  console.line("=== Feature Build Output ===");
  console.line(outcome.stdout.trim_end());
  console.line("=== Feature Build Error ===");
  console.line(outcome.stderr.trim_end());
}
