//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const FEATURE_DIR: &str = "DEHCapellaAdapterFeature";
pub const VERSION: &str = "2.3.1";

/// Stand-in for the host tool: parses the Ant properties it is given and
/// drops a jar plus a nested plugin file into `-Ddestination`
const FAKE_TOOL: &str = r#"#!/bin/sh
dest=""
ver=""
for arg in "$@"; do
  case "$arg" in
    -Ddestination=*) dest="${arg#-Ddestination=}" ;;
    -DfeatureVersion=*) ver="${arg#-DfeatureVersion=}" ;;
  esac
done
echo "BUILD SUCCESSFUL"
mkdir -p "$dest/plugins"
printf 'jar %s' "$ver" > "$dest/DEHCapellaAdapter_$ver.jar"
printf 'plugin' > "$dest/plugins/plugin.txt"
"#;

const FAILING_TOOL: &str = r#"#!/bin/sh
echo "BUILD FAILED" >&2
exit 1
"#;

/// A release root holding a feature project and fake host tools
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a workspace with a feature descriptor and build template
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    let feature = path.join(FEATURE_DIR);
    std::fs::create_dir_all(&feature)?;
    std::fs::write(
      feature.join("feature.xml"),
      format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feature id="{}" label="DEH Capella Adapter" version="{}" provider-name="RHEA">
  <plugin id="DEHCapellaAdapter" version="0.0.0"/>
</feature>
"#,
        FEATURE_DIR, VERSION
      ),
    )?;
    std::fs::write(
      feature.join("build.xml.template"),
      r#"<project name="{feature_id}" default="build.update.jar">
  <property name="feature.version" value="{version}"/>
  <property name="base" value="${baseLocation}"/>
</project>
"#,
    )?;

    Ok(Self { _root: root, path })
  }

  /// Install a fake host tool; returns its home directory
  pub fn add_tool(&self, name: &str, fails: bool) -> Result<PathBuf> {
    let home = self.path.join("tools").join(name);
    std::fs::create_dir_all(&home)?;
    let program = home.join("eclipse");
    std::fs::write(&program, if fails { FAILING_TOOL } else { FAKE_TOOL })?;
    make_executable(&program)?;
    Ok(home)
  }

  /// Write release.toml with one `[[variants]]` entry per (label, tool_home)
  pub fn write_config(&self, variants: &[(&str, &Path)]) -> Result<()> {
    let mut config = String::from("[readme]\nproduct = \"Capella DST Adapter\"\n");
    for (label, home) in variants {
      config.push_str(&format!(
        "\n[[variants]]\nlabel = \"{}\"\ntool_home = '{}'\n",
        label,
        home.display()
      ));
    }
    std::fs::write(self.path.join("release.toml"), config)?;
    Ok(())
  }

  /// Release directory for a variant
  pub fn release_dir(&self, label: &str) -> PathBuf {
    self.path.join("Releases").join(label)
  }

  pub fn archive(&self, label: &str) -> PathBuf {
    self.path.join("Releases").join(format!("{}.zip", label))
  }

  pub fn read(&self, rel: impl AsRef<Path>) -> Result<String> {
    let path = self.path.join(rel);
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
  }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;
  let mut perms = std::fs::metadata(path)?.permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(path, perms)?;
  Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
  Ok(())
}

/// Run feature-release in `cwd`
pub fn run_feature_release(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_feature-release");
  let output = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run feature-release")?;
  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Entry names inside a zip archive
pub fn zip_entries(path: &Path) -> Result<Vec<String>> {
  let file = std::fs::File::open(path)?;
  let archive = zip::ZipArchive::new(file)?;
  Ok(archive.file_names().map(|n| n.to_string()).collect())
}
