//! `feature-release init`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_writes_defaults() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_feature_release(&ws.path, &["init"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let config = ws.read("release.toml")?;
  assert!(config.contains("CapellaFeature5x"));
  assert!(config.contains("CapellaFeature6x"));
  assert!(config.contains("Releases"));

  Ok(())
}

#[test]
fn test_init_refuses_existing_config() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::write(ws.path.join("release.toml"), "[output]\ndir = \"out\"\n")?;

  let output = run_feature_release(&ws.path, &["init"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--force"));
  assert!(ws.read("release.toml")?.contains("out"));

  let forced = run_feature_release(&ws.path, &["init", "--force"])?;
  assert!(forced.status.success(), "stderr: {}", stderr(&forced));
  assert!(ws.read("release.toml")?.contains("CapellaFeature6x"));

  Ok(())
}

#[test]
fn test_init_config_drives_dry_run() -> Result<()> {
  let ws = TestWorkspace::new()?;
  run_feature_release(&ws.path, &["init"])?;

  let output = run_feature_release(&ws.path, &["run", "--dry-run"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  let out = stdout(&output);
  assert!(out.contains("CapellaFeature5x"));
  assert!(out.contains("org.eclipse.ant.core.antRunner"));

  Ok(())
}

#[test]
fn test_init_ignores_missing_explicit_config() -> Result<()> {
  let ws = TestWorkspace::new()?;

  // init creates configuration, so it never loads one first
  let output = run_feature_release(&ws.path, &["--config", "missing.toml", "init"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(ws.path.join("release.toml").is_file());

  Ok(())
}
