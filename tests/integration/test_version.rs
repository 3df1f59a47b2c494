//! `feature-release version`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_version_prints_descriptor_version() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_feature_release(&ws.path, &["version"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(stdout(&output).trim(), VERSION);

  Ok(())
}

#[test]
fn test_version_json() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_feature_release(&ws.path, &["version", "--json"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let value: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(value["version"], VERSION);
  assert_eq!(value["feature"], FEATURE_DIR);

  Ok(())
}

#[test]
fn test_version_falls_back_when_attribute_missing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  std::fs::write(
    ws.path.join(FEATURE_DIR).join("feature.xml"),
    r#"<feature id="DEHCapellaAdapterFeature"/>"#,
  )?;

  let output = run_feature_release(&ws.path, &["version"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert_eq!(stdout(&output).trim(), "1.0.0");

  Ok(())
}

#[test]
fn test_explicit_config_must_exist() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_feature_release(&ws.path, &["--config", "missing.toml", "version"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("missing.toml"));

  Ok(())
}
