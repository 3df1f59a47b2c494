//! End-to-end runs against fake host tools
#![cfg(unix)]

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_release_every_variant() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let v5 = ws.add_tool("capella5", false)?;
  let v6 = ws.add_tool("capella6", false)?;
  ws.write_config(&[("CapellaFeature5x", &v5), ("CapellaFeature6x", &v6)])?;

  let output = run_feature_release(&ws.path, &["run", "--date", "2024-05-01"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.contains("Version: 2.3.1"));
  assert!(out.contains("BUILD SUCCESSFUL"));
  assert!(out.contains("[2.3.1] build completed"));

  let build_xml = ws.read(format!("{}/build.xml", FEATURE_DIR))?;
  assert!(build_xml.contains(r#"value="2.3.1""#));
  assert!(build_xml.contains(r#"<project name="DEHCapellaAdapterFeature""#));
  assert!(build_xml.contains("${baseLocation}"));

  for label in ["CapellaFeature5x", "CapellaFeature6x"] {
    let release = ws.release_dir(label);
    assert!(release.join("DEHCapellaAdapter_2.3.1.jar").is_file());
    assert!(release.join("plugins/plugin.txt").is_file());

    let readme = std::fs::read_to_string(release.join("README.md"))?;
    assert!(readme.contains("Version: 2.3.1"));
    assert!(readme.contains("Date: 2024-05-01"));

    let hash_line = readme
      .lines()
      .find(|l| l.starts_with("SHA256: "))
      .expect("README has a checksum line");
    let (digest, path) = hash_line["SHA256: ".len()..]
      .split_once("  ")
      .expect("sha256sum format");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(path, format!("Releases/{}/DEHCapellaAdapter_2.3.1.jar", label));

    let entries = zip_entries(&ws.archive(label))?;
    assert!(entries.iter().any(|e| e == "README.md"));
    assert!(entries.iter().any(|e| e == "DEHCapellaAdapter_2.3.1.jar"));
    assert!(entries.iter().any(|e| e == "plugins/plugin.txt"));
  }

  Ok(())
}

#[test]
fn test_run_is_the_default_command() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;

  let output = run_feature_release(&ws.path, &[])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(ws.archive("Only").is_file());

  Ok(())
}

#[test]
fn test_failed_build_aborts_only_that_variant() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let broken = ws.add_tool("broken", true)?;
  let good = ws.add_tool("good", false)?;
  ws.write_config(&[("Broken", &broken), ("Good", &good)])?;

  let output = run_feature_release(&ws.path, &["run"])?;
  assert_eq!(output.status.code(), Some(3));

  let out = stdout(&output);
  assert!(out.contains("BUILD FAILED"));
  assert!(out.contains("Failed at: build"));
  assert!(stderr(&output).contains("Broken"));

  assert!(!ws.release_dir("Broken").exists());
  assert!(!ws.archive("Broken").exists());
  assert!(ws.archive("Good").is_file());

  Ok(())
}

#[test]
fn test_missing_tool_is_reported_per_variant() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let absent = ws.path.join("tools").join("not-installed");
  let good = ws.add_tool("good", false)?;
  ws.write_config(&[("Absent", &absent), ("Good", &good)])?;

  let output = run_feature_release(&ws.path, &["run"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(ws.archive("Good").is_file());
  assert!(!ws.release_dir("Absent").exists());

  Ok(())
}

#[test]
fn test_rerun_requires_clean() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;

  let first = run_feature_release(&ws.path, &["run"])?;
  assert!(first.status.success(), "stderr: {}", stderr(&first));

  let second = run_feature_release(&ws.path, &["run"])?;
  assert_eq!(second.status.code(), Some(3));
  assert!(stdout(&second).contains("Failed at: collect"));

  let cleaned = run_feature_release(&ws.path, &["run", "--clean"])?;
  assert!(cleaned.status.success(), "stderr: {}", stderr(&cleaned));
  assert!(ws.archive("Only").is_file());

  Ok(())
}

#[test]
fn test_variant_filter() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let v5 = ws.add_tool("capella5", false)?;
  let v6 = ws.add_tool("capella6", false)?;
  ws.write_config(&[("CapellaFeature5x", &v5), ("CapellaFeature6x", &v6)])?;

  let output = run_feature_release(&ws.path, &["run", "--variant", "CapellaFeature6x"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(ws.archive("CapellaFeature6x").is_file());
  assert!(!ws.release_dir("CapellaFeature5x").exists());

  let unknown = run_feature_release(&ws.path, &["run", "--variant", "CapellaFeature7x"])?;
  assert_eq!(unknown.status.code(), Some(1));
  assert!(stderr(&unknown).contains("CapellaFeature7x"));

  Ok(())
}

#[test]
fn test_dry_run_touches_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;

  let output = run_feature_release(&ws.path, &["run", "--dry-run"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.contains("would run"));
  assert!(out.contains("-Ddestination="));
  assert!(out.contains("Dry-run plan for version 2.3.1"));

  assert!(!ws.path.join("Releases").exists());
  assert!(!ws.path.join(FEATURE_DIR).join("build.xml").exists());
  assert!(!ws.path.join(FEATURE_DIR).join("Only").exists());

  Ok(())
}

#[test]
fn test_json_summary() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let broken = ws.add_tool("broken", true)?;
  let good = ws.add_tool("good", false)?;
  ws.write_config(&[("Broken", &broken), ("Good", &good)])?;

  let output = run_feature_release(&ws.path, &["run", "--json", "--date", "2024-05-01"])?;
  assert_eq!(output.status.code(), Some(3));

  // Progress lines go to stderr so stdout parses as a whole
  let summary: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(summary["version"], "2.3.1");
  assert_eq!(summary["date"], "2024-05-01");
  assert_eq!(summary["dry_run"], false);

  let variants = summary["variants"].as_array().expect("variants array");
  assert_eq!(variants.len(), 2);
  assert_eq!(variants[0]["label"], "Broken");
  assert_eq!(variants[0]["status"], "failed");
  assert_eq!(variants[0]["step"], "build");
  assert_eq!(variants[1]["label"], "Good");
  assert_eq!(variants[1]["status"], "succeeded");
  assert_eq!(variants[1]["files"], 2);
  assert!(variants[1]["hash"].as_str().is_some_and(|h| h.contains("DEHCapellaAdapter_2.3.1.jar")));

  Ok(())
}

#[test]
fn test_missing_descriptor_fails_before_building() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;
  std::fs::remove_file(ws.path.join(FEATURE_DIR).join("feature.xml"))?;

  let output = run_feature_release(&ws.path, &["run"])?;
  assert!(!output.status.success());
  assert_ne!(output.status.code(), Some(3));
  assert!(!ws.path.join("Releases").exists());

  Ok(())
}

#[test]
fn test_version_bump_rerun_with_clean() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;

  let first = run_feature_release(&ws.path, &["run"])?;
  assert!(first.status.success(), "stderr: {}", stderr(&first));

  let descriptor = ws.path.join(FEATURE_DIR).join("feature.xml");
  let bumped = ws.read(format!("{}/feature.xml", FEATURE_DIR))?.replace(VERSION, "2.4.0");
  std::fs::write(&descriptor, bumped)?;

  let second = run_feature_release(&ws.path, &["run", "--clean"])?;
  assert!(second.status.success(), "stdout: {}\nstderr: {}", stdout(&second), stderr(&second));

  let release = ws.release_dir("Only");
  assert!(release.join("DEHCapellaAdapter_2.4.0.jar").is_file());
  assert!(!release.join("DEHCapellaAdapter_2.3.1.jar").exists());
  assert!(ws.read("Releases/Only/README.md")?.contains("Version: 2.4.0"));

  let entries = zip_entries(&ws.archive("Only"))?;
  assert!(entries.iter().any(|e| e == "DEHCapellaAdapter_2.4.0.jar"));
  assert!(!entries.iter().any(|e| e == "DEHCapellaAdapter_2.3.1.jar"));

  Ok(())
}

#[test]
fn test_unclosed_descriptor_fails_before_building() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;
  std::fs::write(
    ws.path.join(FEATURE_DIR).join("feature.xml"),
    r#"<feature id="DEHCapellaAdapterFeature" version="2.3.1">"#,
  )?;

  let output = run_feature_release(&ws.path, &["run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Invalid feature descriptor"));
  assert!(!ws.path.join("Releases").exists());

  Ok(())
}

#[test]
fn test_output_dir_with_glob_characters() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let tool = ws.add_tool("capella", false)?;
  ws.write_config(&[("Only", &tool)])?;
  let mut config = ws.read("release.toml")?;
  config.push_str("\n[output]\ndir = \"Out [2024]\"\n");
  std::fs::write(ws.path.join("release.toml"), config)?;

  let output = run_feature_release(&ws.path, &["run"])?;
  assert!(output.status.success(), "stdout: {}\nstderr: {}", stdout(&output), stderr(&output));

  let readme = ws.read("Out [2024]/Only/README.md")?;
  assert!(readme.contains("  Out [2024]/Only/DEHCapellaAdapter_2.3.1.jar"));
  assert!(ws.path.join("Out [2024]/Only.zip").is_file());

  Ok(())
}
