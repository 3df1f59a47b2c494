//! `feature-release run`

use crate::core::context::ReleaseContext;
use crate::core::error::{BuildError, ReleaseError, ReleaseResult};
use crate::release::build::SystemBuildRunner;
use crate::release::pipeline::VariantStatus;
use crate::release::{ReleasePipeline, ReleaseSummary, RunOptions};
use crate::ui::console::Console;

/// Run the release pipeline and report the outcome
///
/// Returns an error (exit code 3) when any variant failed, after the summary
/// has been printed.
pub fn run_release(ctx: &ReleaseContext, options: RunOptions, json: bool) -> ReleaseResult<()> {
  let console = Console::new(json);
  let summary = ReleasePipeline::new(ctx, SystemBuildRunner, console).run(&options)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    print_summary(&summary);
  }

  if summary.all_succeeded() {
    return Ok(());
  }

  let labels = summary.failed().iter().map(|v| v.label.clone()).collect();
  Err(ReleaseError::Build(BuildError::VariantsFailed { labels }))
}

/// clap value parser for `--date`
pub fn parse_release_date(value: &str) -> Result<String, String> {
  chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .map(|d| d.format("%Y-%m-%d").to_string())
    .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn print_summary(summary: &ReleaseSummary) {
  println!();
  if summary.dry_run {
    println!("🔍 Dry-run plan for version {}", summary.version);
  } else {
    println!("📋 Release summary for version {} ({})", summary.version, summary.date);
  }
  println!();

  for variant in &summary.variants {
    match &variant.status {
      VariantStatus::Succeeded => {
        println!("✅ {}", variant.label);
        if let Some(archive) = &variant.archive {
          println!("   Archive:  {}", archive.display());
        }
        if let Some(hash) = &variant.hash {
          println!("   SHA256:   {}", hash);
        }
        println!("   Files:    {}", variant.files);
      }
      VariantStatus::Failed { step, error } => {
        println!("❌ {}", variant.label);
        println!("   Failed at: {}", step);
        println!("   Error:     {}", error.lines().next().unwrap_or(""));
      }
      VariantStatus::Planned => {
        println!("⚪ {}", variant.label);
        println!("   Command:  {}", variant.command);
        println!("   Release:  {}", variant.release_dir.display());
        if let Some(archive) = &variant.archive {
          println!("   Archive:  {}", archive.display());
        }
      }
    }
    println!();
  }

  if !summary.dry_run {
    let released = summary.variants.iter().filter(|v| v.succeeded()).count();
    println!("{}/{} variant(s) released to {}", released, summary.variants.len(), summary.output_dir.display());
  }
}
