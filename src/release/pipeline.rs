//! Release pipeline
//!
//! ```text
//! read version ─► render build file ─► for each variant:
//!                                         build ─► collect ─► hash ─► README ─► zip
//! ```
//!
//! Reading the version and rendering the build file are shared by every
//! variant, so their failures end the run. Anything that fails inside a
//! variant stops that variant only; the remaining variants still run and the
//! summary records where each one stopped.

use crate::core::config::VariantConfig;
use crate::core::context::ReleaseContext;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::release::archive::{archive_directory, remove_archive};
use crate::release::build::{BuildInvocation, BuildOutcome, BuildParams, BuildRunner, clear_build_output, print_outcome};
use crate::release::collect::collect_artifacts;
use crate::release::hash::compute_hash;
use crate::release::readme::{ReadmeFields, write_readme};
use crate::release::template::{TemplateVars, write_build_file};
use crate::release::version::read_version;
use crate::ui::console::Console;
use crate::ui::progress::StepProgress;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Per-variant steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  Build,
  Collect,
  Hash,
  Readme,
  Archive,
}

impl Step {
  pub const ALL: [Step; 5] = [Step::Build, Step::Collect, Step::Hash, Step::Readme, Step::Archive];
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::Build => "build",
      Step::Collect => "collect",
      Step::Hash => "hash",
      Step::Readme => "readme",
      Step::Archive => "archive",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VariantStatus {
  /// Every step completed
  Succeeded,
  /// Stopped at `step`; later steps were not attempted
  Failed { step: Step, error: String },
  /// Dry run: nothing was executed
  Planned,
}

/// What happened to one variant
#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
  pub label: String,
  #[serde(flatten)]
  pub status: VariantStatus,
  pub command: String,
  pub release_dir: PathBuf,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub build: Option<BuildOutcome>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hash: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub archive: Option<PathBuf>,
  pub files: usize,
}

impl VariantReport {
  pub fn succeeded(&self) -> bool {
    self.status == VariantStatus::Succeeded
  }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
  pub version: String,
  pub date: String,
  pub output_dir: PathBuf,
  pub dry_run: bool,
  pub variants: Vec<VariantReport>,
}

impl ReleaseSummary {
  pub fn failed(&self) -> Vec<&VariantReport> {
    self
      .variants
      .iter()
      .filter(|v| matches!(v.status, VariantStatus::Failed { .. }))
      .collect()
  }

  pub fn all_succeeded(&self) -> bool {
    self.failed().is_empty()
  }
}

/// Options for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  /// Variant labels to release; empty means all
  pub variants: Vec<String>,
  /// README date (`YYYY-MM-DD`); defaults to today
  pub date: Option<String>,
  /// Remove existing release directories and archives first
  pub clean: bool,
  /// Print the plan without running anything
  pub dry_run: bool,
}

/// Today's date in README format
pub fn today() -> String {
  chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub struct ReleasePipeline<'a, R: BuildRunner> {
  ctx: &'a ReleaseContext,
  runner: R,
  console: Console,
}

impl<'a, R: BuildRunner> ReleasePipeline<'a, R> {
  pub fn new(ctx: &'a ReleaseContext, runner: R, console: Console) -> Self {
    Self { ctx, runner, console }
  }

  /// Run the pipeline for the selected variants
  pub fn run(&self, options: &RunOptions) -> ReleaseResult<ReleaseSummary> {
    let config = &self.ctx.config;
    let variants = config.select_variants(&options.variants)?;

    let descriptor = self.ctx.resolve(&config.feature.descriptor_path());
    self.console.line(format!("📖 Reading version from {}...", descriptor.display()));
    let version = read_version(&descriptor)?;
    self.console.line(format!("Version: {}", version));

    let build_file = self.ctx.resolve(&config.feature.build_file_path());
    if !options.dry_run {
      let template = self.ctx.resolve(&config.feature.build_template_path());
      let vars = TemplateVars::new()
        .set("version", version.clone())
        .set("feature_id", config.feature.id.clone());
      write_build_file(&template, &build_file, &vars)?;
    }

    let output_dir = self.ctx.output_dir();
    if !options.dry_run {
      fs::create_dir_all(&output_dir).with_context(|| format!("Failed to create {}", output_dir.display()))?;
    }

    let date = options.date.clone().unwrap_or_else(today);
    let params = BuildParams {
      feature_id: config.feature.id.clone(),
      version: version.clone(),
      build_file,
      base_location: config
        .feature
        .base_location
        .as_ref()
        .map(|p| self.ctx.resolve(p))
        .unwrap_or_else(|| self.ctx.root.clone()),
      working_dir: self.ctx.root.clone(),
    };

    let mut progress = if !options.dry_run && !self.console.is_json() && std::io::stderr().is_terminal() {
      Some(StepProgress::new(
        variants.len() * Step::ALL.len(),
        format!("Releasing {} variant(s)", variants.len()),
      ))
    } else {
      None
    };

    let mut reports = Vec::with_capacity(variants.len());
    for variant in variants {
      let report = if options.dry_run {
        self.plan_variant(variant, &params)
      } else {
        self.release_variant(variant, &params, &date, options.clean, progress.as_mut())
      };
      reports.push(report);
    }

    if !options.dry_run {
      self.console.line(format!(
        "[{}] build completed. Zip files and READMEs are available at: {}",
        version,
        output_dir.display()
      ));
    }

    Ok(ReleaseSummary {
      version,
      date,
      output_dir,
      dry_run: options.dry_run,
      variants: reports,
    })
  }

  fn plan_variant(&self, variant: &VariantConfig, params: &BuildParams) -> VariantReport {
    let destination = self.ctx.resolve(&variant.build_output(&self.ctx.config.feature));
    let invocation = BuildInvocation::new(variant, params, &destination);
    let release_dir = self.ctx.output_dir().join(&variant.label);

    self.console.line(format!("[{}] would run: {}", variant.label, invocation.command_line()));
    self.console.line(format!(
      "[{}] would collect {} into {}",
      variant.label,
      destination.display(),
      release_dir.display()
    ));

    VariantReport {
      label: variant.label.clone(),
      status: VariantStatus::Planned,
      command: invocation.command_line(),
      archive: Some(self.archive_path(variant)),
      release_dir,
      build: None,
      hash: None,
      files: 0,
    }
  }

  fn release_variant(
    &self,
    variant: &VariantConfig,
    params: &BuildParams,
    date: &str,
    clean: bool,
    mut progress: Option<&mut StepProgress>,
  ) -> VariantReport {
    let config = &self.ctx.config;
    let label = variant.label.as_str();
    let destination = self.ctx.resolve(&variant.build_output(&config.feature));
    let invocation = BuildInvocation::new(variant, params, &destination);
    let release_dir = self.ctx.output_dir().join(label);
    let archive_path = self.archive_path(variant);

    let mut report = VariantReport {
      label: label.to_string(),
      status: VariantStatus::Succeeded,
      command: invocation.command_line(),
      release_dir: release_dir.clone(),
      build: None,
      hash: None,
      archive: None,
      files: 0,
    };

    let fail = |report: &mut VariantReport, step: Step, error: String, progress: Option<&mut StepProgress>| {
      self.console.line(format!("❌ [{}] {} failed: {}", label, step, error));
      report.status = VariantStatus::Failed { step, error };
      if let Some(p) = progress {
        p.skip(Step::ALL.len() - step_index(step));
      }
    };

    // Build
    self.console.line(format!(
      "🔨 [{}] Building feature for Capella Studio at: {} for [{}]",
      label,
      variant.tool_home.display(),
      params.version
    ));
    if let Err(e) = clear_build_output(&destination) {
      fail(&mut report, Step::Build, e.to_string(), progress);
      return report;
    }
    let outcome = match self.runner.run(&invocation) {
      Ok(outcome) => outcome,
      Err(e) => {
        fail(&mut report, Step::Build, e.to_string(), progress);
        return report;
      }
    };
    print_outcome(&self.console, &outcome);
    let checked = outcome.check(label);
    report.build = Some(outcome);
    if let Err(e) = checked {
      fail(&mut report, Step::Build, e.to_string(), progress);
      return report;
    }
    if let Some(p) = progress.as_deref_mut() {
      p.inc();
    }

    // Collect
    self.console.line(format!("📦 Copying built feature {} to output directory...", label));
    if clean && let Err(e) = clean_previous(&release_dir, &archive_path) {
      fail(&mut report, Step::Collect, e.to_string(), progress);
      return report;
    }
    match collect_artifacts(&destination, &release_dir) {
      Ok(stats) => report.files = stats.files,
      Err(e) => {
        fail(&mut report, Step::Collect, e.to_string(), progress);
        return report;
      }
    }
    self.console.line(format!("Feature {} copied.", label));
    if let Some(p) = progress.as_deref_mut() {
      p.inc();
    }

    // Hash
    self.console.line(format!("[{}] Generating README file...", label));
    let hash = match compute_hash(&self.ctx.root, &release_dir, &config.hash) {
      Ok(hash) => hash,
      Err(e) => {
        fail(&mut report, Step::Hash, e.to_string(), progress);
        return report;
      }
    };
    report.hash = Some(hash.clone());
    if let Some(p) = progress.as_deref_mut() {
      p.inc();
    }

    // README
    let fields = ReadmeFields {
      product: &config.readme.product,
      version: &params.version,
      date,
      hash: &hash,
    };
    if let Err(e) = write_readme(&release_dir, &fields) {
      fail(&mut report, Step::Readme, e.to_string(), progress);
      return report;
    }
    self.console.line(format!("[{}] README file generated.", label));
    if let Some(p) = progress.as_deref_mut() {
      p.inc();
    }

    // Archive
    self.console.line(format!("🗜️  [{}] Creating zip file...", label));
    if let Err(e) = archive_directory(&release_dir, &archive_path) {
      fail(&mut report, Step::Archive, e.to_string(), progress);
      return report;
    }
    report.archive = Some(archive_path);
    self.console.line(format!("✅ [{}] Zip file created.", label));
    if let Some(p) = progress.as_deref_mut() {
      p.inc();
    }

    report
  }

  fn archive_path(&self, variant: &VariantConfig) -> PathBuf {
    self.ctx.output_dir().join(format!("{}.zip", variant.label))
  }
}

fn step_index(step: Step) -> usize {
  Step::ALL.iter().position(|s| *s == step).unwrap_or(0)
}

fn clean_previous(release_dir: &std::path::Path, archive_path: &std::path::Path) -> ReleaseResult<()> {
  if release_dir.exists() {
    tracing::debug!(dir = %release_dir.display(), "removing previous release directory");
    fs::remove_dir_all(release_dir).with_context(|| format!("Failed to remove {}", release_dir.display()))?;
  }
  remove_archive(archive_path)
}
