use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for feature-release
/// Searched in order: release.toml, .release.toml, .config/release.toml
///
/// Every section is optional. A workspace with no configuration file gets the
/// historical layout: `DEHCapellaAdapterFeature/` built for two Capella hosts
/// into `Releases/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default)]
  pub feature: FeatureConfig,
  #[serde(default)]
  pub output: OutputConfig,
  #[serde(default)]
  pub hash: HashConfig,
  #[serde(default)]
  pub readme: ReadmeConfig,
  #[serde(default = "default_variants")]
  pub variants: Vec<VariantConfig>,
}

/// The feature project being packaged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
  /// Feature identifier passed to the build as `featureId`
  #[serde(default = "default_feature_id")]
  pub id: String,

  /// Feature project directory (relative to the release root)
  #[serde(default = "default_project_dir")]
  pub project_dir: PathBuf,

  /// Feature descriptor (default: `<project_dir>/feature.xml`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub descriptor: Option<PathBuf>,

  /// Build file template (default: `<project_dir>/build.xml.template`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_template: Option<PathBuf>,

  /// Rendered build file (default: `<project_dir>/build.xml`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_file: Option<PathBuf>,

  /// Passed to the build as `baseLocation` (default: the release root)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base_location: Option<PathBuf>,
}

fn default_feature_id() -> String {
  "DEHCapellaAdapterFeature".to_string()
}

fn default_project_dir() -> PathBuf {
  PathBuf::from("DEHCapellaAdapterFeature")
}

impl Default for FeatureConfig {
  fn default() -> Self {
    Self {
      id: default_feature_id(),
      project_dir: default_project_dir(),
      descriptor: None,
      build_template: None,
      build_file: None,
      base_location: None,
    }
  }
}

impl FeatureConfig {
  pub fn descriptor_path(&self) -> PathBuf {
    self
      .descriptor
      .clone()
      .unwrap_or_else(|| self.project_dir.join("feature.xml"))
  }

  pub fn build_template_path(&self) -> PathBuf {
    self
      .build_template
      .clone()
      .unwrap_or_else(|| self.project_dir.join("build.xml.template"))
  }

  pub fn build_file_path(&self) -> PathBuf {
    self
      .build_file
      .clone()
      .unwrap_or_else(|| self.project_dir.join("build.xml"))
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
  /// Release output root (relative to the release root)
  #[serde(default = "default_output_dir")]
  pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
  PathBuf::from("Releases")
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      dir: default_output_dir(),
    }
  }
}

/// How artifact checksums are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashMethod {
  /// In-process SHA-256, formatted like `sha256sum`
  #[default]
  Builtin,
  /// External utility named by `hash.command`
  Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashConfig {
  /// Glob, relative to a variant's release directory, selecting the artifact to hash
  #[serde(default = "default_hash_pattern")]
  pub pattern: String,

  #[serde(default)]
  pub method: HashMethod,

  /// Utility invoked as `<command> <artifact>` when `method = "command"`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub command: Option<String>,
}

fn default_hash_pattern() -> String {
  "*.jar".to_string()
}

impl Default for HashConfig {
  fn default() -> Self {
    Self {
      pattern: default_hash_pattern(),
      method: HashMethod::default(),
      command: None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadmeConfig {
  /// Product name shown in the generated README
  #[serde(default = "default_product")]
  pub product: String,
}

fn default_product() -> String {
  "Capella DST Adapter".to_string()
}

impl Default for ReadmeConfig {
  fn default() -> Self {
    Self {
      product: default_product(),
    }
  }
}

/// One host-tool target the feature is built against
///
/// # Example
///
/// ```toml
/// [[variants]]
/// label = "CapellaFeature6x"
/// tool_home = "C:\\Capella\\CapellaStudio 6"
/// executable = "eclipse"            # optional
/// output = "build/6x/bin"           # optional
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
  /// Variant name; also the release directory and archive base name
  pub label: String,

  /// Installation directory of the host tool
  pub tool_home: PathBuf,

  /// Executable inside `tool_home`
  #[serde(default = "default_executable")]
  pub executable: String,

  /// Build output directory (default: `<project_dir>/<label>/bin`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output: Option<PathBuf>,
}

fn default_executable() -> String {
  "eclipse".to_string()
}

impl VariantConfig {
  pub fn new(label: impl Into<String>, tool_home: impl Into<PathBuf>) -> Self {
    Self {
      label: label.into(),
      tool_home: tool_home.into(),
      executable: default_executable(),
      output: None,
    }
  }

  /// Full path of the host tool executable
  pub fn program(&self) -> PathBuf {
    self.tool_home.join(&self.executable)
  }

  /// Directory the build tool writes this variant's artifacts to
  pub fn build_output(&self, feature: &FeatureConfig) -> PathBuf {
    self
      .output
      .clone()
      .unwrap_or_else(|| feature.project_dir.join(&self.label).join("bin"))
  }
}

fn default_variants() -> Vec<VariantConfig> {
  vec![
    VariantConfig::new("CapellaFeature5x", r"D:\DomainSpecificTools\Capella\Other instal"),
    VariantConfig::new("CapellaFeature6x", r"C:\Capella\CapellaStudio 6"),
  ]
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      feature: FeatureConfig::default(),
      output: OutputConfig::default(),
      hash: HashConfig::default(),
      readme: ReadmeConfig::default(),
      variants: default_variants(),
    }
  }
}

impl ReleaseConfig {
  /// Find config file in search order: release.toml, .release.toml, .config/release.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("release.toml"),
      path.join(".release.toml"),
      path.join(".config").join("release.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the release root, falling back to defaults when no file exists
  pub fn load(root: &Path) -> ReleaseResult<Self> {
    match Self::find_config_path(root) {
      Some(config_path) => Self::load_from(&config_path),
      None => {
        tracing::debug!(root = %root.display(), "no release.toml found, using built-in defaults");
        Ok(Self::default())
      }
    }
  }

  /// Load config from an explicit file
  pub fn load_from(config_path: &Path) -> ReleaseResult<Self> {
    if !config_path.exists() {
      return Err(ReleaseError::Config(ConfigError::NotFound {
        path: config_path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ReleaseConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;
    tracing::debug!(path = %config_path.display(), variants = config.variants.len(), "loaded configuration");

    Ok(config)
  }

  /// Save config to release.toml under `root`
  pub fn save(&self, root: &Path) -> ReleaseResult<PathBuf> {
    let config_path = root.join("release.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Validate variants and hash settings
  pub fn validate(&self) -> ReleaseResult<()> {
    if self.variants.is_empty() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "variants (at least one [[variants]] entry)".to_string(),
      }));
    }

    let mut seen = HashSet::new();
    for variant in &self.variants {
      let label = variant.label.as_str();
      if label.trim().is_empty() {
        return Err(ReleaseError::Config(ConfigError::Invalid {
          reason: "variant label must not be empty".to_string(),
        }));
      }
      if label.trim() != label {
        return Err(ReleaseError::Config(ConfigError::Invalid {
          reason: format!("variant label '{}' has leading or trailing whitespace", label),
        }));
      }
      if label.contains(['/', '\\']) || label == "." || label == ".." {
        return Err(ReleaseError::Config(ConfigError::Invalid {
          reason: format!("variant label '{}' must be a plain directory name", variant.label),
        }));
      }
      if !seen.insert(label) {
        return Err(ReleaseError::Config(ConfigError::Invalid {
          reason: format!("duplicate variant label '{}'", variant.label),
        }));
      }
      if variant.executable.trim().is_empty() {
        return Err(ReleaseError::Config(ConfigError::MissingField {
          field: format!("executable for variant '{}'", variant.label),
        }));
      }
    }

    if self.hash.pattern.trim().is_empty() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "hash.pattern".to_string(),
      }));
    }

    if self.hash.method == HashMethod::Command && self.hash.command.as_deref().is_none_or(|c| c.trim().is_empty()) {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "hash.command (required when hash.method = \"command\")".to_string(),
      }));
    }

    Ok(())
  }

  /// Find a variant by label
  pub fn variant(&self, label: &str) -> Option<&VariantConfig> {
    self.variants.iter().find(|v| v.label == label)
  }

  /// Resolve the variants to release, in configuration order
  ///
  /// An empty filter selects every variant.
  pub fn select_variants(&self, filter: &[String]) -> ReleaseResult<Vec<&VariantConfig>> {
    for label in filter {
      if self.variant(label).is_none() {
        return Err(ReleaseError::Config(ConfigError::VariantNotFound {
          label: label.clone(),
          available: self.variants.iter().map(|v| v.label.clone()).collect(),
        }));
      }
    }

    Ok(
      self
        .variants
        .iter()
        .filter(|v| filter.is_empty() || filter.contains(&v.label))
        .collect(),
    )
  }
}
