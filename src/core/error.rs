//! Error types for feature-release with contextual messages and exit codes
//!
//! Every error is categorized so `main` can pick an exit code, and most
//! categories carry a help line pointing the user at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for feature-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, descriptor, template)
  User = 1,
  /// System error (I/O, missing external tools)
  System = 2,
  /// External build failed, or at least one variant did not release
  Build = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for feature-release
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors
  Config(ConfigError),

  /// External build tool errors
  Build(BuildError),

  /// Validation errors (templates, artifact globs)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are lifted into a message so the path that failed is not lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Io(err) => ReleaseError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Build(BuildError::ToolNotFound { .. }) => ExitCode::System,
      ReleaseError::Build(_) => ExitCode::Build,
      ReleaseError::Validation(_) => ExitCode::User,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Build(e) => e.help_message(),
      ReleaseError::Validation(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Build(e) => write!(f, "{}", e),
      ReleaseError::Validation(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ReleaseError {
  fn from(err: toml_edit::de::Error) -> Self {
    ReleaseError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ReleaseError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ReleaseError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<quick_xml::Error> for ReleaseError {
  fn from(err: quick_xml::Error) -> Self {
    ReleaseError::message(format!("XML parse error: {}", err))
  }
}

impl From<quick_xml::events::attributes::AttrError> for ReleaseError {
  fn from(err: quick_xml::events::attributes::AttrError) -> Self {
    ReleaseError::message(format!("XML attribute error: {}", err))
  }
}

impl From<glob::PatternError> for ReleaseError {
  fn from(err: glob::PatternError) -> Self {
    ReleaseError::message(format!("Invalid glob pattern: {}", err))
  }
}

impl From<walkdir::Error> for ReleaseError {
  fn from(err: walkdir::Error) -> Self {
    ReleaseError::message(format!("Directory walk error: {}", err))
  }
}

impl From<zip::result::ZipError> for ReleaseError {
  fn from(err: zip::result::ZipError) -> Self {
    ReleaseError::message(format!("Zip error: {}", err))
  }
}

impl From<std::path::StripPrefixError> for ReleaseError {
  fn from(err: std::path::StripPrefixError) -> Self {
    ReleaseError::message(format!("Path strip prefix error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// File passed with --config does not exist
  NotFound { path: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Variant requested on the command line is not configured
  VariantNotFound { label: String, available: Vec<String> },

  /// Configuration is syntactically valid but unusable
  Invalid { reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `feature-release init` to create a release.toml.".to_string()),
      ConfigError::VariantNotFound { available, .. } => {
        Some(format!("Configured variants: {}", available.join(", ")))
      }
      ConfigError::Invalid { .. } => Some("Check the [[variants]] and [hash] sections of release.toml.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Configuration file not found: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::VariantNotFound { label, .. } => {
        write!(f, "Variant '{}' not found in configuration", label)
      }
      ConfigError::Invalid { reason } => {
        write!(f, "Invalid configuration: {}", reason)
      }
    }
  }
}

/// External build tool errors
#[derive(Debug)]
pub enum BuildError {
  /// The tool executable could not be spawned
  ToolNotFound { program: PathBuf, reason: String },

  /// The tool ran and reported failure
  Failed { variant: String, exit_code: Option<i32> },

  /// The hashing utility ran and reported failure
  HashCommandFailed { command: String, stderr: String },

  /// One or more variants did not complete
  VariantsFailed { labels: Vec<String> },
}

impl BuildError {
  fn help_message(&self) -> Option<String> {
    match self {
      BuildError::ToolNotFound { .. } => {
        Some("Check `tool_home` and `executable` for this variant in release.toml.".to_string())
      }
      BuildError::Failed { .. } => Some("See the captured build output above for the root cause.".to_string()),
      BuildError::HashCommandFailed { .. } => {
        Some("Set `method = \"builtin\"` under [hash] to hash without an external utility.".to_string())
      }
      BuildError::VariantsFailed { .. } => {
        Some("Fix the failures above and re-run with --clean, or --variant to retry one variant.".to_string())
      }
    }
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ToolNotFound { program, reason } => {
        write!(f, "Failed to launch {}: {}", program.display(), reason)
      }
      BuildError::Failed { variant, exit_code } => match exit_code {
        Some(code) => write!(f, "Feature build for '{}' failed with exit code {}", variant, code),
        None => write!(f, "Feature build for '{}' was terminated by a signal", variant),
      },
      BuildError::HashCommandFailed { command, stderr } => {
        write!(f, "Hash command failed: {}\n{}", command, stderr)
      }
      BuildError::VariantsFailed { labels } => {
        write!(f, "Release incomplete, failed variant(s): {}", labels.join(", "))
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// Template placeholder problem
  Template { line: usize, message: String },

  /// Artifact glob did not resolve to exactly one file
  ArtifactMatch { pattern: String, matches: Vec<PathBuf> },

  /// Feature descriptor is unusable
  Descriptor { path: PathBuf, reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::Template { .. } => {
        Some("Use {version} or {feature_id}; write {{ and }} for literal braces.".to_string())
      }
      ValidationError::ArtifactMatch { matches, .. } if matches.is_empty() => {
        Some("The build produced no artifact. Check the build output for errors.".to_string())
      }
      ValidationError::ArtifactMatch { .. } => {
        Some("Narrow `pattern` under [hash] so it selects a single artifact.".to_string())
      }
      ValidationError::Descriptor { .. } => {
        Some("The descriptor must be well-formed XML with a single root element.".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Template { line, message } => {
        write!(f, "Template error on line {}: {}", line, message)
      }
      ValidationError::ArtifactMatch { pattern, matches } => {
        if matches.is_empty() {
          write!(f, "No artifact matches '{}'", pattern)
        } else {
          let listed: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
          write!(
            f,
            "Expected exactly one artifact matching '{}', found {}: {}",
            pattern,
            matches.len(),
            listed.join(", ")
          )
        }
      }
      ValidationError::Descriptor { path, reason } => {
        write!(f, "Invalid feature descriptor {}: {}", path.display(), reason)
      }
    }
  }
}

/// Result type alias for feature-release
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
