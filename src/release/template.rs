//! Build file templating
//!
//! Templates use `{name}` placeholders. Ant's own `${property}` references are
//! passed through untouched, `{{` and `}}` produce literal braces, and any
//! other brace usage is rejected instead of being copied silently. Values are
//! XML-escaped and never re-scanned.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt, ValidationError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Named values available to a template
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
  values: BTreeMap<&'static str, String>,
}

impl TemplateVars {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
    self.values.insert(name, value.into());
    self
  }

  fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }

  fn names(&self) -> Vec<&'static str> {
    self.values.keys().copied().collect()
  }
}

/// Result of rendering: the text plus the placeholders that were used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
  pub text: String,
  pub used: Vec<String>,
}

/// Render `template`, substituting every `{name}` from `vars`
pub fn render_template(template: &str, vars: &TemplateVars) -> ReleaseResult<Rendered> {
  let mut text = String::with_capacity(template.len());
  let mut used = Vec::new();
  let mut chars = template.char_indices().peekable();
  let mut line = 1;

  while let Some((_, c)) = chars.next() {
    match c {
      '\n' => {
        line += 1;
        text.push(c);
      }
      // Ant property reference: copy through the closing brace verbatim
      '$' if matches!(chars.peek(), Some((_, '{'))) => {
        text.push('$');
        for (_, inner) in chars.by_ref() {
          text.push(inner);
          if inner == '\n' {
            line += 1;
          }
          if inner == '}' {
            break;
          }
        }
      }
      '{' if matches!(chars.peek(), Some((_, '{'))) => {
        chars.next();
        text.push('{');
      }
      '}' if matches!(chars.peek(), Some((_, '}'))) => {
        chars.next();
        text.push('}');
      }
      '{' => {
        let mut name = String::new();
        let mut closed = false;
        for (_, inner) in chars.by_ref() {
          if inner == '}' {
            closed = true;
            break;
          }
          if inner == '\n' {
            break;
          }
          name.push(inner);
        }

        if !closed {
          return Err(template_error(line, format!("unterminated placeholder '{{{}'", name)));
        }
        if !is_identifier(&name) {
          return Err(template_error(line, format!("malformed placeholder '{{{}}}'", name)));
        }
        match vars.get(&name) {
          Some(value) => {
            text.push_str(&escape_xml(value));
            if !used.contains(&name) {
              used.push(name);
            }
          }
          None => {
            return Err(template_error(
              line,
              format!(
                "unknown placeholder '{{{}}}' (available: {})",
                name,
                vars.names().join(", ")
              ),
            ));
          }
        }
      }
      '}' => {
        return Err(template_error(line, "unmatched '}'".to_string()));
      }
      _ => text.push(c),
    }
  }

  Ok(Rendered { text, used })
}

/// Render the build file template for `version` and write it next to the template
///
/// The template is only read. The build file is overwritten on every run.
pub fn write_build_file(template_path: &Path, build_path: &Path, vars: &TemplateVars) -> ReleaseResult<()> {
  let template = fs::read_to_string(template_path)
    .with_context(|| format!("Failed to read build template {}", template_path.display()))?;

  let rendered = render_template(&template, vars)
    .map_err(|e| e.context(format!("while rendering {}", template_path.display())))?;

  if !rendered.used.iter().any(|name| name == "version") {
    tracing::warn!(template = %template_path.display(), "build template does not reference {{version}}");
  }

  fs::write(build_path, rendered.text).with_context(|| format!("Failed to write {}", build_path.display()))?;
  tracing::debug!(build_file = %build_path.display(), "rendered build file");
  Ok(())
}

/// Escape the five XML special characters
pub fn escape_xml(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&apos;"),
      _ => out.push(c),
    }
  }
  out
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() || first == '_' => {
      chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
    _ => false,
  }
}

fn template_error(line: usize, message: String) -> ReleaseError {
  ReleaseError::Validation(ValidationError::Template { line, message })
}
