//! Feature version lookup
//!
//! The version lives in the `version` attribute of the feature descriptor's
//! root element (`<feature id="..." version="1.2.0">`).

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt, ValidationError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

/// Used when the root element carries no `version` attribute
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Read the feature version from a descriptor file
pub fn read_version(path: &Path) -> ReleaseResult<String> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  parse_version(&content).map_err(|e| {
    ReleaseError::Validation(ValidationError::Descriptor {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })
  })
}

/// Extract the root element's `version` attribute from descriptor XML
///
/// The whole document is read so that unclosed elements, a second root element
/// or malformed content after the root start tag are still reported.
pub fn parse_version(xml: &str) -> ReleaseResult<String> {
  let mut reader = Reader::from_str(xml);
  let mut version: Option<Option<String>> = None;
  let mut depth = 0usize;

  loop {
    let event = reader.read_event()?;
    match &event {
      Event::Start(e) | Event::Empty(e) => {
        if depth == 0 {
          if version.is_some() {
            return Err(ReleaseError::message("document has more than one root element"));
          }
          version = Some(root_version(e)?);
        }
        if matches!(event, Event::Start(_)) {
          depth += 1;
        }
      }
      Event::End(_) => depth = depth.saturating_sub(1),
      Event::Eof if depth > 0 => {
        return Err(ReleaseError::message(format!(
          "document ends with {} unclosed element(s)",
          depth
        )));
      }
      Event::Eof => break,
      _ => {}
    }
  }

  match version {
    Some(Some(v)) => Ok(v),
    Some(None) => {
      tracing::debug!(default = DEFAULT_VERSION, "descriptor has no version attribute");
      Ok(DEFAULT_VERSION.to_string())
    }
    None => Err(ReleaseError::message("document has no root element")),
  }
}

fn root_version(root: &BytesStart<'_>) -> ReleaseResult<Option<String>> {
  match root.try_get_attribute("version")? {
    Some(attr) => Ok(Some(attr.unescape_value()?.trim().to_string())),
    None => Ok(None),
  }
}
