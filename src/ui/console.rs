//! Human-readable status output
//!
//! Status lines go to stdout. With `--json` stdout is reserved for the
//! machine-readable summary, so the same lines are written to stderr instead.

use std::fmt::Display;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
  json: bool,
}

impl Console {
  pub fn new(json: bool) -> Self {
    Self { json }
  }

  /// Whether stdout is reserved for JSON output
  pub fn is_json(&self) -> bool {
    self.json
  }

  /// Print one status line
  pub fn line(&self, msg: impl Display) {
    if self.json {
      let _ = writeln!(io::stderr(), "{}", msg);
    } else {
      let _ = writeln!(io::stdout(), "{}", msg);
    }
  }
}
