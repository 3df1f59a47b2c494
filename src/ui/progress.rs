//! Progress indicator for release steps
//!
//! Uses `linya`, which draws on stderr and leaves stdout to the status lines.

use linya::{Bar, Progress};

/// One bar covering every step of every selected variant
pub struct StepProgress {
  progress: Progress,
  bar: Bar,
}

impl StepProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Mark one step done
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }

  /// Account for steps that will not run because a variant stopped early
  pub fn skip(&mut self, steps: usize) {
    self.progress.inc_and_draw(&self.bar, steps);
  }
}
