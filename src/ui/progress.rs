//! Progress indicator for the release loop
//!
//! Uses `linya`, which draws to stderr and leaves stdout to the per-package
//! progress lines.

use linya::{Bar, Progress};

/// One bar advanced once per package visited
pub struct ReleaseProgress {
  progress: Progress,
  bar: Bar,
}

impl ReleaseProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
