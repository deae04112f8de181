//! Sequential, dependency-ordered release execution
//!
//! ```text
//! for package in order:
//!   not changed  -> Skipped
//!   release ok   -> Released
//!   release err  -> Failed, stop (earlier releases stay released)
//! ```

use super::publisher::Releaser;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// How packages are published on the current branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
  Normal,
  Prerelease,
}

impl ReleaseMode {
  /// Protected branches release normally, every other branch pre-releases
  pub fn for_branch(branch: &str, protected: &[String]) -> Self {
    if protected.iter().any(|b| b == branch) {
      ReleaseMode::Normal
    } else {
      ReleaseMode::Prerelease
    }
  }

  pub fn is_prerelease(self) -> bool {
    self == ReleaseMode::Prerelease
  }
}

impl fmt::Display for ReleaseMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseMode::Normal => write!(f, "normal"),
      ReleaseMode::Prerelease => write!(f, "prerelease"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseStatus {
  Released,
  /// Not in the changed set
  Skipped,
  /// Releaser error message
  Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
  pub package: String,
  pub status: ReleaseStatus,
}

/// Outcomes of one run, in publish order
///
/// Packages after a failure have no outcome at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseReport {
  outcomes: Vec<ReleaseOutcome>,
}

impl ReleaseReport {
  pub fn outcomes(&self) -> &[ReleaseOutcome] {
    &self.outcomes
  }

  /// Names of packages released in this run
  pub fn released(&self) -> Vec<&str> {
    self
      .outcomes
      .iter()
      .filter(|o| o.status == ReleaseStatus::Released)
      .map(|o| o.package.as_str())
      .collect()
  }

  /// The outcome that stopped the run, if any
  pub fn failure(&self) -> Option<&ReleaseOutcome> {
    self
      .outcomes
      .iter()
      .find(|o| matches!(o.status, ReleaseStatus::Failed(_)))
  }
}

/// Drives a [`Releaser`] over a publish order
pub struct ReleaseOrchestrator<'r> {
  releaser: &'r mut dyn Releaser,
}

impl<'r> ReleaseOrchestrator<'r> {
  pub fn new(releaser: &'r mut dyn Releaser) -> Self {
    Self { releaser }
  }

  /// Release `order` front to back, reporting each outcome as soon as it is known
  pub fn run<F>(
    &mut self,
    order: &[String],
    changed: &BTreeSet<String>,
    mode: ReleaseMode,
    mut on_outcome: F,
  ) -> ReleaseReport
  where
    F: FnMut(&ReleaseOutcome),
  {
    let mut report = ReleaseReport::default();

    for package in order {
      let status = if !changed.contains(package) {
        ReleaseStatus::Skipped
      } else {
        match self.releaser.release(package, mode.is_prerelease()) {
          Ok(()) => ReleaseStatus::Released,
          Err(e) => ReleaseStatus::Failed(e.to_string()),
        }
      };

      let outcome = ReleaseOutcome {
        package: package.clone(),
        status,
      };
      on_outcome(&outcome);

      let failed = matches!(outcome.status, ReleaseStatus::Failed(_));
      report.outcomes.push(outcome);
      if failed {
        tracing::debug!("halting after failure of {}", package);
        break;
      }
    }

    report
  }
}
