//! Release plan: what a run would do, before it does it
//!
//! The plan is serializable for CI (`plan --json`) and carries a content
//! hash so two plans can be compared without diffing them.

use super::changes::{ChangeBase, ChangeSet};
use super::orchestrator::ReleaseMode;
use crate::core::error::RailResult;
use crate::graph::{CycleBreak, DependencyGraph, PublishOrder};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Plan identifier (SHA256 hash of plan contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanId(String);

impl PlanId {
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Self(format!("{:x}", hasher.finalize()))
  }

  /// First 12 characters
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Hashed part of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanContents {
  pub branch: String,
  pub mode: ReleaseMode,
  pub base: ChangeBase,
  /// Full publish order
  pub order: Vec<String>,
  /// Dependency layers of the publish order
  pub layers: Vec<Vec<String>>,
  /// Changed packages, in publish order
  pub to_release: Vec<String>,
  pub cycle_breaks: Vec<CycleBreak>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
  pub id: PlanId,
  #[serde(flatten)]
  pub contents: PlanContents,
}

impl ReleasePlan {
  pub fn new(
    graph: &DependencyGraph,
    order: &PublishOrder,
    changes: &ChangeSet,
    branch: &str,
    mode: ReleaseMode,
  ) -> RailResult<Self> {
    let contents = PlanContents {
      branch: branch.to_string(),
      mode,
      base: changes.base.clone(),
      order: order.names().to_vec(),
      layers: order.layers(graph),
      to_release: order.names().iter().filter(|n| changes.contains(n)).cloned().collect(),
      cycle_breaks: order.cycle_breaks().to_vec(),
    };

    let id = PlanId::from_contents(&serde_json::to_vec(&contents)?);
    Ok(Self { id, contents })
  }

  pub fn has_work(&self) -> bool {
    !self.contents.to_release.is_empty()
  }
}
