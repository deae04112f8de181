//! Changed-package detection from version-control diffs
//!
//! A changed path counts for a package when it sits under the packages root
//! and its first segment below the root is that package's directory.

use crate::core::error::RailResult;
use crate::core::vcs::Vcs;
use crate::graph::DependencyGraph;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Map changed paths to the names of the packages they touch.
///
/// Paths outside `root`, directly at the root, or in directories that are
/// not in `dir_to_name` are ignored. Order and repetition of `paths` do not
/// matter.
pub fn detect<I, S>(paths: I, root: &str, dir_to_name: &BTreeMap<String, String>) -> BTreeSet<String>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let prefix = format!("{}/", root.trim_end_matches('/'));
  let mut changed = BTreeSet::new();

  for path in paths {
    let Some(rest) = path.as_ref().strip_prefix(&prefix) else {
      continue;
    };
    let dir = rest.split('/').next().unwrap_or_default();
    if dir.is_empty() {
      continue;
    }
    if let Some(name) = dir_to_name.get(dir) {
      changed.insert(name.clone());
    }
  }

  changed
}

/// Reference point the change set was computed against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum ChangeBase {
  /// No release tag exists yet; everything counts as changed
  FirstRelease,
  /// Diff from this tag to HEAD
  Since(String),
}

/// Packages believed changed, plus where that belief comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
  pub base: ChangeBase,
  pub packages: BTreeSet<String>,
}

impl ChangeSet {
  pub fn contains(&self, name: &str) -> bool {
    self.packages.contains(name)
  }
}

/// Detects what changed since the most recent release tag
pub struct ChangeDetector<'a> {
  vcs: &'a dyn Vcs,
  root: &'a str,
}

impl<'a> ChangeDetector<'a> {
  pub fn new(vcs: &'a dyn Vcs, root: &'a str) -> Self {
    Self { vcs, root }
  }

  /// Packages of `graph` changed between the last tag and HEAD.
  ///
  /// Without a tag this is a first release and every package is included.
  pub fn changed_since_last_release(&self, graph: &DependencyGraph) -> RailResult<ChangeSet> {
    let Some(tag) = self.vcs.last_tag()? else {
      tracing::debug!("no release tag found, treating every package as changed");
      return Ok(ChangeSet {
        base: ChangeBase::FirstRelease,
        packages: graph.names().map(str::to_string).collect(),
      });
    };

    let files = self.vcs.changed_files(&tag, "HEAD")?;
    tracing::debug!("{} file(s) changed since {}", files.len(), tag);

    let packages = detect(&files, self.root, &graph.dir_to_name());
    Ok(ChangeSet {
      base: ChangeBase::Since(tag),
      packages,
    })
  }
}
