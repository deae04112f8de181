//! Release commit, tag and push
//!
//! Tags are named `<name>@<version>-<YYMMDDHHMMSS>` (local time) after the
//! repository's root package, so repeated releases of one version never
//! collide. Steps run strictly in sequence and stop at the first failure;
//! nothing already done is undone.

use crate::core::error::RailResult;
use crate::core::vcs::{StatusEntry, Vcs};
use crate::manifest::PackageDescriptor;
use chrono::{Local, NaiveDateTime};

const TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Tag name for `name`/`version` released at `at`
pub fn tag_name(name: &str, version: &str, at: &NaiveDateTime) -> String {
  format!("{}@{}-{}", name, version, at.format(TIMESTAMP_FORMAT))
}

/// `chore: release a-v1.0.0 b-v2.1.0` over `(name, version)` pairs that have both
pub fn default_commit_message<'p>(packages: impl IntoIterator<Item = (&'p str, &'p str)>) -> String {
  let released: Vec<String> = packages
    .into_iter()
    .filter(|(name, version)| !name.trim().is_empty() && !version.is_empty())
    .map(|(name, version)| format!("{}-v{}", name, version))
    .collect();

  if released.is_empty() {
    "chore: release".to_string()
  } else {
    format!("chore: release {}", released.join(" "))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
  /// Nothing to commit or push; no git state was touched
  NoChanges,
  Tagged { tag: String },
}

/// Commits, tags and pushes the release marker
pub struct TagCommitter<'a> {
  vcs: &'a dyn Vcs,
  remote: &'a str,
  /// Repository-relative paths whose changes open the gate; empty means any path
  scope: Vec<String>,
}

impl<'a> TagCommitter<'a> {
  pub fn new(vcs: &'a dyn Vcs, remote: &'a str) -> Self {
    Self {
      vcs,
      remote,
      scope: Vec::new(),
    }
  }

  /// Only changes under `paths` count as pending
  pub fn scoped(mut self, paths: Vec<String>) -> Self {
    self.scope = paths;
    self
  }

  /// Status entries that open the finalize gate
  pub fn pending_changes(&self) -> RailResult<Vec<StatusEntry>> {
    let entries = self.vcs.status()?;
    if self.scope.is_empty() {
      return Ok(entries);
    }
    Ok(entries.into_iter().filter(|e| self.in_scope(&e.path)).collect())
  }

  /// `path` is a scope entry, lies under one, or is a directory holding one
  /// (git reports a wholly untracked directory as `?? packages/`)
  fn in_scope(&self, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    self.scope.iter().any(|s| {
      let s = s.trim_end_matches('/');
      path == s || is_under(path, s) || is_under(s, path)
    })
  }

  /// Stage, commit, tag and push, stamped with the current local time
  pub fn finalize(&self, root: &PackageDescriptor, message: &str) -> RailResult<FinalizeOutcome> {
    self.finalize_at(root, message, Local::now().naive_local())
  }

  pub fn finalize_at(&self, root: &PackageDescriptor, message: &str, at: NaiveDateTime) -> RailResult<FinalizeOutcome> {
    let pending = self.pending_changes()?;
    if pending.is_empty() {
      tracing::debug!("working tree clean, skipping release commit");
      return Ok(FinalizeOutcome::NoChanges);
    }
    tracing::debug!("{} pending change(s)", pending.len());

    let tag = tag_name(&root.name, &root.version, &at);

    self.vcs.stage_all()?;
    self.vcs.commit(message, true)?;
    self.vcs.tag(&tag)?;
    self.vcs.push(self.remote, Some(&tag))?;

    Ok(FinalizeOutcome::Tagged { tag })
  }

  /// Tag HEAD and push branch and tag, if the branch has unpushed commits
  pub fn tag_unpushed(&self, root: &PackageDescriptor) -> RailResult<FinalizeOutcome> {
    self.tag_unpushed_at(root, Local::now().naive_local())
  }

  pub fn tag_unpushed_at(&self, root: &PackageDescriptor, at: NaiveDateTime) -> RailResult<FinalizeOutcome> {
    let unpushed = self.vcs.unpushed_commits()?;
    if unpushed.is_empty() {
      return Ok(FinalizeOutcome::NoChanges);
    }
    tracing::debug!("{} unpushed commit(s)", unpushed.len());

    let tag = tag_name(&root.name, &root.version, &at);
    self.vcs.tag(&tag)?;
    self.vcs.push(self.remote, Some(&tag))?;

    Ok(FinalizeOutcome::Tagged { tag })
  }
}

fn is_under(path: &str, dir: &str) -> bool {
  path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/'))
}
