pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;

use crate::core::error::RailResult;

/// One line of `git status --porcelain`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
  /// Two-character XY status code (e.g. " M", "??", "R ")
  pub code: String,
  /// Repository-relative path (destination path for renames)
  pub path: String,
}

/// Version-control operations the release pipeline depends on
///
/// Every method either succeeds or reports why it failed; none of them retry.
pub trait Vcs {
  /// Pending working-tree changes
  fn status(&self) -> RailResult<Vec<StatusEntry>>;

  /// Paths changed between two refs
  fn changed_files(&self, from: &str, to: &str) -> RailResult<Vec<String>>;

  /// Most recent tag reachable from HEAD, `None` when the repository has no tags
  fn last_tag(&self) -> RailResult<Option<String>>;

  /// Current branch name (`HEAD` when detached)
  fn current_branch(&self) -> RailResult<String>;

  /// Commits on HEAD that no remote has yet (oneline format)
  fn unpushed_commits(&self) -> RailResult<Vec<String>>;

  /// Stage every working-tree change
  fn stage_all(&self) -> RailResult<()>;

  /// Commit staged changes, optionally bypassing local hooks
  fn commit(&self, message: &str, bypass_hooks: bool) -> RailResult<()>;

  /// Create a lightweight tag on HEAD
  fn tag(&self, name: &str) -> RailResult<()>;

  /// Push the current branch, and `tag` with it, to `remote` in one atomic push
  fn push(&self, remote: &str, tag: Option<&str>) -> RailResult<()>;
}
