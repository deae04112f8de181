//! `Vcs` operations for SystemGit (status, diff, tags, commit, push)

use super::system_git::{SystemGit, output_lines};
use super::{StatusEntry, Vcs};
use crate::core::error::{GitError, RailError, RailResult};

impl Vcs for SystemGit {
  fn status(&self) -> RailResult<Vec<StatusEntry>> {
    let output = self.run(&["status", "--porcelain"])?;
    Ok(parse_status(&String::from_utf8_lossy(&output.stdout)))
  }

  fn changed_files(&self, from: &str, to: &str) -> RailResult<Vec<String>> {
    let output = self.run(&["diff", "--name-only", from, to])?;
    Ok(output_lines(&output))
  }

  fn last_tag(&self) -> RailResult<Option<String>> {
    match self.run(&["describe", "--tags", "--abbrev=0"]) {
      Ok(output) => Ok(output_lines(&output).into_iter().next()),
      Err(RailError::Git(GitError::CommandFailed { stderr, .. })) if is_no_tag_error(&stderr) => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn current_branch(&self) -> RailResult<String> {
    // Detached HEAD succeeds here and reports "HEAD"
    match self.run(&["rev-parse", "--abbrev-ref", "HEAD"]) {
      Ok(output) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()),
      Err(RailError::Git(GitError::CommandFailed { stderr, .. })) if is_unborn_head(&stderr) => {
        let output = self.run(&["symbolic-ref", "--short", "HEAD"])?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
      }
      Err(e) => Err(e),
    }
  }

  fn unpushed_commits(&self) -> RailResult<Vec<String>> {
    match self.run(&["log", "@{u}..HEAD", "--oneline"]) {
      Ok(output) => Ok(output_lines(&output)),
      Err(e) => {
        // No upstream configured: compare against every remote-tracking ref instead
        tracing::debug!("no upstream for current branch ({}), checking all remotes", e);
        let output = self.run(&["log", "--oneline", "HEAD", "--not", "--remotes"])?;
        Ok(output_lines(&output))
      }
    }
  }

  fn stage_all(&self) -> RailResult<()> {
    self.run(&["add", "--all"])?;
    Ok(())
  }

  fn commit(&self, message: &str, bypass_hooks: bool) -> RailResult<()> {
    let mut args = vec!["commit", "-m", message];
    if bypass_hooks {
      args.push("--no-verify");
    }
    self.run(&args)?;
    Ok(())
  }

  fn tag(&self, name: &str) -> RailResult<()> {
    self.run(&["tag", name])?;
    Ok(())
  }

  fn push(&self, remote: &str, tag: Option<&str>) -> RailResult<()> {
    let tag_ref = tag.map(|t| format!("refs/tags/{}", t));
    let mut args = vec!["push", "--atomic", remote, "HEAD"];
    if let Some(tag_ref) = &tag_ref {
      args.push(tag_ref);
    }

    self.run(&args).map(|_| ()).map_err(|e| match e {
      RailError::Git(GitError::CommandFailed { stderr, .. }) => RailError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        reason: stderr,
      }),
      other => other,
    })
  }
}

/// `git describe` failures that just mean "there is no tag yet"
fn is_no_tag_error(stderr: &str) -> bool {
  stderr.contains("No names found") || stderr.contains("No tags can describe") || stderr.contains("cannot describe")
}

/// `git rev-parse HEAD` failures on a branch with no commits yet
fn is_unborn_head(stderr: &str) -> bool {
  stderr.contains("ambiguous argument 'HEAD'") || stderr.contains("unknown revision")
}

/// Parse `git status --porcelain` (v1) output
pub(crate) fn parse_status(output: &str) -> Vec<StatusEntry> {
  output
    .lines()
    .filter(|line| line.len() > 3)
    .map(|line| {
      let (code, rest) = line.split_at(2);
      let path = rest.trim_start();
      // Renames/copies: "R  old -> new"
      let path = path.rsplit_once(" -> ").map(|(_, to)| to).unwrap_or(path);
      StatusEntry {
        code: code.to_string(),
        path: path.trim_matches('"').to_string(),
      }
    })
    .collect()
}
