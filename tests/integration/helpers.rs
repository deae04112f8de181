//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A package.json monorepo with a bare `origin` remote
pub struct TestRepo {
  _root: TempDir,
  /// Working tree
  pub path: PathBuf,
  /// Bare remote repository
  pub remote: PathBuf,
  /// Publish log written by [`TestRepo::use_logging_publisher`], outside the working tree
  pub publish_log: PathBuf,
}

impl TestRepo {
  /// Create a repository with a root package.json, pushed to `origin/main`
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    let remote = root.path().join("remote.git");
    let publish_log = root.path().join("publish.log");
    std::fs::create_dir_all(&path)?;

    git(root.path(), &["init", "--bare", "--initial-branch=main", "remote.git"])?;

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["remote", "add", "origin", &remote.to_string_lossy()])?;

    std::fs::write(
      path.join("package.json"),
      r#"{ "name": "demo", "version": "1.0.0", "private": true }
"#,
    )?;

    let repo = Self {
      _root: root,
      path,
      remote,
      publish_log,
    };
    repo.commit("Initial monorepo setup")?;
    git(&repo.path, &["push", "-u", "origin", "main"])?;

    Ok(repo)
  }

  /// Add `packages/<dir>/package.json` declaring `name` with local `deps`
  pub fn add_package(&self, dir: &str, name: &str, version: &str, deps: &[&str]) -> Result<PathBuf> {
    let pkg_path = self.path.join("packages").join(dir);
    std::fs::create_dir_all(pkg_path.join("src"))?;

    let deps_json = deps
      .iter()
      .map(|d| format!("\"{}\": \"workspace:*\"", d))
      .collect::<Vec<_>>()
      .join(", ");
    std::fs::write(
      pkg_path.join("package.json"),
      format!(
        r#"{{
  "name": "{}",
  "version": "{}",
  "dependencies": {{ {} }},
  "devDependencies": {{ "typescript": "^5.0.0" }}
}}
"#,
        name, version, deps_json
      ),
    )?;
    std::fs::write(pkg_path.join("src/index.js"), format!("module.exports = '{}';\n", name))?;

    Ok(pkg_path)
  }

  /// Write a file relative to the working tree
  pub fn write_file(&self, rel: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(rel);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Write rail.toml (uncommitted)
  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("rail.toml", content)
  }

  /// Configure a publish command that appends `<dir> <args>` to the publish log,
  /// failing instead for the package directory named `fail_dir`
  pub fn use_logging_publisher(&self, fail_dir: Option<&str>) -> Result<()> {
    let fail = fail_dir
      .map(|d| format!("case \"$(pwd -P)\" in */{}) echo \"E403 forbidden\" >&2; exit 1;; esac; ", d))
      .unwrap_or_default();
    let script = format!(
      "{}echo \"$(basename \"$(pwd -P)\") $*\" >> \"{}\"",
      fail,
      self.publish_log.display()
    );

    self.write_config(&format!(
      r#"[workspace]
prefix = "kd-"

[release]
command = ["sh", "-c", '{}', "publish"]
"#,
      script
    ))
  }

  /// Lines of the publish log (empty when nothing was published)
  pub fn published(&self) -> Result<Vec<String>> {
    if !self.publish_log.exists() {
      return Ok(Vec::new());
    }
    Ok(
      std::fs::read_to_string(&self.publish_log)?
        .lines()
        .map(|l| l.trim().to_string())
        .collect(),
    )
  }

  /// Stage everything and commit
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    self.stdout(&["rev-parse", "HEAD"])
  }

  /// Trimmed stdout of a git command in the working tree
  pub fn stdout(&self, args: &[&str]) -> Result<String> {
    let output = git(&self.path, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Local tag names
  pub fn tags(&self) -> Result<Vec<String>> {
    Ok(self.stdout(&["tag", "--list"])?.lines().map(String::from).collect())
  }

  /// Tag names present on the remote
  pub fn remote_tags(&self) -> Result<Vec<String>> {
    let output = git(&self.remote, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Commit SHA of `branch` on the remote
  pub fn remote_head(&self, branch: &str) -> Result<String> {
    let output = git(&self.remote, &["rev-parse", branch])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the release-rail binary, whatever its exit status
pub fn release_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_release-rail"))
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run release-rail")
}

/// Run the release-rail binary, failing unless it exits 0
pub fn run_release_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = release_rail(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "release-rail command failed: release-rail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
