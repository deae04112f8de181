//! Integration tests for `release-rail commit` and `release-rail tag`

use crate::helpers::{TestRepo, git, run_release_rail};
use anyhow::Result;

fn two_packages() -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.add_package("app", "kd-app", "2.0.0", &["kd-core"])?;
  repo.add_package("core", "kd-core", "1.4.0", &[])?;
  repo.commit("feat: add packages")?;
  git(&repo.path, &["push"])?;
  Ok(repo)
}

#[test]
fn test_commit_without_package_changes_is_noop() -> Result<()> {
  let repo = two_packages()?;
  let head = repo.stdout(&["rev-parse", "HEAD"])?;

  // Changes outside the packages and the root manifest do not count
  repo.write_file("docs/guide.md", "# guide\n")?;

  let output = run_release_rail(&repo.path, &["commit"])?;

  assert!(String::from_utf8_lossy(&output.stdout).contains("No package changes"));
  assert_eq!(repo.stdout(&["rev-parse", "HEAD"])?, head);
  assert!(repo.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_commit_tags_and_pushes_with_default_message() -> Result<()> {
  let repo = two_packages()?;
  repo.write_file("packages/core/src/index.js", "module.exports = 'core 1.4.1';\n")?;

  let output = run_release_rail(&repo.path, &["commit"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("packages/core/src/index.js"), "stdout: {}", stdout);
  assert_eq!(
    repo.stdout(&["log", "-1", "--format=%s"])?,
    "chore: release kd-app-v2.0.0 kd-core-v1.4.0"
  );

  let tags = repo.remote_tags()?;
  assert_eq!(tags.len(), 1);
  assert!(tags[0].starts_with("demo@1.0.0-"));
  assert_eq!(repo.remote_head("main")?, repo.stdout(&["rev-parse", "HEAD"])?);
  Ok(())
}

#[test]
fn test_commit_root_manifest_change_with_custom_message() -> Result<()> {
  let repo = two_packages()?;
  repo.write_file("package.json", r#"{ "name": "demo", "version": "1.1.0" }"#)?;

  run_release_rail(&repo.path, &["commit", "chore: bump demo to 1.1.0"])?;

  assert_eq!(repo.stdout(&["log", "-1", "--format=%s"])?, "chore: bump demo to 1.1.0");
  assert!(repo.tags()?[0].starts_with("demo@1.1.0-"));
  Ok(())
}

#[test]
fn test_commit_picks_up_untracked_packages_root() -> Result<()> {
  let repo = TestRepo::new()?;
  // Never committed, so git reports the whole root as `?? packages/`
  repo.add_package("core", "kd-core", "0.1.0", &[])?;

  let output = run_release_rail(&repo.path, &["commit"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(!stdout.contains("No package changes"), "stdout: {}", stdout);
  assert!(repo.stdout(&["status", "--porcelain"])?.is_empty());
  assert_eq!(repo.remote_tags()?.len(), 1);
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_commit_bypasses_local_hooks() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let repo = two_packages()?;
  let hook = repo.path.join(".git/hooks/pre-commit");
  std::fs::write(&hook, "#!/bin/sh\nexit 1\n")?;
  std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755))?;

  repo.write_file("packages/app/src/index.js", "module.exports = 'app';\n// touched\n")?;
  run_release_rail(&repo.path, &["commit"])?;

  assert!(repo.stdout(&["status", "--porcelain"])?.is_empty());
  Ok(())
}

#[test]
fn test_tag_unpushed_commits() -> Result<()> {
  let repo = two_packages()?;

  let output = run_release_rail(&repo.path, &["tag"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("No unpushed commits"));
  assert!(repo.tags()?.is_empty());

  repo.write_file("packages/core/src/index.js", "module.exports = 'core';\n// fix\n")?;
  let head = repo.commit("fix: core")?;

  let output = run_release_rail(&repo.path, &["tag"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Created tag: demo@1.0.0-"), "stdout: {}", stdout);
  assert_eq!(repo.remote_head("main")?, head);
  assert_eq!(repo.remote_tags()?.len(), 1);
  Ok(())
}
