//! Integration tests for `release-rail run`

use crate::helpers::{TestRepo, git, release_rail, run_release_rail};
use anyhow::Result;

/// core <- app, util standalone; directories sort as app, core, util
fn three_packages(fail_dir: Option<&str>) -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.add_package("app", "kd-app", "1.0.0", &["kd-core"])?;
  repo.add_package("core", "kd-core", "1.0.0", &[])?;
  repo.add_package("util", "kd-util", "1.0.0", &[])?;
  repo.use_logging_publisher(fail_dir)?;
  repo.commit("feat: add packages")?;
  git(&repo.path, &["push"])?;
  Ok(repo)
}

#[test]
fn test_first_release_publishes_everything_in_dependency_order() -> Result<()> {
  let repo = three_packages(None)?;

  // Version bump left for the release commit
  repo.write_file(
    "packages/core/package.json",
    r#"{ "name": "kd-core", "version": "1.1.0" }
"#,
  )?;

  let output = run_release_rail(&repo.path, &["run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert_eq!(repo.published()?, vec!["core", "app", "util"]);
  assert!(stdout.contains("Created tag: demo@1.0.0-"), "stdout: {}", stdout);

  // Release commit and tag reached the remote together
  let tags = repo.remote_tags()?;
  assert_eq!(tags.len(), 1);
  assert!(tags[0].starts_with("demo@1.0.0-"));
  assert_eq!(tags[0].len(), "demo@1.0.0-".len() + 12);
  assert_eq!(repo.remote_head("main")?, repo.stdout(&["rev-parse", "HEAD"])?);
  assert!(repo.stdout(&["status", "--porcelain"])?.is_empty());

  let subject = repo.stdout(&["log", "-1", "--format=%s"])?;
  assert_eq!(subject, "chore: release kd-core-v1.1.0 kd-app-v1.0.0 kd-util-v1.0.0");

  Ok(())
}

#[test]
fn test_only_packages_changed_since_last_tag_are_published() -> Result<()> {
  let repo = three_packages(None)?;
  git(&repo.path, &["tag", "demo@1.0.0-240101000000"])?;

  repo.write_file("packages/app/src/index.js", "module.exports = 'v2';\n")?;
  repo.write_file("README.md", "# demo\n")?;
  repo.commit("feat: app v2")?;

  run_release_rail(&repo.path, &["run"])?;

  assert_eq!(repo.published()?, vec!["app"]);
  Ok(())
}

#[test]
fn test_custom_commit_message() -> Result<()> {
  let repo = three_packages(None)?;
  git(&repo.path, &["tag", "demo@1.0.0-240101000000"])?;
  repo.write_file("packages/util/src/index.js", "module.exports = 'util v2';\n")?;
  repo.commit("feat: util v2")?;
  repo.write_file("CHANGELOG.md", "## 1.0.1\n")?;

  run_release_rail(&repo.path, &["run", "release: util 1.0.1"])?;

  assert_eq!(repo.published()?, vec!["util"]);
  assert_eq!(repo.stdout(&["log", "-1", "--format=%s"])?, "release: util 1.0.1");
  Ok(())
}

#[test]
fn test_failure_stops_the_run_without_tagging() -> Result<()> {
  let repo = three_packages(Some("app"))?;
  repo.write_file("CHANGELOG.md", "## next\n")?;

  let output = release_rail(&repo.path, &["run"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr);
  assert!(stderr.contains("kd-app"), "stderr: {}", stderr);
  assert!(stderr.contains("E403"), "stderr: {}", stderr);

  // core went out before the failure; util was never attempted
  assert_eq!(repo.published()?, vec!["core"]);
  assert!(repo.tags()?.is_empty());
  assert!(repo.remote_tags()?.is_empty());
  assert!(!repo.stdout(&["status", "--porcelain"])?.is_empty());

  Ok(())
}

#[test]
fn test_nothing_changed_is_a_successful_noop() -> Result<()> {
  let repo = three_packages(None)?;
  git(&repo.path, &["tag", "demo@1.0.0-240101000000"])?;
  let head = repo.stdout(&["rev-parse", "HEAD"])?;

  // Unrelated edits are left alone when no package changed
  repo.write_file("docs/notes.md", "# notes\n")?;

  let output = run_release_rail(&repo.path, &["run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("No packages changed"), "stdout: {}", stdout);
  assert!(!stdout.contains("Created tag"), "stdout: {}", stdout);
  assert!(repo.published()?.is_empty());
  assert_eq!(repo.tags()?, vec!["demo@1.0.0-240101000000"]);
  assert_eq!(repo.stdout(&["rev-parse", "HEAD"])?, head);
  assert!(repo.stdout(&["status", "--porcelain"])?.contains("docs/"));

  Ok(())
}

#[test]
fn test_feature_branch_prereleases() -> Result<()> {
  let repo = three_packages(None)?;
  git(&repo.path, &["tag", "demo@1.0.0-240101000000"])?;
  git(&repo.path, &["checkout", "-b", "feature/x"])?;
  repo.write_file("packages/core/src/index.js", "module.exports = 'beta';\n")?;
  repo.commit("feat: core beta")?;

  run_release_rail(&repo.path, &["run"])?;

  assert_eq!(repo.published()?, vec!["core --tag next"]);
  Ok(())
}

#[test]
fn test_dry_run_has_no_side_effects() -> Result<()> {
  let repo = three_packages(None)?;
  repo.write_file("CHANGELOG.md", "## next\n")?;

  let output = run_release_rail(&repo.path, &["run", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Dry-run"), "stdout: {}", stdout);
  assert!(stdout.contains("kd-core"));
  assert!(repo.published()?.is_empty());
  assert!(repo.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_missing_root_manifest_fails_before_publishing() -> Result<()> {
  let repo = three_packages(None)?;
  git(&repo.path, &["rm", "-q", "package.json"])?;
  repo.commit("chore: drop root manifest")?;

  let output = release_rail(&repo.path, &["run"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Root package.json"));
  assert!(repo.published()?.is_empty());
  Ok(())
}

#[test]
fn test_runs_from_package_subdirectory() -> Result<()> {
  let repo = three_packages(None)?;
  git(&repo.path, &["tag", "demo@1.0.0-240101000000"])?;
  repo.write_file("packages/util/src/index.js", "module.exports = 2;\n")?;
  repo.commit("fix: util")?;

  run_release_rail(&repo.path.join("packages/app"), &["run"])?;

  assert_eq!(repo.published()?, vec!["util"]);
  Ok(())
}
