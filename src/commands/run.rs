//! Run command: release changed packages in dependency order, then tag
//!
//! 1. Resolve publish order and changed packages (see `plan`); stop if none changed
//! 2. Publish each changed package, stopping at the first failure
//! 3. Commit pending changes, tag `<root>@<version>-<timestamp>`, push

use super::plan::{analyze, print_plan};
use crate::core::context::ReleaseContext;
use crate::core::error::{RailError, RailResult, ReleaseError};
use crate::release::{
  CommandReleaser, FinalizeOutcome, ReleaseOrchestrator, ReleaseStatus, TagCommitter, default_commit_message,
};
use crate::ui::ReleaseProgress;
use std::collections::BTreeSet;

/// Run the release pipeline
pub fn run_release(ctx: &ReleaseContext, message: Option<String>, dry_run: bool) -> RailResult<()> {
  let analysis = analyze(ctx)?;
  let plan = &analysis.plan;

  if dry_run {
    print_plan(plan);
    println!();
    println!("🔍 Dry-run mode (nothing published, no tag created)");
    return Ok(());
  }

  let contents = &plan.contents;
  if !plan.has_work() {
    println!("✅ No packages changed, nothing to publish");
    return Ok(());
  }

  // Fail on a missing root manifest before anything is published
  let root = ctx.root_package()?;

  println!(
    "📦 Releasing {} of {} package(s) from '{}' ({})",
    contents.to_release.len(),
    contents.order.len(),
    contents.branch,
    contents.mode
  );

  let mut releaser = CommandReleaser::new(&ctx.config.release, &analysis.graph)?;
  let changed: BTreeSet<String> = contents.to_release.iter().cloned().collect();

  let report = {
    let mut progress = ReleaseProgress::new(contents.order.len(), "Releasing");
    ReleaseOrchestrator::new(&mut releaser).run(&contents.order, &changed, contents.mode, |outcome| {
      match &outcome.status {
        ReleaseStatus::Released => println!("   ✅ {}", outcome.package),
        ReleaseStatus::Skipped => tracing::debug!("{} unchanged, skipped", outcome.package),
        ReleaseStatus::Failed(_) => println!("   ❌ {}", outcome.package),
      }
      progress.inc();
    })
  };

  let released = report.released();
  if let Some(failed) = report.failure()
    && let ReleaseStatus::Failed(reason) = &failed.status
  {
    return Err(RailError::Release(ReleaseError::RunHalted {
      package: failed.package.clone(),
      reason: reason.clone(),
      released: released.iter().map(|s| s.to_string()).collect(),
    }));
  }

  let message = message.unwrap_or_else(|| {
    default_commit_message(
      released
        .iter()
        .filter_map(|name| analysis.graph.get(name))
        .map(|node| (node.name.as_str(), node.version.as_str())),
    )
  });

  println!();
  match TagCommitter::new(&ctx.git, &ctx.config.release.remote).finalize(&root, &message)? {
    FinalizeOutcome::NoChanges => println!("📝 Working tree clean, no release commit or tag"),
    FinalizeOutcome::Tagged { tag } => {
      println!("📌 Created tag: {}", tag);
      println!("📤 Pushed to {}", ctx.config.release.remote);
    }
  }

  println!();
  println!("✨ Release complete ({} package(s) published)", released.len());
  Ok(())
}
