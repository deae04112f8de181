//! Commit command: check in package changes with a release tag
//!
//! Lightweight variant of `run` that publishes nothing. When a package
//! directory or the root package.json has pending changes: stage all,
//! commit (hooks bypassed), tag, push.

use crate::core::context::ReleaseContext;
use crate::core::error::RailResult;
use crate::manifest::MANIFEST_FILE;
use crate::release::{FinalizeOutcome, TagCommitter, default_commit_message};
use crate::utils::repo_relative;

/// Run the commit command
pub fn run_commit(ctx: &ReleaseContext, message: Option<String>) -> RailResult<()> {
  let graph = ctx.load_graph()?;
  let root = ctx.root_package()?;

  let mut scope: Vec<String> = graph
    .nodes()
    .iter()
    .filter_map(|node| repo_relative(&ctx.root, &node.dir))
    .collect();
  scope.push(MANIFEST_FILE.to_string());

  let committer = TagCommitter::new(&ctx.git, &ctx.config.release.remote).scoped(scope);
  let pending = committer.pending_changes()?;
  if pending.is_empty() {
    println!("📝 No package changes detected, skipping commit");
    return Ok(());
  }

  let message = message.unwrap_or_else(|| {
    default_commit_message(graph.nodes().iter().map(|n| (n.name.as_str(), n.version.as_str())))
  });

  println!("🚀 Committing...");
  println!();
  println!("Files to commit:");
  for entry in &pending {
    println!("  {} {}", entry.code, entry.path);
  }
  println!();

  match committer.finalize(&root, &message)? {
    FinalizeOutcome::NoChanges => println!("📝 No package changes detected, skipping commit"),
    FinalizeOutcome::Tagged { tag } => {
      println!("📌 Created tag: {}", tag);
      println!("📤 Pushed to {}", ctx.config.release.remote);
      println!("✨ Commit complete");
    }
  }

  Ok(())
}
