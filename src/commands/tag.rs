//! Tag command: tag unpushed commits and push them with the tag

use crate::core::context::ReleaseContext;
use crate::core::error::RailResult;
use crate::release::{FinalizeOutcome, TagCommitter};

/// Run the tag command
pub fn run_tag(ctx: &ReleaseContext) -> RailResult<()> {
  let root = ctx.root_package()?;

  match TagCommitter::new(&ctx.git, &ctx.config.release.remote).tag_unpushed(&root)? {
    FinalizeOutcome::NoChanges => println!("📝 No unpushed commits, nothing to tag"),
    FinalizeOutcome::Tagged { tag } => {
      println!("📌 Created tag: {}", tag);
      println!("📤 Pushed to {}", ctx.config.release.remote);
    }
  }

  Ok(())
}
