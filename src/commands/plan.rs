//! Plan command: show what `run` would release, in which order

use crate::core::context::ReleaseContext;
use crate::core::error::{ConfigError, RailError, RailResult};
use crate::core::vcs::Vcs;
use crate::graph::{DependencyGraph, resolve};
use crate::release::{ChangeBase, ChangeDetector, ReleaseMode, ReleasePlan};

/// Graph and plan shared by `plan` and `run`
pub(crate) struct Analysis {
  pub graph: DependencyGraph,
  pub plan: ReleasePlan,
}

/// Build the graph, resolve the publish order and detect changes.
///
/// Applies the cycle policy: warn by default, abort under `fail_on_cycle`.
pub(crate) fn analyze(ctx: &ReleaseContext) -> RailResult<Analysis> {
  let graph = ctx.load_graph()?;
  if graph.is_empty() {
    tracing::warn!("no packages found under {}", ctx.packages_dir().display());
  }
  let order = resolve(&graph);

  if !order.cycle_breaks().is_empty() {
    let cycles = describe_cycles(&graph);
    if ctx.config.release.fail_on_cycle {
      return Err(RailError::Config(ConfigError::DependencyCycle { cycles }));
    }
    for cycle in &cycles {
      tracing::warn!("dependency cycle: {}", cycle);
    }
    eprintln!(
      "⚠️  {} dependency cycle(s) between local packages; publish order is best-effort",
      cycles.len()
    );
  }

  let branch = ctx.git.current_branch()?;
  let mode = ReleaseMode::for_branch(&branch, &ctx.config.release.protected_branches);
  let changes = ChangeDetector::new(&ctx.git, ctx.config.packages_root()).changed_since_last_release(&graph)?;

  let plan = ReleasePlan::new(&graph, &order, &changes, &branch, mode)?;
  Ok(Analysis { graph, plan })
}

/// `a → b → c → a` per cycle
fn describe_cycles(graph: &DependencyGraph) -> Vec<String> {
  graph
    .cycles()
    .into_iter()
    .map(|members| {
      let mut path = members.clone();
      if let Some(first) = members.first() {
        path.push(first.clone());
      }
      path.join(" → ")
    })
    .collect()
}

/// Run the plan command
pub fn run_plan(ctx: &ReleaseContext, json: bool) -> RailResult<()> {
  let analysis = analyze(ctx)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&analysis.plan)?);
  } else {
    print_plan(&analysis.plan);
  }

  Ok(())
}

pub(crate) fn print_plan(plan: &ReleasePlan) {
  let contents = &plan.contents;

  println!("📦 Release plan {}", plan.id);
  println!();
  println!("  Branch:   {} ({})", contents.branch, contents.mode);
  match &contents.base {
    ChangeBase::FirstRelease => println!("  Since:    (no release tag yet, first release)"),
    ChangeBase::Since(tag) => println!("  Since:    {}", tag),
  }
  println!();

  if contents.order.is_empty() {
    println!("⚠️  No packages found");
    return;
  }

  println!("  Publish order:");
  for (i, name) in contents.order.iter().enumerate() {
    let marker = if contents.to_release.contains(name) { "→" } else { " " };
    println!("    {} {:>2}. {}", marker, i + 1, name);
  }
  println!();

  println!("  Layers:");
  for (depth, layer) in contents.layers.iter().enumerate() {
    println!("    {}: {}", depth, layer.join(", "));
  }
  println!();

  for cycle_break in &contents.cycle_breaks {
    println!(
      "  ⚠️  {} → {} ignored (cycle)",
      cycle_break.dependent, cycle_break.dependency
    );
  }

  if contents.to_release.is_empty() {
    println!("✅ Nothing to release");
  } else {
    println!("  {} package(s) to release", contents.to_release.len());
  }
}
