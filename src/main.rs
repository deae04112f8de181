mod commands;
mod core;
mod graph;
mod manifest;
mod registry;
mod release;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{RailError, print_error};
use tracing_subscriber::EnvFilter;

/// Release the packages of a monorepo in dependency order
#[derive(Parser)]
#[command(name = "release-rail")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Show debug logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Releasing
  // ============================================================================
  /// Publish changed packages in dependency order, then commit, tag and push
  Run {
    /// Commit message for the release commit (default: chore: release <name>-v<version> ...)
    message: Option<String>,
    /// Show the plan without publishing or tagging
    #[arg(long)]
    dry_run: bool,
  },

  /// Show publish order, dependency layers and changed packages
  Plan {
    /// Output the plan in JSON format (useful for CI/automation)
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Check-in
  // ============================================================================
  /// Commit pending package changes, tag and push
  Commit {
    /// Commit message (default: chore: release <name>-v<version> ...)
    message: Option<String>,
  },

  /// Tag unpushed commits and push branch and tag
  Tag,

  // ============================================================================
  // Registry
  // ============================================================================
  /// List published versions of a package
  Versions {
    /// Package name as published (e.g. @scope/name)
    package: String,
    /// How many versions to list (default: registry.versions_limit)
    #[arg(short, long)]
    limit: Option<usize>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("release_rail=debug")
    } else {
      EnvFilter::new("release_rail=warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .without_time()
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let current_dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(RailError::from(e).context("Failed to get current directory")),
  };

  // Registry lookups need no repository
  if let Commands::Versions { package, limit, json } = &cli.command {
    if let Err(err) = commands::run_versions(&current_dir, package, *limit, *json) {
      handle_error(err);
    }
    return;
  }

  // Build release context once (repository root, config, git backend)
  let ctx = match core::context::ReleaseContext::build(&current_dir) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Run { message, dry_run } => commands::run_release(&ctx, message, dry_run),
    Commands::Plan { json } => commands::run_plan(&ctx, json),
    Commands::Commit { message } => commands::run_commit(&ctx, message),
    Commands::Tag => commands::run_tag(&ctx),
    Commands::Versions { .. } => Ok(()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: RailError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
