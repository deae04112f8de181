//! Versions command: published versions of a package on the registry

use crate::core::config::RailConfig;
use crate::core::error::RailResult;
use crate::registry::RegistryClient;
use std::path::Path;

/// Run the versions command
///
/// Needs no git repository; rail.toml is looked up in `dir` for the registry URL.
pub fn run_versions(dir: &Path, package: &str, limit: Option<usize>, json: bool) -> RailResult<()> {
  let config = RailConfig::load(dir)?;
  let limit = limit.unwrap_or(config.registry.versions_limit);

  let published = RegistryClient::new(&config.registry)?.versions(package, limit)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&published)?);
    return Ok(());
  }

  println!("📦 {}", published.name);
  match &published.latest {
    Some(latest) => println!("  latest: {}", latest),
    None => println!("  latest: (none)"),
  }
  if published.versions.is_empty() {
    println!("  no published versions");
  } else {
    println!("  recent versions:");
    for version in &published.versions {
      println!("    {}", version);
    }
  }

  Ok(())
}
