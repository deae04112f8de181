//! Release context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ReleaseContext::build() -> &ReleaseContext
//!   |
//!   v
//! commands/run.rs, plan.rs, commit.rs, tag.rs:
//!   fn run_*(ctx: &ReleaseContext, ...)
//! ```

use crate::core::config::RailConfig;
use crate::core::error::{ConfigError, RailError, RailResult};
use crate::core::vcs::SystemGit;
use crate::graph::DependencyGraph;
use crate::manifest::{ManifestReader, PackageDescriptor, PackageJsonReader, discover_package_dirs};
use std::path::{Path, PathBuf};

/// Repository-level state shared by every command.
pub struct ReleaseContext {
  /// Repository root (git working tree root)
  pub root: PathBuf,

  /// Release configuration (rail.toml or defaults)
  pub config: RailConfig,

  /// Git backend rooted at `root`
  pub git: SystemGit,
}

impl ReleaseContext {
  /// Build the context from any directory inside the repository.
  ///
  /// The repository root is the git working tree root, so commands behave
  /// the same when invoked from a package sub-directory.
  pub fn build(start_dir: &Path) -> RailResult<Self> {
    let probe = SystemGit::open(start_dir)?;
    let root = probe.work_tree().to_path_buf();
    let git = SystemGit::open(&root)?;
    let config = RailConfig::load(&root)?;

    tracing::debug!("repository root: {}", root.display());
    Ok(Self { root, config, git })
  }

  /// Absolute packages root
  pub fn packages_dir(&self) -> PathBuf {
    self.root.join(self.config.packages_root())
  }

  fn reader(&self) -> PackageJsonReader {
    PackageJsonReader::new(&self.config.workspace.dependency_types)
  }

  /// Scan the packages root and build the local dependency graph
  pub fn load_graph(&self) -> RailResult<DependencyGraph> {
    let dirs = discover_package_dirs(&self.packages_dir())?;
    DependencyGraph::build(&self.reader(), &self.config.workspace.prefix, &dirs)
  }

  /// The repository's own package.json, which names the release tag
  pub fn root_package(&self) -> RailResult<PackageDescriptor> {
    match self.reader().read(&self.root)? {
      Some(desc) if desc.is_valid() && !desc.version.is_empty() => Ok(desc),
      _ => Err(RailError::Config(ConfigError::RootManifestMissing {
        root: self.root.clone(),
      })),
    }
  }
}
