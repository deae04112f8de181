//! Package publishing through an external command

use crate::core::config::ReleaseConfig;
use crate::core::error::{RailError, RailResult, ReleaseError};
use crate::graph::DependencyGraph;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

/// Publishes one package
///
/// Blocking; a returned error means the package was not released.
pub trait Releaser {
  fn release(&mut self, package: &str, prerelease: bool) -> RailResult<()>;
}

/// Runs the configured publish command inside the package directory.
///
/// Pre-releases append `prerelease_args` (default `--tag next`).
pub struct CommandReleaser {
  program: String,
  args: Vec<String>,
  prerelease_args: Vec<String>,
  dirs: HashMap<String, PathBuf>,
}

impl CommandReleaser {
  pub fn new(config: &ReleaseConfig, graph: &DependencyGraph) -> RailResult<Self> {
    let (program, args) = config
      .command
      .split_first()
      .ok_or_else(|| RailError::message("release.command is empty"))?;

    Ok(Self {
      program: program.clone(),
      args: args.to_vec(),
      prerelease_args: config.prerelease_args.clone(),
      dirs: graph.nodes().iter().map(|n| (n.name.clone(), n.dir.clone())).collect(),
    })
  }

  /// Full argument list for one invocation
  fn args_for(&self, prerelease: bool) -> Vec<&str> {
    let mut args: Vec<&str> = self.args.iter().map(String::as_str).collect();
    if prerelease {
      args.extend(self.prerelease_args.iter().map(String::as_str));
    }
    args
  }
}

impl Releaser for CommandReleaser {
  fn release(&mut self, package: &str, prerelease: bool) -> RailResult<()> {
    let dir = self.dirs.get(package).ok_or_else(|| {
      RailError::Release(ReleaseError::PackageFailed {
        package: package.to_string(),
        reason: "no package directory known".to_string(),
      })
    })?;

    let args = self.args_for(prerelease);
    tracing::debug!("{} {} (in {})", self.program, args.join(" "), dir.display());

    let output = Command::new(&self.program)
      .args(&args)
      .current_dir(dir)
      .output()
      .map_err(|e| {
        RailError::Release(ReleaseError::Spawn {
          program: self.program.clone(),
          reason: e.to_string(),
        })
      })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
      tracing::debug!("{}", stdout.trim_end());
    }

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      let reason = if stderr.is_empty() {
        format!("`{}` exited with {}", self.program, output.status)
      } else {
        stderr
      };
      return Err(RailError::Release(ReleaseError::PackageFailed {
        package: package.to_string(),
        reason,
      }));
    }

    Ok(())
  }
}
