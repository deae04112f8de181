use crate::core::error::{ConfigError, RailError, RailResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Manifest fields whose entries count as dependencies
pub const KNOWN_DEPENDENCY_TYPES: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// Configuration for release-rail
/// Searched in order: rail.toml, .rail.toml, .config/rail.toml
///
/// Every section is optional; a repository without a config file runs on defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RailConfig {
  #[serde(default)]
  pub workspace: WorkspaceConfig,
  #[serde(default)]
  pub release: ReleaseConfig,
  #[serde(default)]
  pub registry: RegistryConfig,
}

/// Where packages live and which dependencies link them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
  /// Packages root, relative to the repository root (default: "packages")
  #[serde(default = "default_packages_root")]
  pub packages: String,

  /// Only dependencies whose name starts with this prefix become graph edges
  #[serde(default)]
  pub prefix: String,

  /// Manifest fields scanned for dependencies
  #[serde(default = "default_dependency_types")]
  pub dependency_types: Vec<String>,
}

fn default_packages_root() -> String {
  "packages".to_string()
}

fn default_dependency_types() -> Vec<String> {
  KNOWN_DEPENDENCY_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for WorkspaceConfig {
  fn default() -> Self {
    Self {
      packages: default_packages_root(),
      prefix: String::new(),
      dependency_types: default_dependency_types(),
    }
  }
}

/// How packages are published and the release marker pushed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  /// Branches that release in normal mode; every other branch pre-releases
  #[serde(default = "default_protected_branches")]
  pub protected_branches: Vec<String>,

  /// Remote that receives the release commit and tag
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Publish command, run inside each package directory
  #[serde(default = "default_command")]
  pub command: Vec<String>,

  /// Extra arguments appended to `command` for pre-releases
  #[serde(default = "default_prerelease_args")]
  pub prerelease_args: Vec<String>,

  /// Abort before releasing anything when local packages form a cycle
  #[serde(default)]
  pub fail_on_cycle: bool,
}

fn default_protected_branches() -> Vec<String> {
  vec!["main".to_string(), "master".to_string()]
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_command() -> Vec<String> {
  vec!["npm".to_string(), "publish".to_string()]
}

fn default_prerelease_args() -> Vec<String> {
  vec!["--tag".to_string(), "next".to_string()]
}

impl Default for ReleaseConfig {
  fn default() -> Self {
    Self {
      protected_branches: default_protected_branches(),
      remote: default_remote(),
      command: default_command(),
      prerelease_args: default_prerelease_args(),
      fail_on_cycle: false,
    }
  }
}

/// npm-compatible registry used for version lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
  #[serde(default = "default_registry_url")]
  pub url: String,

  /// How many published versions `versions` lists by default
  #[serde(default = "default_versions_limit")]
  pub versions_limit: usize,
}

fn default_registry_url() -> String {
  "https://registry.npmjs.org".to_string()
}

fn default_versions_limit() -> usize {
  10
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      url: default_registry_url(),
      versions_limit: default_versions_limit(),
    }
  }
}

impl RailConfig {
  /// Find config file in search order: rail.toml, .rail.toml, .config/rail.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("rail.toml"),
      path.join(".rail.toml"),
      path.join(".config").join("rail.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config, falling back to defaults when no file exists
  pub fn load(path: &Path) -> RailResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!("no rail.toml under {}, using defaults", path.display());
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    tracing::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> RailResult<Self> {
    let mut config: RailConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    config.workspace.packages = normalize_root(&config.workspace.packages);
    Ok(config)
  }

  /// Reject values that would make a release run misbehave
  pub fn validate(&self) -> RailResult<()> {
    let packages = Path::new(&self.workspace.packages);
    if packages.has_root() {
      return Err(invalid("workspace.packages", "must be relative to the repository root"));
    }
    if packages.components().any(|c| c == Component::ParentDir) {
      return Err(invalid("workspace.packages", "must stay inside the repository ('..' is not allowed)"));
    }
    if normalize_root(&self.workspace.packages).is_empty() {
      return Err(invalid("workspace.packages", "must name a directory"));
    }

    for dep_type in &self.workspace.dependency_types {
      if !KNOWN_DEPENDENCY_TYPES.contains(&dep_type.as_str()) {
        return Err(invalid(
          "workspace.dependency_types",
          &format!(
            "unknown dependency type '{}' (expected one of: {})",
            dep_type,
            KNOWN_DEPENDENCY_TYPES.join(", ")
          ),
        ));
      }
    }

    if self.release.command.first().is_none_or(|program| program.trim().is_empty()) {
      return Err(invalid("release.command", "must contain at least a program name"));
    }
    if self.release.remote.trim().is_empty() {
      return Err(invalid("release.remote", "must not be empty"));
    }
    if self.registry.url.trim().is_empty() {
      return Err(invalid("registry.url", "must not be empty"));
    }

    Ok(())
  }

  /// Packages root in the form git reports paths (`packages`, `libs/js`)
  pub fn packages_root(&self) -> &str {
    self.workspace.packages.trim_matches('/')
  }
}

/// `./packages/` and `packages//` both become `packages`
fn normalize_root(raw: &str) -> String {
  Path::new(raw)
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => part.to_str(),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}

fn invalid(field: &str, reason: &str) -> RailError {
  RailError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
