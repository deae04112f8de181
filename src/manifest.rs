//! package.json manifest reading
//!
//! Reads the declared name, version and dependency names of one package
//! directory. A directory without a manifest is not an error: partially
//! initialized package directories are a normal state in a monorepo.

use crate::core::config::KNOWN_DEPENDENCY_TYPES;
use crate::core::error::{ManifestError, RailError, RailResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name inside every package directory
pub const MANIFEST_FILE: &str = "package.json";

/// Name, version and dependency names declared by one manifest
///
/// Dependencies keep declaration order: configured field order first, then
/// key order within each field. Repeats keep their first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
  pub name: String,
  pub version: String,
  pub dependencies: Vec<String>,
}

impl PackageDescriptor {
  /// A descriptor without a name cannot be released or depended on
  pub fn is_valid(&self) -> bool {
    !self.name.trim().is_empty()
  }
}

/// Source of package descriptors
pub trait ManifestReader: Sync {
  /// Read the manifest in `dir`; `Ok(None)` when there is none
  fn read(&self, dir: &Path) -> RailResult<Option<PackageDescriptor>>;
}

/// package.json structure (minimal fields we care about)
#[derive(Debug, Deserialize)]
struct PackageJson {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  version: Option<String>,
  #[serde(default)]
  dependencies: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  #[serde(rename = "devDependencies")]
  dev_dependencies: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  #[serde(rename = "peerDependencies")]
  peer_dependencies: serde_json::Map<String, serde_json::Value>,
}

impl PackageJson {
  fn dependencies_of_type(&self, dep_type: &str) -> Option<&serde_json::Map<String, serde_json::Value>> {
    match dep_type {
      "dependencies" => Some(&self.dependencies),
      "devDependencies" => Some(&self.dev_dependencies),
      "peerDependencies" => Some(&self.peer_dependencies),
      _ => None,
    }
  }
}

/// Reads `package.json`, collecting dependencies from the configured fields
pub struct PackageJsonReader {
  dependency_types: Vec<String>,
}

impl PackageJsonReader {
  pub fn new(dependency_types: &[String]) -> Self {
    Self {
      dependency_types: dependency_types.to_vec(),
    }
  }

  /// Parse manifest text
  pub fn parse(&self, content: &str) -> Result<PackageDescriptor, serde_json::Error> {
    let pkg: PackageJson = serde_json::from_str(content)?;

    let mut dependencies: Vec<String> = Vec::new();
    for dep_type in &self.dependency_types {
      let Some(deps) = pkg.dependencies_of_type(dep_type) else {
        continue;
      };
      for dep in deps.keys() {
        if !dependencies.contains(dep) {
          dependencies.push(dep.clone());
        }
      }
    }

    Ok(PackageDescriptor {
      name: pkg.name.unwrap_or_default(),
      version: pkg.version.unwrap_or_default(),
      dependencies,
    })
  }
}

impl Default for PackageJsonReader {
  fn default() -> Self {
    Self {
      dependency_types: KNOWN_DEPENDENCY_TYPES.iter().map(|t| t.to_string()).collect(),
    }
  }
}

impl ManifestReader for PackageJsonReader {
  fn read(&self, dir: &Path) -> RailResult<Option<PackageDescriptor>> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
      tracing::debug!("no {} in {}, skipping", MANIFEST_FILE, dir.display());
      return Ok(None);
    }

    let content =
      fs::read_to_string(&manifest_path).with_context(|| format!("Failed to read {}", manifest_path.display()))?;

    self.parse(&content).map(Some).map_err(|e| {
      RailError::Manifest(ManifestError::Parse {
        path: manifest_path,
        reason: e.to_string(),
      })
    })
  }
}

/// Immediate sub-directories of the packages root, sorted by name
///
/// A missing packages root yields no directories.
pub fn discover_package_dirs(packages_dir: &Path) -> RailResult<Vec<PathBuf>> {
  if !packages_dir.is_dir() {
    tracing::debug!("packages root {} does not exist", packages_dir.display());
    return Ok(Vec::new());
  }

  let mut dirs = Vec::new();
  for entry in fs::read_dir(packages_dir).with_context(|| format!("Failed to list {}", packages_dir.display()))? {
    let path = entry?.path();
    if path.is_dir() {
      dirs.push(path);
    }
  }

  dirs.sort();
  Ok(dirs)
}
