//! npm registry lookups (published versions of a package)

use crate::core::config::RegistryConfig;
use crate::core::error::{RailError, RailResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The slice of a registry packument we read
#[derive(Debug, Deserialize)]
struct Packument {
  #[serde(default, rename = "dist-tags")]
  dist_tags: BTreeMap<String, String>,
  #[serde(default)]
  versions: BTreeMap<String, serde_json::Value>,
}

/// Latest and most recent published versions of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedVersions {
  pub name: String,
  /// `dist-tags.latest`
  pub latest: Option<String>,
  /// Newest first
  pub versions: Vec<String>,
}

/// Parse a packument, keeping the `limit` highest semver versions.
///
/// Entries that are not valid semver are dropped.
pub fn parse_packument(name: &str, json: &str, limit: usize) -> RailResult<PublishedVersions> {
  let packument: Packument = serde_json::from_str(json)?;

  let mut versions: Vec<semver::Version> = packument
    .versions
    .keys()
    .filter_map(|v| match semver::Version::parse(v) {
      Ok(version) => Some(version),
      Err(e) => {
        tracing::debug!("ignoring version '{}' of {}: {}", v, name, e);
        None
      }
    })
    .collect();
  versions.sort_unstable_by(|a, b| b.cmp(a));
  versions.truncate(limit);

  Ok(PublishedVersions {
    name: name.to_string(),
    latest: packument.dist_tags.get("latest").cloned(),
    versions: versions.iter().map(ToString::to_string).collect(),
  })
}

/// Blocking client for an npm-compatible registry
pub struct RegistryClient {
  base_url: String,
  client: reqwest::blocking::Client,
}

impl RegistryClient {
  pub fn new(config: &RegistryConfig) -> RailResult<Self> {
    let client = reqwest::blocking::Client::builder()
      .user_agent(concat!("release-rail/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self {
      base_url: config.url.trim_end_matches('/').to_string(),
      client,
    })
  }

  /// Packument URL; scoped names keep their `@` and escape the `/`
  pub fn packument_url(&self, name: &str) -> String {
    format!("{}/{}", self.base_url, name.replace('/', "%2F"))
  }

  pub fn versions(&self, name: &str, limit: usize) -> RailResult<PublishedVersions> {
    let url = self.packument_url(name);
    tracing::debug!("GET {}", url);

    let response = self
      .client
      .get(&url)
      .header("Accept", "application/json")
      .send()
      .with_context(|| format!("Failed to query {}", url))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
      return Err(RailError::with_help(
        format!("Package '{}' is not published on {}", name, self.base_url),
        "Check the package name, or set `registry.url` in rail.toml for a private registry.",
      ));
    }
    if !response.status().is_success() {
      return Err(RailError::message(format!(
        "Registry request to {} failed: HTTP {}",
        url,
        response.status()
      )));
    }

    let body = response.text().context("Failed to read registry response body")?;
    parse_packument(name, &body, limit)
  }
}
