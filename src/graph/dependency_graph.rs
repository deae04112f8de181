//! Local package dependency graph
//!
//! ## Graph Structure
//!
//! - **Keys**: declared package names, in directory scan order
//! - **Values**: dependency names that match the local-package prefix, in
//!   manifest order. A value may name a package with no directory in this
//!   repository; such names never become keys.
//! - **Cycle diagnostics**: petgraph's Tarjan SCC over the key-to-key edges

use crate::core::error::RailResult;
use crate::manifest::{ManifestReader, PackageDescriptor};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// A declared package and its local dependency edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
  pub name: String,
  pub version: String,
  /// Directory the manifest was read from
  pub dir: PathBuf,
  /// Prefix-filtered dependency names
  pub dependencies: Vec<String>,
}

/// Mapping from package name to its in-repo dependency names.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
  nodes: Vec<PackageNode>,
  index: HashMap<String, usize>,
}

impl DependencyGraph {
  /// Read every directory's manifest and keep the local dependency edges.
  ///
  /// Directories without a manifest, or whose manifest has no name, are
  /// skipped. Manifests are read in parallel; keys keep `dirs` order.
  pub fn build(reader: &dyn ManifestReader, prefix: &str, dirs: &[PathBuf]) -> RailResult<Self> {
    let descriptors = dirs
      .par_iter()
      .map(|dir| reader.read(dir).map(|desc| (dir, desc)))
      .collect::<RailResult<Vec<_>>>()?;

    let mut graph = Self::default();
    for (dir, desc) in descriptors {
      match desc {
        Some(desc) if desc.is_valid() => graph.insert(node_from_descriptor(desc, prefix, dir)),
        Some(_) => tracing::debug!("{} has a manifest without a name, skipping", dir.display()),
        None => {}
      }
    }

    tracing::debug!("dependency graph: {} package(s)", graph.len());
    Ok(graph)
  }

  /// Assemble a graph from already-filtered nodes
  pub fn from_nodes(nodes: impl IntoIterator<Item = PackageNode>) -> Self {
    let mut graph = Self::default();
    for node in nodes {
      graph.insert(node);
    }
    graph
  }

  /// Insert a node; a repeated name replaces the value but keeps its key position
  fn insert(&mut self, node: PackageNode) {
    if let Some(&idx) = self.index.get(&node.name) {
      tracing::warn!(
        "package '{}' declared in both {} and {}; using the latter",
        node.name,
        self.nodes[idx].dir.display(),
        node.dir.display()
      );
      self.nodes[idx] = node;
    } else {
      self.index.insert(node.name.clone(), self.nodes.len());
      self.nodes.push(node);
    }
  }

  /// Nodes in key order
  pub fn nodes(&self) -> &[PackageNode] {
    &self.nodes
  }

  /// Package names in key order
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.nodes.iter().map(|n| n.name.as_str())
  }

  pub fn get(&self, name: &str) -> Option<&PackageNode> {
    self.index.get(name).map(|&idx| &self.nodes[idx])
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Dependency names of a package (empty for unknown names)
  pub fn dependencies_of(&self, name: &str) -> &[String] {
    self.get(name).map(|n| n.dependencies.as_slice()).unwrap_or(&[])
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Directory name (last path component) → package name
  pub fn dir_to_name(&self) -> BTreeMap<String, String> {
    self
      .nodes
      .iter()
      .filter_map(|n| {
        let dir_name = n.dir.file_name()?.to_str()?;
        Some((dir_name.to_string(), n.name.clone()))
      })
      .collect()
  }

  /// Strongly connected groups of packages that depend on each other.
  ///
  /// Each cycle lists its members in key order; self-dependencies count.
  pub fn cycles(&self) -> Vec<Vec<String>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let node_idx: Vec<NodeIndex> = (0..self.nodes.len()).map(|i| graph.add_node(i)).collect();

    for (i, node) in self.nodes.iter().enumerate() {
      for dep in &node.dependencies {
        if let Some(&j) = self.index.get(dep) {
          graph.add_edge(node_idx[i], node_idx[j], ());
        }
      }
    }

    let mut cycles: Vec<Vec<usize>> = tarjan_scc(&graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
      .map(|scc| {
        let mut members: Vec<usize> = scc.into_iter().map(|idx| graph[idx]).collect();
        members.sort_unstable();
        members
      })
      .collect();
    cycles.sort();

    cycles
      .into_iter()
      .map(|members| members.into_iter().map(|i| self.nodes[i].name.clone()).collect())
      .collect()
  }
}

fn node_from_descriptor(desc: PackageDescriptor, prefix: &str, dir: &Path) -> PackageNode {
  let dependencies = desc
    .dependencies
    .into_iter()
    .filter(|dep| dep.starts_with(prefix))
    .collect();

  PackageNode {
    name: desc.name,
    version: desc.version,
    dir: dir.to_path_buf(),
    dependencies,
  }
}
