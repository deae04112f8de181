//! Publish order resolution
//!
//! Depth-first visitation over the graph keys in key order: a package is
//! appended only after every dependency it declares. Two marks per node
//! (in-progress, done) guarantee each name is emitted once. Meeting an
//! in-progress node again means a cycle; that edge is treated as satisfied
//! and recorded in [`PublishOrder::cycle_breaks`].

use super::dependency_graph::DependencyGraph;
use serde::Serialize;
use std::collections::HashMap;

/// A dependency edge ignored to break a cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleBreak {
  pub dependent: String,
  pub dependency: String,
}

/// Package names, dependencies before dependents, each exactly once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishOrder {
  names: Vec<String>,
  cycle_breaks: Vec<CycleBreak>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  InProgress,
  Done,
}

/// Resolve the publish order of every package in `graph`.
///
/// Deterministic for a given graph. Dependencies that are not graph keys
/// are not emitted.
pub fn resolve(graph: &DependencyGraph) -> PublishOrder {
  let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(graph.len());
  let mut order = PublishOrder::default();

  for name in graph.names() {
    if !marks.contains_key(name) {
      visit(graph, name, &mut marks, &mut order);
    }
  }

  order
}

fn visit<'g>(graph: &'g DependencyGraph, name: &'g str, marks: &mut HashMap<&'g str, Mark>, order: &mut PublishOrder) {
  marks.insert(name, Mark::InProgress);

  for dep in graph.dependencies_of(name) {
    match marks.get(dep.as_str()) {
      Some(Mark::Done) => {}
      Some(Mark::InProgress) => {
        tracing::debug!("cycle: {} → {} treated as satisfied", name, dep);
        order.cycle_breaks.push(CycleBreak {
          dependent: name.to_string(),
          dependency: dep.clone(),
        });
      }
      None if graph.contains(dep) => visit(graph, dep, marks, order),
      None => {} // Not declared in this repository
    }
  }

  marks.insert(name, Mark::Done);
  order.names.push(name.to_string());
}

impl PublishOrder {
  /// Names in publish order
  pub fn names(&self) -> &[String] {
    &self.names
  }

  /// Edges ignored to break cycles (empty for acyclic graphs)
  pub fn cycle_breaks(&self) -> &[CycleBreak] {
    &self.cycle_breaks
  }

  /// Group the order into dependency layers.
  ///
  /// A package's layer is one past the deepest layer among dependencies
  /// placed before it, so packages within a layer never depend on each
  /// other. Edges broken for cycles are ignored.
  pub fn layers(&self, graph: &DependencyGraph) -> Vec<Vec<String>> {
    let mut level: HashMap<&str, usize> = HashMap::with_capacity(self.names.len());
    let mut layers: Vec<Vec<String>> = Vec::new();

    for name in &self.names {
      let depth = graph
        .dependencies_of(name)
        .iter()
        .filter_map(|dep| level.get(dep.as_str()))
        .map(|l| l + 1)
        .max()
        .unwrap_or(0);

      level.insert(name, depth);
      if layers.len() <= depth {
        layers.resize_with(depth + 1, Vec::new);
      }
      layers[depth].push(name.clone());
    }

    layers
  }
}
