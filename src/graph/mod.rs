//! Local package graph and publish ordering
//!
//! Built on serde_json manifests + petgraph cycle diagnostics. The publish
//! order itself is a plain depth-first walk so that cycles degrade
//! gracefully instead of aborting.

pub mod dependency_graph;
pub mod publish_order;

pub use dependency_graph::{DependencyGraph, PackageNode};
pub use publish_order::{CycleBreak, PublishOrder, resolve};
