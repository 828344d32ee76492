//! Job dependency graph for pipewright.
//!
//! Derives a directed graph from each job's `needs` declarations to validate
//! referential integrity, detect cycles, and produce a deterministic
//! execution order for documentation and visualization.
//!
//! # Example
//!
//! ```ignore
//! use pipewright_graph::DependencyGraph;
//!
//! let graph = DependencyGraph::from_pipeline(&pipeline)?;
//! assert!(!graph.has_cycle());
//! let order = graph.topological_order()?;
//! ```

mod error;
mod graph;

pub use error::{Error, Result};
pub use graph::DependencyGraph;
