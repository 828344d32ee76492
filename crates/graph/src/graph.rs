//! Dependency graph derived from job `needs` edges.
//!
//! The graph is built fresh from a completed [`Pipeline`] each time it is
//! needed and never mutates the pipeline. An edge runs from a predecessor to
//! the job that needs it.

use crate::error::{Error, Result};
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use pipewright_core::Pipeline;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Job-to-job dependency graph.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    name_to_node: HashMap<String, NodeIndex>,
    /// Node indices in job declaration order.
    order: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Derive the graph from a pipeline's `needs` declarations.
    ///
    /// # Errors
    /// Fails with [`Error::MissingDependencies`] listing every `needs` entry
    /// that references an undeclared job.
    pub fn from_pipeline(pipeline: &Pipeline) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut name_to_node = HashMap::new();
        let mut order = Vec::with_capacity(pipeline.jobs().len());

        for key in pipeline.jobs().keys() {
            let node = graph.add_node(key.clone());
            name_to_node.insert(key.clone(), node);
            order.push(node);
        }

        let mut missing = Vec::new();
        for (key, job) in pipeline.jobs() {
            for dep in job.needed_jobs() {
                match name_to_node.get(dep) {
                    Some(&pred) => {
                        graph.add_edge(pred, name_to_node[key], ());
                    }
                    None => missing.push((key.clone(), dep.clone())),
                }
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingDependencies { missing });
        }

        debug!(
            jobs = order.len(),
            edges = graph.edge_count(),
            "derived dependency graph"
        );
        Ok(Self {
            graph,
            name_to_node,
            order,
        })
    }

    /// Direct predecessors of `job`, in edge insertion order.
    #[must_use]
    pub fn predecessors(&self, job: &str) -> Option<Vec<&str>> {
        let &node = self.name_to_node.get(job)?;
        Some(
            self.graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|n| self.graph[n].as_str())
                .collect(),
        )
    }

    /// Whether the `needs` edges form a cycle.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Job names in a valid execution order.
    ///
    /// Jobs with no ordering constraint relative to each other keep their
    /// declaration order, so the result is deterministic for a given
    /// pipeline.
    ///
    /// # Errors
    /// Fails with [`Error::CycleDetected`] if the graph is cyclic.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        if let Some(path) = self.find_cycle() {
            return Err(Error::CycleDetected { path });
        }

        let mut indegree: HashMap<NodeIndex, usize> = self
            .order
            .iter()
            .map(|&n| {
                (
                    n,
                    self.graph
                        .neighbors_directed(n, Direction::Incoming)
                        .count(),
                )
            })
            .collect();

        let mut sorted = Vec::with_capacity(self.order.len());
        let mut emitted: HashSet<NodeIndex> = HashSet::new();

        // Repeatedly take the first declaration-order node whose
        // predecessors are all emitted. Quadratic, but pipelines are small
        // and the tie-break must be the declaration order.
        while sorted.len() < self.order.len() {
            let Some(&next) = self
                .order
                .iter()
                .find(|n| !emitted.contains(n) && indegree[n] == 0)
            else {
                // Unreachable: acyclic graphs always have a zero-indegree
                // node among the remainder.
                return Err(Error::CycleDetected {
                    path: "unresolved ordering".to_string(),
                });
            };

            emitted.insert(next);
            sorted.push(self.graph[next].clone());
            for succ in self.graph.neighbors_directed(next, Direction::Outgoing) {
                if let Some(count) = indegree.get_mut(&succ) {
                    *count -= 1;
                }
            }
        }

        Ok(sorted)
    }

    /// Find one cycle and render it as an `a -> b -> a` path.
    fn find_cycle(&self) -> Option<String> {
        let mut visited = HashSet::new();
        let mut stack = HashSet::new();

        for &node in &self.order {
            if !visited.contains(&node)
                && let Some(path) = self.cycle_from(node, &mut visited, &mut stack)
            {
                return Some(path);
            }
        }
        None
    }

    fn cycle_from(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        stack: &mut HashSet<NodeIndex>,
    ) -> Option<String> {
        visited.insert(node);
        stack.insert(node);

        for succ in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.contains(&succ) {
                if let Some(path) = self.cycle_from(succ, visited, stack) {
                    return Some(format!("{} -> {path}", self.graph[node]));
                }
            } else if stack.contains(&succ) {
                return Some(format!("{} -> {}", self.graph[node], self.graph[succ]));
            }
        }

        stack.remove(&node);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipewright_core::{Job, Pipeline, RunStep};

    fn job(needs: &[&str]) -> Job {
        let job = Job::new("ubuntu-latest")
            .unwrap()
            .step(RunStep::new("true").unwrap());
        if needs.is_empty() {
            job
        } else {
            job.needs(needs.iter().copied())
        }
    }

    fn chain() -> Pipeline {
        Pipeline::builder("ci")
            .job("a", job(&[]))
            .unwrap()
            .job("b", job(&["a"]))
            .unwrap()
            .job("c", job(&["b"]))
            .unwrap()
            .finish()
            .unwrap()
    }

    #[test]
    fn chain_orders_in_dependency_order() {
        let graph = DependencyGraph::from_pipeline(&chain()).unwrap();
        assert!(!graph.has_cycle());
        assert_eq!(graph.topological_order().unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn back_edge_makes_a_cycle() {
        let pipeline = Pipeline::builder("ci")
            .job("a", job(&["c"]))
            .unwrap()
            .job("b", job(&["a"]))
            .unwrap()
            .job("c", job(&["b"]))
            .unwrap()
            .finish()
            .unwrap();

        let graph = DependencyGraph::from_pipeline(&pipeline).unwrap();
        assert!(graph.has_cycle());

        let err = graph.topological_order().unwrap_err();
        assert!(matches!(err, Error::CycleDetected { .. }));
    }

    #[test]
    fn unordered_jobs_keep_declaration_order() {
        let pipeline = Pipeline::builder("ci")
            .job("zeta", job(&[]))
            .unwrap()
            .job("alpha", job(&[]))
            .unwrap()
            .job("final", job(&["zeta", "alpha"]))
            .unwrap()
            .finish()
            .unwrap();

        let graph = DependencyGraph::from_pipeline(&pipeline).unwrap();
        assert_eq!(
            graph.topological_order().unwrap(),
            ["zeta", "alpha", "final"]
        );
    }

    #[test]
    fn missing_needs_are_collected() {
        let pipeline = Pipeline::builder("ci")
            .job("deploy", job(&["build", "test"]))
            .unwrap()
            .finish()
            .unwrap();

        let err = DependencyGraph::from_pipeline(&pipeline).unwrap_err();
        let Error::MissingDependencies { missing } = err else {
            panic!("expected MissingDependencies, got {err:?}");
        };
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0], ("deploy".to_string(), "build".to_string()));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let pipeline = Pipeline::builder("ci")
            .job("a", job(&["a"]))
            .unwrap()
            .finish()
            .unwrap();

        let graph = DependencyGraph::from_pipeline(&pipeline).unwrap();
        assert!(graph.has_cycle());
        let err = graph.topological_order().unwrap_err();
        assert_eq!(
            err,
            Error::CycleDetected {
                path: "a -> a".to_string(),
            }
        );
    }

    #[test]
    fn predecessors_reports_direct_needs() {
        let graph = DependencyGraph::from_pipeline(&chain()).unwrap();
        assert_eq!(graph.predecessors("b").unwrap(), ["a"]);
        assert!(graph.predecessors("a").unwrap().is_empty());
        assert!(graph.predecessors("nope").is_none());
    }
}
