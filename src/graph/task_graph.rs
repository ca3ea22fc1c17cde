// src/graph/task_graph.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::errors::{DevsyncError, Result};
use crate::graph::node::{OperationNode, StepPath};

/// The graph of synthesized operations, keyed by operation name.
///
/// Producer steps referenced by [`StepPath`] are not nodes here; the host
/// engine (or a [`crate::exec::StepRunner`]) is trusted to know them and to
/// fail fast when one is missing. [`TaskGraph::check_steps`] offers the same
/// check up front when the set of known steps is available.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    nodes: BTreeMap<String, OperationNode>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Names are unique within the graph.
    pub fn register(&mut self, node: OperationNode) -> Result<()> {
        if self.nodes.contains_key(node.name()) {
            return Err(DevsyncError::DuplicateOperation(node.name().to_string()));
        }
        debug!(
            operation = %node.name(),
            kind = ?node.kind(),
            upstream = node.upstream().len(),
            "registered operation"
        );
        self.nodes.insert(node.name().to_string(), node);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OperationNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &OperationNode> {
        self.nodes.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every producer step referenced by any node, deduplicated.
    pub fn referenced_steps(&self) -> BTreeSet<&StepPath> {
        self.nodes
            .values()
            .flat_map(|node| node.upstream_steps())
            .collect()
    }

    /// Check that operation references resolve and that there is no cycle.
    pub fn validate(&self) -> Result<()> {
        for node in self.nodes.values() {
            for dep in node.upstream_operations() {
                if !self.nodes.contains_key(dep) {
                    return Err(DevsyncError::ConfigError(format!(
                        "operation '{}' depends on unknown operation '{}'",
                        node.name(),
                        dep
                    )));
                }
            }
        }
        self.topological_order().map(|_| ())
    }

    /// Operation names ordered so that every upstream comes first.
    pub fn topological_order(&self) -> Result<Vec<&str>> {
        // Edge direction: upstream -> dependent.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.nodes.keys() {
            graph.add_node(name.as_str());
        }
        for node in self.nodes.values() {
            for dep in node.upstream_operations() {
                graph.add_edge(dep, node.name(), ());
            }
        }

        toposort(&graph, None).map_err(|cycle| {
            DevsyncError::DagCycle(format!(
                "cycle detected in operation graph involving '{}'",
                cycle.node_id()
            ))
        })
    }

    /// Fail with [`DevsyncError::UnknownStep`] for the first referenced
    /// producer step that is not in `known` (compared by rendered path).
    pub fn check_steps(&self, known: &HashSet<String>) -> Result<()> {
        for step in self.referenced_steps() {
            let rendered = step.to_string();
            if !known.contains(&rendered) {
                return Err(DevsyncError::UnknownStep(rendered));
            }
        }
        Ok(())
    }
}
