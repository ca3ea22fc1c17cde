// src/graph/mod.rs

//! The operation graph handed to the executing engine.
//!
//! - [`node`] defines [`OperationNode`] and its upstream references.
//! - [`task_graph`] holds registered nodes, enforces unique names and
//!   computes a topological order.

pub mod node;
pub mod task_graph;

pub use node::{OperationBuilder, OperationKind, OperationNode, StepPath, Upstream};
pub use task_graph::TaskGraph;
