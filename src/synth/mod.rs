// src/synth/mod.rs

//! Graph synthesis: from the two dependency groups to a registered set of
//! operations.
//!
//! - [`factory`] builds one copy operation per module and direction.
//! - [`aggregate`] builds the `reload` / `restart` aggregates.
//!
//! [`synthesize_into`] is the entry point. It builds every node first and
//! registers them only once all of them were built, so a configuration
//! error leaves the target graph untouched.

pub mod aggregate;
pub mod factory;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::groups::{DependencyGroup, DependencyResolver};
use crate::config::{DevtoolsSettings, ProjectFile};
use crate::errors::{DevsyncError, Result};
use crate::graph::{OperationNode, TaskGraph};

pub use aggregate::AggregateBuilder;
pub use factory::OperationFactory;

pub const RESTART_TASK_NAME: &str = "restart";
pub const RELOAD_TASK_NAME: &str = "reload";

/// Resource folders that devtools reloads without a restart. Only these are
/// synced by a module's reload operation.
pub const RESOURCE_INCLUDES: [&str; 6] = [
    "/META-INF/maven/**",
    "/META-INF/resources/**",
    "/resources/**",
    "/static/**",
    "/public/**",
    "/templates/**",
];

/// Compiled classes, relative to a module root.
pub const MODULE_CLASSES_OUTPUT: &str = "build/classes";

/// Processed resources, relative to a module root.
pub const MODULE_RESOURCES_OUTPUT: &str = "build/resources/main";

/// Where the owning project lives and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Root of the whole multi-module tree; module ids are relative to it.
    pub root: PathBuf,
    /// Build directory of the main module.
    pub build_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            build_dir: build_dir.into(),
        }
    }

    pub fn from_project(project: &ProjectFile) -> Self {
        Self::new(project.project_root(), project.build_dir())
    }

    /// `<build>/classes`
    pub fn classes_dir(&self) -> PathBuf {
        self.build_dir.join("classes")
    }

    /// `<build>/resources/main`
    pub fn resources_dir(&self) -> PathBuf {
        self.build_dir.join("resources").join("main")
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}

/// Synthesize into a fresh graph.
pub fn synthesize(
    resolver: &dyn DependencyResolver,
    layout: &ProjectLayout,
    settings: &DevtoolsSettings,
) -> Result<TaskGraph> {
    let mut graph = TaskGraph::new();
    synthesize_into(&mut graph, resolver, layout, settings)?;
    Ok(graph)
}

/// Synthesize the per-module syncs and both aggregates into `graph`.
pub fn synthesize_into(
    graph: &mut TaskGraph,
    resolver: &dyn DependencyResolver,
    layout: &ProjectLayout,
    settings: &DevtoolsSettings,
) -> Result<()> {
    let factory = OperationFactory::new(layout, settings.modules());

    let resource_syncs = resolver
        .first_level(DependencyGroup::Reload)?
        .iter()
        .map(|dep| factory.resources_sync(dep))
        .collect::<Result<Vec<_>>>()?;

    let class_syncs = resolver
        .first_level(DependencyGroup::Restart)?
        .iter()
        .map(|dep| factory.classes_sync(dep))
        .collect::<Result<Vec<_>>>()?;

    let aggregates = AggregateBuilder::new(settings.marker_path(&layout.build_dir));
    let reload = aggregates.reload(&resource_syncs);
    let restart = aggregates.restart(&reload, &class_syncs);

    let nodes: Vec<OperationNode> = resource_syncs
        .into_iter()
        .chain(class_syncs)
        .chain([reload, restart])
        .collect();

    ensure_names_free(graph, &nodes)?;

    let count = nodes.len();
    let mut candidate = graph.clone();
    for node in nodes {
        candidate.register(node)?;
    }
    candidate.validate()?;
    *graph = candidate;

    info!(
        operations = count,
        marker = ?settings.marker_path(&layout.build_dir),
        "synthesized reload/restart operations"
    );
    Ok(())
}

/// Reject the whole batch if any name is taken, inside the batch or in the
/// graph already.
fn ensure_names_free(graph: &TaskGraph, nodes: &[OperationNode]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for node in nodes {
        if graph.contains(node.name()) || !seen.insert(node.name()) {
            return Err(DevsyncError::DuplicateOperation(node.name().to_string()));
        }
    }
    Ok(())
}
