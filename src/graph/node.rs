// src/graph/node.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::module::ModuleId;

/// What an operation does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Copy a source tree into a destination, filtered by include globs.
    Copy,
    /// No work of its own; exists to group upstreams and signal the agent.
    Aggregate,
    /// Like [`OperationKind::Aggregate`], but also pulls in the owning
    /// project's compile step.
    CompileShortcut,
}

/// A producer step owned by a module, referenced by name only.
///
/// `module == None` means the owning (main) project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepPath {
    module: Option<ModuleId>,
    step: String,
}

impl StepPath {
    /// A step of the owning project, e.g. `classes`.
    pub fn local(step: impl Into<String>) -> Self {
        Self {
            module: None,
            step: step.into(),
        }
    }

    /// A step of another module, e.g. `:m1:classes`.
    pub fn in_module(module: ModuleId, step: impl Into<String>) -> Self {
        Self {
            module: Some(module),
            step: step.into(),
        }
    }

    pub fn module(&self) -> Option<&ModuleId> {
        self.module.as_ref()
    }

    pub fn step(&self) -> &str {
        &self.step
    }
}

impl fmt::Display for StepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => f.write_str(&module.qualify(&self.step)),
            None => f.write_str(&self.step),
        }
    }
}

/// Something an operation must wait for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Upstream {
    /// Another operation in the same graph.
    Operation(String),
    /// A producer step the host engine knows how to run.
    Step(StepPath),
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::Operation(name) => f.write_str(name),
            Upstream::Step(path) => path.fmt(f),
        }
    }
}

/// One unit of work in the synthesized graph. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationNode {
    name: String,
    kind: OperationKind,
    sources: Vec<PathBuf>,
    destination: Option<PathBuf>,
    includes: Vec<String>,
    upstream: BTreeSet<Upstream>,
    marker: Option<PathBuf>,
}

impl OperationNode {
    pub fn builder(name: impl Into<String>, kind: OperationKind) -> OperationBuilder {
        OperationBuilder {
            node: OperationNode {
                name: name.into(),
                kind,
                sources: Vec::new(),
                destination: None,
                includes: Vec::new(),
                upstream: BTreeSet::new(),
                marker: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Include globs in declaration order. Empty means "everything".
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn upstream(&self) -> &BTreeSet<Upstream> {
        &self.upstream
    }

    /// Marker file touched after the operation's own work.
    pub fn marker(&self) -> Option<&Path> {
        self.marker.as_deref()
    }

    pub fn depends_on_operation(&self, name: &str) -> bool {
        self.upstream
            .contains(&Upstream::Operation(name.to_string()))
    }

    pub fn depends_on_step(&self, step: &StepPath) -> bool {
        self.upstream.contains(&Upstream::Step(step.clone()))
    }

    pub fn upstream_operations(&self) -> impl Iterator<Item = &str> {
        self.upstream.iter().filter_map(|u| match u {
            Upstream::Operation(name) => Some(name.as_str()),
            Upstream::Step(_) => None,
        })
    }

    pub fn upstream_steps(&self) -> impl Iterator<Item = &StepPath> {
        self.upstream.iter().filter_map(|u| match u {
            Upstream::Step(path) => Some(path),
            Upstream::Operation(_) => None,
        })
    }
}

/// Builder for [`OperationNode`].
#[derive(Debug)]
pub struct OperationBuilder {
    node: OperationNode,
}

impl OperationBuilder {
    pub fn copy_from(mut self, source: impl Into<PathBuf>) -> Self {
        self.node.sources.push(source.into());
        self
    }

    pub fn copy_into(mut self, destination: impl Into<PathBuf>) -> Self {
        self.node.destination = Some(destination.into());
        self
    }

    /// Add an include glob; duplicates keep their first position.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.node.includes.contains(&pattern) {
            self.node.includes.push(pattern);
        }
        self
    }

    pub fn depends_on(mut self, upstream: Upstream) -> Self {
        self.node.upstream.insert(upstream);
        self
    }

    pub fn depends_on_step(self, step: StepPath) -> Self {
        self.depends_on(Upstream::Step(step))
    }

    pub fn depends_on_operation(self, name: impl Into<String>) -> Self {
        self.depends_on(Upstream::Operation(name.into()))
    }

    pub fn touches(mut self, marker: impl Into<PathBuf>) -> Self {
        self.node.marker = Some(marker.into());
        self
    }

    pub fn build(self) -> OperationNode {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_paths_render_like_task_paths() {
        let id: ModuleId = ":modules:m1".parse().unwrap();
        assert_eq!(StepPath::in_module(id, "classes").to_string(), ":modules:m1:classes");
        assert_eq!(StepPath::local("classes").to_string(), "classes");
    }

    #[test]
    fn includes_keep_order_and_drop_duplicates() {
        let node = OperationNode::builder("copy", OperationKind::Copy)
            .include("/static/**")
            .include("/public/**")
            .include("/static/**")
            .build();
        assert_eq!(node.includes(), ["/static/**", "/public/**"]);
    }
}
