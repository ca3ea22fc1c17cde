// src/synth/aggregate.rs

use std::path::PathBuf;

use crate::graph::{OperationKind, OperationNode, StepPath};
use crate::module::registry::{DEFAULT_CLASSES_TASK, DEFAULT_RESOURCES_TASK};
use crate::synth::{RELOAD_TASK_NAME, RESTART_TASK_NAME};

/// Builds the two top-level operations, both of which end by touching the
/// marker file.
#[derive(Debug, Clone)]
pub struct AggregateBuilder {
    marker: PathBuf,
}

impl AggregateBuilder {
    pub fn new(marker: impl Into<PathBuf>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// `reload`: the project's own resource processing plus every module
    /// resource sync.
    pub fn reload(&self, resource_syncs: &[OperationNode]) -> OperationNode {
        resource_syncs
            .iter()
            .fold(
                OperationNode::builder(RELOAD_TASK_NAME, OperationKind::Aggregate)
                    .depends_on_step(StepPath::local(DEFAULT_RESOURCES_TASK)),
                |b, node| b.depends_on_operation(node.name()),
            )
            .touches(&self.marker)
            .build()
    }

    /// `restart`: the project's own compile step, the reload aggregate and
    /// every module class sync.
    pub fn restart(&self, reload: &OperationNode, class_syncs: &[OperationNode]) -> OperationNode {
        class_syncs
            .iter()
            .fold(
                OperationNode::builder(RESTART_TASK_NAME, OperationKind::CompileShortcut)
                    .depends_on_step(StepPath::local(DEFAULT_CLASSES_TASK))
                    .depends_on_operation(reload.name()),
                |b, node| b.depends_on_operation(node.name()),
            )
            .touches(&self.marker)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn copy(name: &str) -> OperationNode {
        OperationNode::builder(name, OperationKind::Copy).build()
    }

    #[test]
    fn reload_depends_on_resource_processing_and_syncs() {
        let builder = AggregateBuilder::new("/p/build/.triggerFile");
        let reload = builder.reload(&[copy("reload-M1"), copy("reload-M2")]);

        assert_eq!(reload.name(), "reload");
        assert_eq!(reload.kind(), OperationKind::Aggregate);
        assert!(reload.depends_on_step(&StepPath::local("processResources")));
        assert!(reload.depends_on_operation("reload-M1"));
        assert!(reload.depends_on_operation("reload-M2"));
        assert_eq!(reload.upstream().len(), 3);
        assert_eq!(reload.marker(), Some(Path::new("/p/build/.triggerFile")));
    }

    #[test]
    fn restart_depends_on_compile_reload_and_class_syncs() {
        let builder = AggregateBuilder::new("/p/build/.triggerFile");
        let reload = builder.reload(&[]);
        let restart = builder.restart(&reload, &[copy("restart-M1")]);

        assert_eq!(restart.name(), "restart");
        assert!(restart.depends_on_step(&StepPath::local("classes")));
        assert!(restart.depends_on_operation("reload"));
        assert!(restart.depends_on_operation("restart-M1"));
        assert_eq!(restart.upstream().len(), 3);
        assert_eq!(restart.marker(), reload.marker());
    }
}
