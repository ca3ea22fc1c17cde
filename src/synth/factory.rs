// src/synth/factory.rs

use tracing::debug;

use crate::errors::Result;
use crate::graph::{OperationBuilder, OperationKind, OperationNode, StepPath};
use crate::module::{ModuleConfig, ModuleDependency, ModuleRegistry, ResolvedModule, resolve};
use crate::synth::{
    MODULE_CLASSES_OUTPUT, MODULE_RESOURCES_OUTPUT, ProjectLayout, RELOAD_TASK_NAME,
    RESOURCE_INCLUDES, RESTART_TASK_NAME,
};

/// Builds the per-module sync operations.
///
/// Each call returns one new node named after the module's display name, so
/// calling it twice for the same module in one pass yields a name collision
/// when the nodes are registered.
#[derive(Debug, Clone, Copy)]
pub struct OperationFactory<'a> {
    layout: &'a ProjectLayout,
    modules: &'a ModuleRegistry,
}

impl<'a> OperationFactory<'a> {
    pub fn new(layout: &'a ProjectLayout, modules: &'a ModuleRegistry) -> Self {
        Self { layout, modules }
    }

    /// `restart-<module>`: copy the module's compiled classes into the
    /// project's classes output once the module's classes producer ran.
    pub fn classes_sync(&self, dependency: &ModuleDependency) -> Result<OperationNode> {
        let module = resolve(dependency, &self.layout.root)?;
        let config = self.modules.lookup(&module.id);

        let builder = OperationNode::builder(
            format!("{RESTART_TASK_NAME}-{}", module.name),
            OperationKind::Copy,
        )
        .copy_from(module.root.join(MODULE_CLASSES_OUTPUT))
        .copy_into(self.layout.classes_dir())
        .depends_on_step(StepPath::in_module(
            module.id.clone(),
            config.classes_task(),
        ));

        let node = with_reload_task(builder, &module, &config).build();
        log_node(&module, &config, &node);
        Ok(node)
    }

    /// `reload-<module>`: copy the live-reloadable part of the module's
    /// processed resources once the module's resources producer ran.
    pub fn resources_sync(&self, dependency: &ModuleDependency) -> Result<OperationNode> {
        let module = resolve(dependency, &self.layout.root)?;
        let config = self.modules.lookup(&module.id);

        let builder = RESOURCE_INCLUDES.iter().fold(
            OperationNode::builder(
                format!("{RELOAD_TASK_NAME}-{}", module.name),
                OperationKind::Copy,
            )
            .copy_from(module.root.join(MODULE_RESOURCES_OUTPUT))
            .copy_into(self.layout.resources_dir()),
            |b, pattern| b.include(*pattern),
        );

        let builder = builder.depends_on_step(StepPath::in_module(
            module.id.clone(),
            config.resources_task(),
        ));

        let node = with_reload_task(builder, &module, &config).build();
        log_node(&module, &config, &node);
        Ok(node)
    }
}

/// The configured extra step runs before the module is synced in either
/// direction.
fn with_reload_task(
    builder: OperationBuilder,
    module: &ResolvedModule,
    config: &ModuleConfig,
) -> OperationBuilder {
    match &config.reload_task {
        Some(task) => builder.depends_on_step(StepPath::in_module(module.id.clone(), task.clone())),
        None => builder,
    }
}

fn log_node(module: &ResolvedModule, config: &ModuleConfig, node: &OperationNode) {
    debug!(
        operation = %node.name(),
        module = %module.id,
        config = %config.name,
        upstream = ?node.upstream().iter().map(|u| u.to_string()).collect::<Vec<_>>(),
        "built module sync operation"
    );
}
