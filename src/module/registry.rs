// src/module/registry.rs

//! Per-module override settings, keyed by [`ModuleId`].

use std::borrow::Cow;
use std::collections::HashMap;

use tracing::debug;

use crate::errors::{DevsyncError, Result};
use crate::module::id::ModuleId;

/// Conventional step that produces a module's compiled classes.
pub const DEFAULT_CLASSES_TASK: &str = "classes";

/// Conventional step that produces a module's processed resources.
pub const DEFAULT_RESOURCES_TASK: &str = "processResources";

/// Name given to configurations synthesized for modules without an entry.
pub const DEFAULT_CONFIG_NAME: &str = "default";

/// Overrides for a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Name of the entry as declared by the user (`"default"` when synthesized).
    pub name: String,
    /// Module this entry applies to.
    pub dependency: ModuleId,
    /// Replaces `classes` as the producer of the module's compiled output.
    pub classes_task: Option<String>,
    /// Replaces `processResources` as the producer of the module's resources.
    pub resources_task: Option<String>,
    /// Extra step run before both the module's reload and restart sync.
    ///
    /// Expected to contribute resources to the module's build output.
    pub reload_task: Option<String>,
}

impl ModuleConfig {
    /// Configuration used for modules without an explicit entry.
    pub fn default_for(dependency: ModuleId) -> Self {
        Self {
            name: DEFAULT_CONFIG_NAME.to_string(),
            dependency,
            classes_task: None,
            resources_task: None,
            reload_task: None,
        }
    }

    pub fn classes_task(&self) -> &str {
        self.classes_task.as_deref().unwrap_or(DEFAULT_CLASSES_TASK)
    }

    pub fn resources_task(&self) -> &str {
        self.resources_task
            .as_deref()
            .unwrap_or(DEFAULT_RESOURCES_TASK)
    }
}

/// Lookup table of module configurations.
///
/// Read-only after construction; share it by reference (or `Arc`) across
/// factory invocations.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    entries: HashMap<ModuleId, ModuleConfig>,
}

impl ModuleRegistry {
    /// Build a registry, rejecting two entries for the same module.
    pub fn new(configs: impl IntoIterator<Item = ModuleConfig>) -> Result<Self> {
        let mut entries = HashMap::new();
        for config in configs {
            let key = config.dependency.clone();
            if let Some(existing) = entries.insert(key.clone(), config) {
                return Err(DevsyncError::DuplicateModuleConfig(format!(
                    "{key} (already declared by '{}')",
                    existing.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Configuration for `id`, or a synthesized default.
    pub fn lookup(&self, id: &ModuleId) -> Cow<'_, ModuleConfig> {
        match self.entries.get(id) {
            Some(config) => Cow::Borrowed(config),
            None => {
                debug!(module = %id, "no module configuration declared; using defaults");
                Cow::Owned(ModuleConfig::default_for(id.clone()))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
