// src/config/settings.rs

use std::path::{Path, PathBuf};

use crate::module::ModuleRegistry;

/// Marker file name used when none is configured.
pub const DEFAULT_TRIGGER_FILE: &str = ".triggerFile";

/// Plugin-wide settings: marker file name and the module registry.
///
/// Built once per invocation and passed explicitly into synthesis.
#[derive(Debug, Clone)]
pub struct DevtoolsSettings {
    trigger_file: String,
    modules: ModuleRegistry,
}

impl DevtoolsSettings {
    pub fn new(trigger_file: impl Into<String>, modules: ModuleRegistry) -> Self {
        Self {
            trigger_file: trigger_file.into(),
            modules,
        }
    }

    pub fn trigger_file(&self) -> &str {
        &self.trigger_file
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    /// `<build_dir>/<trigger_file>`.
    pub fn marker_path(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(&self.trigger_file)
    }
}

impl Default for DevtoolsSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_FILE, ModuleRegistry::default())
    }
}
