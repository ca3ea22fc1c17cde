// src/config/groups.rs

//! Dependency groups and their resolution to first-level modules.

use std::fmt;

use tracing::debug;

use crate::config::model::ProjectFile;
use crate::errors::{DevsyncError, Result};
use crate::module::resolver::ARCHIVE_KIND;
use crate::module::{Artifact, ModuleDependency};

/// The two declared dependency groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyGroup {
    /// Modules whose class changes need a restart.
    Restart,
    /// Modules whose resources can be reloaded live.
    Reload,
}

impl DependencyGroup {
    pub fn name(self) -> &'static str {
        match self {
            DependencyGroup::Restart => "restart",
            DependencyGroup::Reload => "reload",
        }
    }
}

impl fmt::Display for DependencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-side dependency resolution.
///
/// Implementations return only the first-level module dependencies of a
/// group; transitive dependencies are never synthesized into operations.
pub trait DependencyResolver {
    fn first_level(&self, group: DependencyGroup) -> Result<Vec<ModuleDependency>>;
}

impl DependencyResolver for ProjectFile {
    fn first_level(&self, group: DependencyGroup) -> Result<Vec<ModuleDependency>> {
        let names = match group {
            DependencyGroup::Restart => &self.dependencies().restart,
            DependencyGroup::Reload => &self.dependencies().reload,
        };

        let mut resolved = Vec::with_capacity(names.len());
        for name in names {
            let module = self.modules().get(name).ok_or_else(|| {
                DevsyncError::ConfigError(format!(
                    "dependency group '{group}' refers to unknown module '{name}'"
                ))
            })?;

            let artifacts = match &module.artifacts {
                Some(list) => list
                    .iter()
                    .map(|a| Artifact::new(a.kind.clone(), self.in_project(&a.path)))
                    .collect(),
                None => {
                    let jar = self
                        .in_project(&module.root)
                        .join("build")
                        .join("libs")
                        .join(format!("{name}.{ARCHIVE_KIND}"));
                    vec![Artifact::new(ARCHIVE_KIND, jar)]
                }
            };

            debug!(%group, module = %name, artifacts = artifacts.len(), "resolved first-level dependency");
            resolved.push(ModuleDependency {
                name: name.clone(),
                artifacts,
            });
        }
        Ok(resolved)
    }
}
