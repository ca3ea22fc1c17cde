// src/module/resolver.rs

//! Turns a resolved module dependency into a [`ResolvedModule`]: its module
//! root on disk and its canonical [`ModuleId`].
//!
//! Artifacts are expected at `<module-root>/build/libs/<file>.jar`, so the
//! module root is the third ancestor of the archive.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::errors::{DevsyncError, Result};
use crate::module::id::ModuleId;

/// Artifact type tag that carries a module's compiled output.
pub const ARCHIVE_KIND: &str = "jar";

/// Number of directory levels between an archive and its module root.
const ARCHIVE_DEPTH: usize = 3;

/// A file produced by a module, as reported by dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: String,
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
        }
    }
}

/// A first-level module dependency from one of the dependency groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDependency {
    /// Display name; used to name the synthesized operations.
    pub name: String,
    pub artifacts: Vec<Artifact>,
}

/// A dependency whose module root and identifier are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub name: String,
    pub id: ModuleId,
    pub root: PathBuf,
}

/// Resolve a dependency against the project root.
///
/// Fails with [`DevsyncError::MissingArtifact`] when the dependency publishes
/// no `jar`; there is nothing to derive a copy source from in that case.
pub fn resolve(dependency: &ModuleDependency, project_root: &Path) -> Result<ResolvedModule> {
    let archive = dependency
        .artifacts
        .iter()
        .find(|a| a.kind == ARCHIVE_KIND)
        .ok_or_else(|| DevsyncError::MissingArtifact {
            module: dependency.name.clone(),
            kind: ARCHIVE_KIND.to_string(),
        })?;

    let root = module_root_of(&archive.path).ok_or_else(|| {
        DevsyncError::ConfigError(format!(
            "artifact {:?} of module {} is not inside <module>/build/libs",
            archive.path, dependency.name
        ))
    })?;

    let id = module_id_for(&dependency.name, &root, project_root)?;
    debug!(module = %dependency.name, id = %id, root = ?root, "resolved module dependency");

    Ok(ResolvedModule {
        name: dependency.name.clone(),
        id,
        root,
    })
}

/// Module root directory for an archive path.
pub fn module_root_of(archive: &Path) -> Option<PathBuf> {
    let archive = normalize(archive);
    archive
        .ancestors()
        .nth(ARCHIVE_DEPTH)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Identifier of the module rooted at `module_root`.
///
/// Fails with [`DevsyncError::ModuleOutsideProject`] when the root is not
/// below the project root, and with a configuration error naming the module
/// when a directory name cannot appear in a module path.
pub fn module_id_for(module: &str, module_root: &Path, project_root: &Path) -> Result<ModuleId> {
    let module_root = normalize(module_root);
    let project_root = normalize(project_root);

    let rel = module_root
        .strip_prefix(&project_root)
        .ok()
        .filter(|rel| !rel.components().any(|c| c == Component::ParentDir))
        .ok_or_else(|| DevsyncError::ModuleOutsideProject {
            module: module.to_string(),
            root: project_root.clone(),
        })?;

    ModuleId::from_relative_path(rel).map_err(|err| match err {
        DevsyncError::ConfigError(msg) => {
            DevsyncError::ConfigError(format!("module {module}: {msg}"))
        }
        other => other,
    })
}

/// Lexically drop `.` components and fold `..` into their parent.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
