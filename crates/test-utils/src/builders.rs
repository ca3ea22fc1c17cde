#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use devsync::config::{
    ArtifactSection, DependenciesSection, DevtoolsSection, ModuleConfigEntry, ModuleSection,
    ProjectFile, ProjectSection, RawProjectFile,
};
use devsync::errors::Result;

/// Builder for `ProjectFile` to simplify test setup.
///
/// Starts from a project rooted at `/p` whose main module lives in `app`.
pub struct ProjectFileBuilder {
    raw: RawProjectFile,
    base_dir: Option<PathBuf>,
}

impl ProjectFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawProjectFile {
                project: ProjectSection {
                    root: PathBuf::from("/p"),
                    dir: PathBuf::from("app"),
                    build_dir: None,
                    plugins: Vec::new(),
                },
                devtools: DevtoolsSection::default(),
                module: BTreeMap::new(),
                dependencies: DependenciesSection::default(),
                steps: BTreeMap::new(),
            },
            base_dir: None,
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.raw.project.root = root.into();
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.project.dir = dir.into();
        self
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.project.build_dir = Some(dir.into());
        self
    }

    pub fn plugin(mut self, id: &str) -> Self {
        self.raw.project.plugins.push(id.to_string());
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn trigger_file(mut self, name: &str) -> Self {
        self.raw.devtools.trigger_file = name.to_string();
        self
    }

    /// Declare a module publishing the default jar.
    pub fn module(mut self, name: &str, root: impl Into<PathBuf>) -> Self {
        self.raw.module.insert(
            name.to_string(),
            ModuleSection {
                root: root.into(),
                artifacts: None,
            },
        );
        self
    }

    /// Declare a module with explicit `(type, path)` artifacts.
    pub fn module_with_artifacts(
        mut self,
        name: &str,
        root: impl Into<PathBuf>,
        artifacts: &[(&str, &str)],
    ) -> Self {
        let artifacts = artifacts
            .iter()
            .map(|(kind, path)| ArtifactSection {
                kind: kind.to_string(),
                path: PathBuf::from(path),
            })
            .collect();
        self.raw.module.insert(
            name.to_string(),
            ModuleSection {
                root: root.into(),
                artifacts: Some(artifacts),
            },
        );
        self
    }

    pub fn module_config(mut self, entry: ModuleConfigEntry) -> Self {
        self.raw.devtools.modules.push(entry);
        self
    }

    pub fn restart(mut self, module: &str) -> Self {
        self.raw.dependencies.restart.push(module.to_string());
        self
    }

    pub fn reload(mut self, module: &str) -> Self {
        self.raw.dependencies.reload.push(module.to_string());
        self
    }

    /// Add `module` to both groups.
    pub fn both(self, module: &str) -> Self {
        self.restart(module).reload(module)
    }

    pub fn development_only(mut self, coordinate: &str) -> Self {
        self.raw
            .dependencies
            .development_only
            .push(coordinate.to_string());
        self
    }

    pub fn step(mut self, path: &str, cmd: &str) -> Self {
        self.raw.steps.insert(path.to_string(), cmd.to_string());
        self
    }

    pub fn raw(self) -> RawProjectFile {
        self.raw
    }

    pub fn try_build(self) -> Result<ProjectFile> {
        let project = ProjectFile::try_from(self.raw)?;
        Ok(match self.base_dir {
            Some(dir) => project.with_base_dir(dir),
            None => project,
        })
    }

    pub fn build(self) -> ProjectFile {
        self.try_build()
            .expect("Failed to build valid project from builder")
    }
}

impl Default for ProjectFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `[[devtools.modules]]` entries.
pub struct ModuleConfigBuilder {
    entry: ModuleConfigEntry,
}

impl ModuleConfigBuilder {
    pub fn new(dependency: &str) -> Self {
        Self {
            entry: ModuleConfigEntry {
                name: None,
                dependency: dependency.to_string(),
                classes_task: None,
                resources_task: None,
                reload_task: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.entry.name = Some(name.to_string());
        self
    }

    pub fn classes_task(mut self, task: &str) -> Self {
        self.entry.classes_task = Some(task.to_string());
        self
    }

    pub fn resources_task(mut self, task: &str) -> Self {
        self.entry.resources_task = Some(task.to_string());
        self
    }

    pub fn reload_task(mut self, task: &str) -> Self {
        self.entry.reload_task = Some(task.to_string());
        self
    }

    pub fn build(self) -> ModuleConfigEntry {
        self.entry
    }
}
