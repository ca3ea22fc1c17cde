// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::settings::{DEFAULT_TRIGGER_FILE, DevtoolsSettings};

/// Project descriptor as read from a TOML file.
///
/// ```toml
/// [project]
/// root = "."
/// dir = "app"
/// plugins = ["org.springframework.boot"]
///
/// [devtools]
/// trigger_file = ".triggerFile"
///
/// [[devtools.modules]]
/// dependency = ":module1"
/// reload_task = "customProcessResources"
///
/// [module.module1]
/// root = "module1"
///
/// [dependencies]
/// restart = ["module1"]
/// reload = ["module1"]
///
/// [steps]
/// "classes" = "./gradlew -q :app:classes"
/// ```
///
/// This is the raw, unvalidated form. Convert it into a [`ProjectFile`]
/// with `ProjectFile::try_from` (see `config::validate`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectFile {
    /// Location of the project and its main module, from `[project]`.
    pub project: ProjectSection,

    /// Plugin-wide settings from `[devtools]`.
    #[serde(default)]
    pub devtools: DevtoolsSection,

    /// Modules the dependency groups may refer to, from `[module.<name>]`.
    ///
    /// Keys are the module display names.
    #[serde(default)]
    pub module: BTreeMap<String, ModuleSection>,

    /// Declared dependency groups from `[dependencies]`.
    #[serde(default)]
    pub dependencies: DependenciesSection,

    /// Shell commands for producer steps, keyed by step path
    /// (`"classes"`, `":module1:classes"`).
    #[serde(default)]
    pub steps: BTreeMap<String, String>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Project root, relative to the descriptor's directory.
    #[serde(default = "default_dir")]
    pub root: PathBuf,

    /// Main module directory, relative to the project root.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Build output directory of the main module, relative to the project
    /// root. Defaults to `<dir>/build`.
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Ids of build plugins applied to the main module.
    #[serde(default)]
    pub plugins: Vec<String>,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `[devtools]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DevtoolsSection {
    /// Name of the marker file created in the build directory.
    ///
    /// Use the same name for `spring.devtools.restart.trigger-file` in the
    /// application's configuration.
    #[serde(default = "default_trigger_file")]
    pub trigger_file: String,

    /// Per-module overrides (`[[devtools.modules]]`).
    #[serde(default)]
    pub modules: Vec<ModuleConfigEntry>,
}

fn default_trigger_file() -> String {
    DEFAULT_TRIGGER_FILE.to_string()
}

impl Default for DevtoolsSection {
    fn default() -> Self {
        Self {
            trigger_file: default_trigger_file(),
            modules: Vec::new(),
        }
    }
}

/// One `[[devtools.modules]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleConfigEntry {
    /// Optional label; defaults to the dependency path.
    #[serde(default)]
    pub name: Option<String>,

    /// Module path this entry applies to, as written in build files
    /// (e.g. `":common:logging"` for the module in `common/logging`).
    pub dependency: String,

    #[serde(default)]
    pub classes_task: Option<String>,

    #[serde(default)]
    pub resources_task: Option<String>,

    /// Additional step to run before syncing this module.
    #[serde(default)]
    pub reload_task: Option<String>,
}

/// `[module.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSection {
    /// Module root directory, relative to the project root.
    pub root: PathBuf,

    /// Published artifacts. When omitted the module publishes a single jar
    /// at `<root>/build/libs/<name>.jar`.
    #[serde(default)]
    pub artifacts: Option<Vec<ArtifactSection>>,
}

/// An entry of `artifacts = [...]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSection {
    #[serde(rename = "type")]
    pub kind: String,

    /// Path relative to the project root.
    pub path: PathBuf,
}

/// `[dependencies]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependenciesSection {
    /// Modules whose class changes require a restart.
    #[serde(default)]
    pub restart: Vec<String>,

    /// Modules whose resources can be live-reloaded.
    #[serde(default)]
    pub reload: Vec<String>,

    /// Development-only dependency coordinates (`group:name[:version]`).
    #[serde(default, alias = "developmentOnly")]
    pub development_only: Vec<String>,
}

/// Validated project descriptor.
///
/// Construct via `ProjectFile::try_from(raw)`; the loader additionally sets
/// the directory relative paths are resolved against.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    base_dir: PathBuf,
    project: ProjectSection,
    settings: DevtoolsSettings,
    modules: BTreeMap<String, ModuleSection>,
    dependencies: DependenciesSection,
    steps: BTreeMap<String, String>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        settings: DevtoolsSettings,
        modules: BTreeMap<String, ModuleSection>,
        dependencies: DependenciesSection,
        steps: BTreeMap<String, String>,
    ) -> Self {
        Self {
            base_dir: PathBuf::from("."),
            project,
            settings,
            modules,
            dependencies,
            steps,
        }
    }

    /// Resolve relative paths against `dir` instead of the working directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn project(&self) -> &ProjectSection {
        &self.project
    }

    pub fn settings(&self) -> &DevtoolsSettings {
        &self.settings
    }

    pub fn modules(&self) -> &BTreeMap<String, ModuleSection> {
        &self.modules
    }

    pub fn dependencies(&self) -> &DependenciesSection {
        &self.dependencies
    }

    pub(crate) fn development_only_mut(&mut self) -> &mut Vec<String> {
        &mut self.dependencies.development_only
    }

    pub fn steps(&self) -> &BTreeMap<String, String> {
        &self.steps
    }

    pub fn project_root(&self) -> PathBuf {
        self.base_dir.join(&self.project.root)
    }

    pub fn project_dir(&self) -> PathBuf {
        self.project_root().join(&self.project.dir)
    }

    pub fn build_dir(&self) -> PathBuf {
        match &self.project.build_dir {
            Some(dir) => self.project_root().join(dir),
            None => self.project_dir().join("build"),
        }
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.project.plugins.iter().any(|p| p == id)
    }

    /// Absolute-ish location of a path given relative to the project root.
    pub(crate) fn in_project(&self, rel: &Path) -> PathBuf {
        self.project_root().join(rel)
    }
}
