// src/config/mod.rs

//! Project descriptor loading and validation for devsync.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Hold the plugin-wide settings handed to synthesis (`settings.rs`).
//! - Load a descriptor from disk (`loader.rs`).
//! - Validate it into a [`ProjectFile`] (`validate.rs`).
//! - Act as the dependency resolver for the two groups (`groups.rs`).

pub mod groups;
pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ArtifactSection, DependenciesSection, DevtoolsSection, ModuleConfigEntry, ModuleSection,
    ProjectFile, ProjectSection, RawProjectFile,
};
pub use settings::{DEFAULT_TRIGGER_FILE, DevtoolsSettings};
