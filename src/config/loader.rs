// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Load a descriptor from a given path and return the raw `RawProjectFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let project: RawProjectFile = toml::from_str(&contents)?;

    Ok(project)
}

/// Load a descriptor from path and validate it.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks dependency groups, module configuration keys and step names.
/// - Resolves relative paths against the descriptor's own directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let project = ProjectFile::try_from(raw)?.with_base_dir(descriptor_dir(path));
    Ok(project)
}

/// Default descriptor location: `Devsync.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Devsync.toml")
}

/// Directory containing the descriptor, `.` for a bare file name.
fn descriptor_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
