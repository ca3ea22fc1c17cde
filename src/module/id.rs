// src/module/id.rs

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::DevsyncError;

/// Segment separator used in module paths (`:common:logging`).
pub const SEPARATOR: char = ':';

static MODULE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:([A-Za-z0-9_.\-]+(:[A-Za-z0-9_.\-]+)*)?$").expect("module path regex is valid")
});

/// A single segment; the same character set `MODULE_PATH` accepts.
static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("segment regex is valid"));

/// Canonical identifier of a module inside the project tree.
///
/// Rendered as `:` for the project root and `:a:b` for a module whose root
/// directory is `<project-root>/a/b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    segments: Vec<String>,
}

impl ModuleId {
    /// The identifier of the project root itself.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build an identifier from a module root relative to the project root.
    ///
    /// Fails if the path escapes upwards (`..`), is absolute, or has a
    /// directory name that a module path string could not express. Any id
    /// returned here parses back from its own rendering.
    pub fn from_relative_path(rel: &Path) -> Result<Self, DevsyncError> {
        let mut segments = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_string_lossy();
                    if !SEGMENT.is_match(&part) {
                        return Err(DevsyncError::ConfigError(format!(
                            "directory name '{part}' in {rel:?} is not a valid module path segment"
                        )));
                    }
                    segments.push(part.into_owned());
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(DevsyncError::ConfigError(format!(
                        "module directory {rel:?} is not relative to the project root"
                    )));
                }
            }
        }
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Qualify a step name with this module's path, e.g. `:m1` + `classes`
    /// gives `:m1:classes`. The root module yields `:classes`.
    pub fn qualify(&self, step: &str) -> String {
        if self.is_root() {
            format!("{SEPARATOR}{step}")
        } else {
            format!("{self}{SEPARATOR}{step}")
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ModuleId {
    type Err = DevsyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !MODULE_PATH.is_match(s) {
            return Err(DevsyncError::ConfigError(format!(
                "invalid module path '{s}' (expected e.g. \":common:logging\")"
            )));
        }
        let segments = s
            .split(SEPARATOR)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self { segments })
    }
}
