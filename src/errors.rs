// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Variants fall into three groups:
//! - configuration errors, raised while loading the descriptor or
//!   synthesizing the graph (nothing has executed yet)
//! - execution errors, raised while the graph runs
//! - I/O errors from the marker touch or the copy primitive

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevsyncError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Module {module} does not publish a {kind} artifact")]
    MissingArtifact { module: String, kind: String },

    #[error("Module {module} is not located under the project root {root:?}")]
    ModuleOutsideProject { module: String, root: PathBuf },

    #[error("Duplicate module configuration for dependency '{0}'")]
    DuplicateModuleConfig(String),

    #[error("Operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("Cycle detected in operation graph: {0}")]
    DagCycle(String),

    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("Step '{step}' failed with exit code {code}")]
    StepFailed { step: String, code: i32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevsyncError {
    /// True for errors that abort graph synthesis before anything runs.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DevsyncError::ConfigError(_)
                | DevsyncError::MissingArtifact { .. }
                | DevsyncError::ModuleOutsideProject { .. }
                | DevsyncError::DuplicateModuleConfig(_)
                | DevsyncError::DuplicateOperation(_)
                | DevsyncError::DagCycle(_)
                | DevsyncError::TomlError(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DevsyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_names_module_and_kind() {
        let err = DevsyncError::MissingArtifact {
            module: "M1".into(),
            kind: "jar".into(),
        };
        assert_eq!(err.to_string(), "Module M1 does not publish a jar artifact");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn execution_errors_are_not_configuration_errors() {
        assert!(!DevsyncError::UnknownStep(":m1:classes".into()).is_configuration_error());
        assert!(
            !DevsyncError::StepFailed {
                step: "classes".into(),
                code: 1
            }
            .is_configuration_error()
        );
    }
}
