// src/agent.rs

//! The devtools agent dependency.
//!
//! The running application only reacts to the marker file when the devtools
//! library is on its development classpath. If the descriptor does not list
//! it in `development_only`, devsync adds it: unpinned when the Spring Boot
//! plugin manages versions, otherwise pinned to a known release.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::config::ProjectFile;
use crate::errors::{DevsyncError, Result};

pub const AGENT_GROUP: &str = "org.springframework.boot";
pub const AGENT_NAME: &str = "spring-boot-devtools";
pub const AGENT_FALLBACK_VERSION: &str = "2.3.2.RELEASE";

/// Plugin that provides version management for the agent.
pub const VERSION_MANAGEMENT_PLUGIN: &str = "org.springframework.boot";

/// `group:name[:version]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
}

impl Coordinate {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl FromStr for Coordinate {
    type Err = DevsyncError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(DevsyncError::ConfigError(format!(
                "invalid dependency coordinate '{s}'"
            )));
        }
        match parts.as_slice() {
            [group, name] => Ok(Coordinate::new(*group, *name)),
            [group, name, version] => Ok(Coordinate::new(*group, *name).with_version(*version)),
            _ => Err(DevsyncError::ConfigError(format!(
                "invalid dependency coordinate '{s}' (expected group:name[:version])"
            ))),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

/// Outcome of [`ensure_agent_dependency`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDependency {
    AlreadyDeclared,
    Added(Coordinate),
}

/// Make sure `development_only` carries the agent, adding it if needed.
///
/// Entries are either coordinates or bare names. Any entry whose name is the
/// agent's counts as declared, whatever its group or version.
pub fn ensure_agent_dependency(
    development_only: &mut Vec<String>,
    version_managed: bool,
) -> AgentDependency {
    if development_only.iter().any(|entry| declares_agent(entry)) {
        debug!(agent = AGENT_NAME, "agent dependency already declared");
        return AgentDependency::AlreadyDeclared;
    }

    let coordinate = if version_managed {
        Coordinate::new(AGENT_GROUP, AGENT_NAME)
    } else {
        Coordinate::new(AGENT_GROUP, AGENT_NAME).with_version(AGENT_FALLBACK_VERSION)
    };

    info!(dependency = %coordinate, "adding agent to development_only");
    development_only.push(coordinate.to_string());
    AgentDependency::Added(coordinate)
}

/// [`ensure_agent_dependency`] against a loaded descriptor.
pub fn ensure_for_project(project: &mut ProjectFile) -> AgentDependency {
    let managed = project.has_plugin(VERSION_MANAGEMENT_PLUGIN);
    ensure_agent_dependency(project.development_only_mut(), managed)
}

fn declares_agent(entry: &str) -> bool {
    match entry.parse::<Coordinate>() {
        Ok(coordinate) => coordinate.name == AGENT_NAME,
        Err(_) => entry.trim() == AGENT_NAME,
    }
}
