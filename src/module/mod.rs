// src/module/mod.rs

//! Module identity and per-module settings.
//!
//! - [`id`] defines the canonical [`ModuleId`].
//! - [`resolver`] maps a resolved dependency to its root and id.
//! - [`registry`] holds user overrides for producer step names.

pub mod id;
pub mod registry;
pub mod resolver;

pub use id::ModuleId;
pub use registry::{ModuleConfig, ModuleRegistry};
pub use resolver::{Artifact, ModuleDependency, ResolvedModule, resolve};
