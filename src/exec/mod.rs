// src/exec/mod.rs

//! Leaf work performed by the runtime.
//!
//! - [`copy`] is the filtered tree copy behind every sync operation.
//! - [`hash`] backs its up-to-date check.
//! - [`backend`] / [`command`] run producer steps.

pub mod backend;
pub mod command;
pub mod copy;
pub mod hash;

pub use backend::StepRunner;
pub use command::CommandStepRunner;
pub use copy::{CopyReport, IncludeFilter, copy_trees};
