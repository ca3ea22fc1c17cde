// src/exec/backend.rs

//! Pluggable producer-step backend.
//!
//! The graph references producer steps (`classes`, `:m1:processResources`)
//! by name only. The runtime hands each one to a `StepRunner` instead of
//! knowing how to compile anything itself.
//!
//! - [`CommandStepRunner`](super::command::CommandStepRunner) is the default
//!   implementation; it runs the shell commands from the descriptor's
//!   `[steps]` table.
//! - Tests provide their own runner that records invocations and fails
//!   chosen steps.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::graph::StepPath;

/// Trait abstracting how producer steps are executed.
///
/// An implementation must fail with
/// [`DevsyncError::UnknownStep`](crate::errors::DevsyncError::UnknownStep)
/// for a step it does not know, rather than treating it as a no-op.
pub trait StepRunner: Send + Sync {
    fn run_step<'a>(
        &'a self,
        step: &'a StepPath,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
