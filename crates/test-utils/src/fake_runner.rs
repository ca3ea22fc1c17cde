use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use devsync::errors::{DevsyncError, Result};
use devsync::exec::StepRunner;
use devsync::graph::StepPath;

/// A fake step runner that:
/// - records which producer steps were "run", by rendered path
/// - succeeds immediately, except for steps marked as failing
/// - reports `UnknownStep` for anything outside `known`, when set
#[derive(Debug, Default, Clone)]
pub struct FakeStepRunner {
    executed: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
    known: Option<HashSet<String>>,
}

impl FakeStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `step` exit with code 1.
    pub fn failing(mut self, step: &str) -> Self {
        self.failing.insert(step.to_string());
        self
    }

    /// Only accept the given steps.
    pub fn knowing(mut self, steps: &[&str]) -> Self {
        self.known = Some(steps.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Steps run so far, in completion order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Shared handle to the log, for use after the runner was moved.
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.executed)
    }
}

impl StepRunner for FakeStepRunner {
    fn run_step<'a>(
        &'a self,
        step: &'a StepPath,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let rendered = step.to_string();

            if let Some(known) = &self.known {
                if !known.contains(&rendered) {
                    return Err(DevsyncError::UnknownStep(rendered));
                }
            }

            {
                let mut guard = self.executed.lock().unwrap();
                guard.push(rendered.clone());
            }

            if self.failing.contains(&rendered) {
                return Err(DevsyncError::StepFailed {
                    step: rendered,
                    code: 1,
                });
            }
            Ok(())
        })
    }
}
