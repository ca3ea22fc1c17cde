// src/exec/command.rs

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{DevsyncError, Result};
use crate::exec::backend::StepRunner;
use crate::graph::StepPath;

/// Runs producer steps as shell commands, keyed by the rendered step path
/// (`classes`, `:modules:m1:classes`).
#[derive(Debug, Clone)]
pub struct CommandStepRunner {
    commands: BTreeMap<String, String>,
    working_dir: PathBuf,
}

impl CommandStepRunner {
    pub fn new(commands: BTreeMap<String, String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            commands,
            working_dir: working_dir.into(),
        }
    }

    /// Rendered paths of every step this runner can execute.
    pub fn known_steps(&self) -> HashSet<String> {
        self.commands.keys().cloned().collect()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    async fn run_inner(&self, step: &StepPath) -> Result<()> {
        let rendered = step.to_string();
        let Some(cmdline) = self.commands.get(&rendered) else {
            return Err(DevsyncError::UnknownStep(rendered));
        };

        info!(step = %rendered, cmd = %cmdline, "starting producer step");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(cmdline);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(cmdline);
            c
        };

        cmd.current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .with_context(|| format!("spawning process for step '{rendered}'"))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(step = %rendered, "stdout: {}", line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(step = %rendered, "stderr: {}", line);
        }

        let code = output.status.code().unwrap_or(-1);
        info!(
            step = %rendered,
            exit_code = code,
            success = output.status.success(),
            "producer step exited"
        );

        if output.status.success() {
            Ok(())
        } else {
            Err(DevsyncError::StepFailed {
                step: rendered,
                code,
            })
        }
    }
}

impl StepRunner for CommandStepRunner {
    fn run_step<'a>(
        &'a self,
        step: &'a StepPath,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.run_inner(step))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn runner(dir: &Path, steps: &[(&str, &str)]) -> CommandStepRunner {
        CommandStepRunner::new(
            steps
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            dir,
        )
    }

    #[tokio::test]
    async fn runs_command_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner(dir.path(), &[(":m1:classes", "echo built > out.txt")]);

        runner
            .run_step(&StepPath::in_module(":m1".parse().unwrap(), "classes"))
            .await
            .unwrap();

        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out.trim(), "built");
    }

    #[tokio::test]
    async fn non_zero_exit_is_step_failure() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner(dir.path(), &[("classes", "exit 3")]);

        let err = runner.run_step(&StepPath::local("classes")).await.unwrap_err();
        assert!(matches!(
            err,
            DevsyncError::StepFailed { ref step, code: 3 } if step == "classes"
        ));
    }

    #[tokio::test]
    async fn undeclared_step_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let runner = runner(dir.path(), &[("classes", "true")]);

        let err = runner
            .run_step(&StepPath::local("processResources"))
            .await
            .unwrap_err();
        assert!(matches!(err, DevsyncError::UnknownStep(ref s) if s == "processResources"));
        assert!(runner.known_steps().contains("classes"));
    }
}
