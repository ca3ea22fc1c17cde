// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::engine::{RunSummary, Scheduler, Unit, UnitOutcome};
use crate::errors::{DevsyncError, Result};
use crate::exec::{CopyReport, StepRunner, copy_trees};
use crate::fs::FileSystem;
use crate::graph::{OperationKind, OperationNode, TaskGraph};
use crate::marker;

/// Runs a target operation and its upstream closure.
///
/// Independent units run concurrently. Copies and marker touches are
/// blocking filesystem work and go through `spawn_blocking`; producer steps
/// go to the [`StepRunner`]. The first failure stops new units from being
/// started; units already running are awaited and the first error is
/// returned.
pub struct Runtime {
    graph: Arc<TaskGraph>,
    fs: Arc<dyn FileSystem>,
    steps: Arc<dyn StepRunner>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("operations", &self.graph.len())
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

type Completed = (Unit, Result<UnitOutcome>);

impl Runtime {
    pub fn new(
        graph: Arc<TaskGraph>,
        fs: Arc<dyn FileSystem>,
        steps: Arc<dyn StepRunner>,
    ) -> Self {
        Self { graph, fs, steps }
    }

    pub async fn run(&self, target: &str) -> Result<RunSummary> {
        let mut scheduler = Scheduler::plan(&self.graph, target)?;
        info!(operation = target, units = scheduler.len(), "devsync run started");

        let mut running: JoinSet<Completed> = JoinSet::new();
        let mut summary = RunSummary::default();
        let mut failure: Option<DevsyncError> = None;

        for unit in scheduler.take_ready() {
            self.spawn_unit(&mut running, unit)?;
        }

        while let Some(joined) = running.join_next().await {
            let (unit, result) = match joined {
                Ok(completed) => completed,
                Err(join_err) => {
                    error!(error = %join_err, "unit task panicked or was cancelled");
                    failure.get_or_insert(DevsyncError::Other(join_err.into()));
                    continue;
                }
            };

            match result {
                Ok(outcome) => {
                    debug!(unit = %unit, "unit finished");
                    summary.record(outcome);
                    let unblocked = scheduler.complete(&unit);
                    if failure.is_none() {
                        for next in unblocked {
                            self.spawn_unit(&mut running, next)?;
                        }
                    }
                }
                Err(err) => {
                    error!(unit = %unit, error = %err, "unit failed");
                    if failure.is_none() {
                        info!(
                            running = running.len(),
                            "not starting further units; waiting for running ones"
                        );
                        failure = Some(err);
                    }
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }
        if !scheduler.is_finished() {
            return Err(DevsyncError::DagCycle(format!(
                "run of '{target}' stalled before every unit finished"
            )));
        }

        info!(
            operation = target,
            operations = summary.operations,
            steps = summary.steps,
            copied = summary.copied,
            up_to_date = summary.up_to_date,
            "devsync run finished"
        );
        Ok(summary)
    }

    fn spawn_unit(&self, running: &mut JoinSet<Completed>, unit: Unit) -> Result<()> {
        match unit {
            Unit::Step(step) => {
                let steps = Arc::clone(&self.steps);
                debug!(step = %step, "dispatching producer step");
                running.spawn(async move {
                    let result = steps.run_step(&step).await.map(|()| UnitOutcome::Step);
                    (Unit::Step(step), result)
                });
            }
            Unit::Operation(name) => {
                let node = self.graph.get(&name).cloned().ok_or_else(|| {
                    DevsyncError::ConfigError(format!("unknown operation '{name}'"))
                })?;
                let fs = Arc::clone(&self.fs);
                debug!(operation = %name, "dispatching operation");
                running.spawn(async move {
                    let result = tokio::task::spawn_blocking(move || perform(fs.as_ref(), &node))
                        .await
                        .map_err(|e| DevsyncError::Other(e.into()))
                        .and_then(|r| r);
                    (Unit::Operation(name), result)
                });
            }
        }
        Ok(())
    }
}

/// The operation's own work: copy (if any), then the marker (if any).
fn perform(fs: &dyn FileSystem, node: &OperationNode) -> Result<UnitOutcome> {
    let copy = match (node.kind(), node.destination()) {
        (OperationKind::Copy, Some(destination)) => {
            let report = copy_trees(fs, node.sources(), destination, node.includes())?;
            info!(
                operation = %node.name(),
                copied = report.copied,
                up_to_date = report.up_to_date,
                "sync finished"
            );
            report
        }
        (OperationKind::Copy, None) => {
            return Err(DevsyncError::ConfigError(format!(
                "copy operation '{}' has no destination",
                node.name()
            )));
        }
        _ => CopyReport::default(),
    };

    let touched = match node.marker() {
        Some(path) => {
            marker::touch(fs, path)?;
            true
        }
        None => false,
    };

    Ok(UnitOutcome::Operation { copy, touched })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::future::Future;
    use std::path::Path;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::graph::StepPath;

    #[derive(Default)]
    struct Recorder {
        ran: Mutex<Vec<String>>,
        failing: HashSet<String>,
    }

    impl StepRunner for Recorder {
        fn run_step<'a>(
            &'a self,
            step: &'a StepPath,
        ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
            Box::pin(async move {
                let rendered = step.to_string();
                self.ran.lock().unwrap().push(rendered.clone());
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

    fn graph() -> TaskGraph {
        let mut g = TaskGraph::new();
        g.register(
            OperationNode::builder("reload-M1", OperationKind::Copy)
                .copy_from("m1/build/resources/main")
                .copy_into("app/build/resources/main")
                .include("/static/**")
                .depends_on_step(StepPath::in_module(":m1".parse().unwrap(), "processResources"))
                .build(),
        )
        .unwrap();
        g.register(
            OperationNode::builder("reload", OperationKind::Aggregate)
                .depends_on_step(StepPath::local("processResources"))
                .depends_on_operation("reload-M1")
                .touches("app/build/.triggerFile")
                .build(),
        )
        .unwrap();
        g
    }

    #[tokio::test]
    async fn runs_syncs_then_touches_marker() {
        let fs = Arc::new(MockFileSystem::new());
        fs.add_file("m1/build/resources/main/static/a.css", "body{}");
        fs.add_file("m1/build/resources/main/app.yml", "x: 1");
        let steps = Arc::new(Recorder::default());

        let runtime = Runtime::new(Arc::new(graph()), fs.clone(), steps.clone());
        let summary = runtime.run("reload").await.unwrap();

        assert_eq!(summary.operations, 2);
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.copied, 1);
        assert_eq!(summary.markers_touched, 1);
        assert!(fs.is_file(Path::new("app/build/resources/main/static/a.css")));
        assert!(!fs.exists(Path::new("app/build/resources/main/app.yml")));
        assert!(fs.is_file(Path::new("app/build/.triggerFile")));
    }

    #[tokio::test]
    async fn failed_step_stops_dependents_and_marker() {
        let fs = Arc::new(MockFileSystem::new());
        let steps = Arc::new(Recorder {
            failing: [":m1:processResources".to_string()].into(),
            ..Recorder::default()
        });

        let runtime = Runtime::new(Arc::new(graph()), fs.clone(), steps);
        let err = runtime.run("reload").await.unwrap_err();

        assert!(matches!(err, DevsyncError::StepFailed { ref step, .. } if step == ":m1:processResources"));
        assert!(!fs.exists(Path::new("app/build/.triggerFile")));
    }
}
