// tests/runtime_end_to_end.rs

use std::fs;
use std::path::Path;
use std::sync::Arc;

use devsync::engine::Runtime;
use devsync::errors::DevsyncError;
use devsync::fs::RealFileSystem;
use devsync::synth::{ProjectLayout, synthesize};
use devsync_test_utils::builders::ProjectFileBuilder;
use devsync_test_utils::fake_runner::FakeStepRunner;
use devsync_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A project with one module `M1` in `modules/m1` that already has build
/// output, and a main module in `app`.
fn project_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "modules/m1/build/classes/java/main/m1/Service.class", "class");
    write(root, "modules/m1/build/resources/main/static/app.js", "go()");
    write(root, "modules/m1/build/resources/main/templates/index.html", "<p/>");
    write(root, "modules/m1/build/resources/main/application.yml", "a: 1");
    fs::create_dir_all(root.join("app/build")).unwrap();
    dir
}

fn runtime_for(dir: &TempDir, builder: ProjectFileBuilder, runner: FakeStepRunner) -> Runtime {
    let project = builder.root(dir.path()).build();
    let layout = ProjectLayout::from_project(&project);
    let graph = synthesize(&project, &layout, project.settings()).unwrap();
    Runtime::new(Arc::new(graph), Arc::new(RealFileSystem), Arc::new(runner))
}

#[tokio::test]
async fn restart_syncs_classes_and_resources_then_touches_marker() {
    init_tracing();
    let dir = project_tree();
    let runner = FakeStepRunner::new();
    let log = runner.log();
    let runtime = runtime_for(
        &dir,
        ProjectFileBuilder::new().module("M1", "modules/m1").both("M1"),
        runner,
    );

    let summary = with_timeout(runtime.run("restart")).await.unwrap();

    let build = dir.path().join("app/build");
    assert!(build.join("classes/java/main/m1/Service.class").is_file());
    assert!(build.join("resources/main/static/app.js").is_file());
    assert!(build.join("resources/main/templates/index.html").is_file());
    assert!(!build.join("resources/main/application.yml").exists());
    assert!(build.join(".triggerFile").is_file());
    assert_eq!(fs::metadata(build.join(".triggerFile")).unwrap().len(), 0);

    // restart-M1, reload-M1, reload, restart
    assert_eq!(summary.operations, 4);
    assert_eq!(summary.copied, 3);
    assert_eq!(summary.markers_touched, 2);

    let mut steps = log.lock().unwrap().clone();
    steps.sort();
    assert_eq!(
        steps,
        [
            ":modules:m1:classes",
            ":modules:m1:processResources",
            "classes",
            "processResources",
        ]
    );
}

#[tokio::test]
async fn reload_leaves_classes_alone() {
    init_tracing();
    let dir = project_tree();
    let runner = FakeStepRunner::new();
    let log = runner.log();
    let runtime = runtime_for(
        &dir,
        ProjectFileBuilder::new().module("M1", "modules/m1").both("M1"),
        runner,
    );

    with_timeout(runtime.run("reload")).await.unwrap();

    let build = dir.path().join("app/build");
    assert!(build.join("resources/main/static/app.js").is_file());
    assert!(!build.join("classes").exists());
    assert!(build.join(".triggerFile").is_file());
    assert!(!log.lock().unwrap().iter().any(|s| s.ends_with("classes")));
}

#[tokio::test]
async fn second_run_finds_files_up_to_date() {
    init_tracing();
    let dir = project_tree();
    let runtime = runtime_for(
        &dir,
        ProjectFileBuilder::new().module("M1", "modules/m1").both("M1"),
        FakeStepRunner::new(),
    );

    with_timeout(runtime.run("restart")).await.unwrap();
    let again = with_timeout(runtime.run("restart")).await.unwrap();

    assert_eq!(again.copied, 0);
    assert_eq!(again.up_to_date, 3);
}

#[tokio::test]
async fn custom_trigger_file_is_the_only_marker_written() {
    init_tracing();
    let dir = project_tree();
    let runtime = runtime_for(
        &dir,
        ProjectFileBuilder::new()
            .trigger_file(".customTriggerFile")
            .module("M1", "modules/m1")
            .both("M1"),
        FakeStepRunner::new(),
    );

    with_timeout(runtime.run("restart")).await.unwrap();

    let mut files: Vec<String> = fs::read_dir(dir.path().join("app/build"))
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(files, [".customTriggerFile"]);
}

#[tokio::test]
async fn failing_producer_step_fails_the_run_before_the_marker() {
    init_tracing();
    let dir = project_tree();
    let runtime = runtime_for(
        &dir,
        ProjectFileBuilder::new().module("M1", "modules/m1").both("M1"),
        FakeStepRunner::new().failing(":modules:m1:classes"),
    );

    let err = with_timeout(runtime.run("restart")).await.unwrap_err();

    assert!(matches!(
        err,
        DevsyncError::StepFailed { ref step, code: 1 } if step == ":modules:m1:classes"
    ));
    // The reload half may or may not have finished; the class sync never starts.
    assert!(!dir.path().join("app/build/classes").exists());
}

#[tokio::test]
async fn unknown_producer_step_fails_fast() {
    init_tracing();
    let dir = project_tree();
    let runtime = runtime_for(
        &dir,
        ProjectFileBuilder::new().module("M1", "modules/m1").reload("M1"),
        FakeStepRunner::new().knowing(&["processResources"]),
    );

    let err = with_timeout(runtime.run("reload")).await.unwrap_err();

    assert!(matches!(err, DevsyncError::UnknownStep(ref s) if s == ":modules:m1:processResources"));
    assert!(!dir.path().join("app/build/.triggerFile").exists());
}
