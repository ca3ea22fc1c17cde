// tests/synthesis_scenarios.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use devsync::errors::DevsyncError;
use devsync::graph::{OperationKind, OperationNode, StepPath, TaskGraph};
use devsync::synth::{ProjectLayout, synthesize, synthesize_into};
use devsync_test_utils::builders::{ModuleConfigBuilder, ProjectFileBuilder};
use devsync_test_utils::init_tracing;

fn step(path: &str) -> StepPath {
    match path.rsplit_once(':') {
        Some((module, step)) if !module.is_empty() => {
            StepPath::in_module(module.parse().unwrap(), step)
        }
        _ => StepPath::local(path),
    }
}

fn synth(builder: ProjectFileBuilder) -> devsync::errors::Result<TaskGraph> {
    let project = builder.build();
    let layout = ProjectLayout::from_project(&project);
    synthesize(&project, &layout, project.settings())
}

#[test]
fn default_classes_sync_is_wired_to_module_compile() {
    init_tracing();
    let graph = synth(ProjectFileBuilder::new().module("M1", "modules/m1").both("M1")).unwrap();

    let node = graph.get("restart-M1").unwrap();
    assert_eq!(node.kind(), OperationKind::Copy);
    assert_eq!(node.sources(), [PathBuf::from("/p/modules/m1/build/classes")]);
    assert_eq!(node.destination(), Some(Path::new("/p/app/build/classes")));
    assert!(node.includes().is_empty());
    assert_eq!(node.upstream().len(), 1);
    assert!(node.depends_on_step(&step(":modules:m1:classes")));

    let restart = graph.get("restart").unwrap();
    assert_eq!(restart.kind(), OperationKind::CompileShortcut);
    assert!(restart.depends_on_operation("restart-M1"));
    assert!(restart.depends_on_operation("reload"));
    assert!(restart.depends_on_step(&step("classes")));
}

#[test]
fn custom_reload_task_runs_next_to_default_resources_producer() {
    init_tracing();
    let graph = synth(
        ProjectFileBuilder::new()
            .module("M1", "modules/m1")
            .both("M1")
            .module_config(
                ModuleConfigBuilder::new(":modules:m1")
                    .reload_task("customSync")
                    .build(),
            ),
    )
    .unwrap();

    let reload = graph.get("reload-M1").unwrap();
    assert!(reload.depends_on_step(&step(":modules:m1:customSync")));
    assert!(reload.depends_on_step(&step(":modules:m1:processResources")));
    assert_eq!(reload.upstream().len(), 2);
}

#[test]
fn war_only_module_fails_and_registers_nothing() {
    init_tracing();
    let project = ProjectFileBuilder::new()
        .module_with_artifacts("M1", "modules/m1", &[("war", "modules/m1/build/libs/m1.war")])
        .both("M1")
        .build();
    let layout = ProjectLayout::from_project(&project);

    let mut graph = TaskGraph::new();
    graph
        .register(OperationNode::builder("compileJava", OperationKind::Aggregate).build())
        .unwrap();

    let err = synthesize_into(&mut graph, &project, &layout, project.settings()).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("M1"), "got: {err}");
    assert!(matches!(err, DevsyncError::MissingArtifact { ref kind, .. } if kind == "jar"));

    assert_eq!(graph.names().collect::<Vec<_>>(), ["compileJava"]);
}

#[test]
fn failed_validation_leaves_the_target_graph_untouched() {
    let project = ProjectFileBuilder::new().module("M1", "m1").both("M1").build();
    let layout = ProjectLayout::from_project(&project);

    let mut graph = TaskGraph::new();
    graph
        .register(
            OperationNode::builder("deploy", OperationKind::Aggregate)
                .depends_on_operation("publish")
                .build(),
        )
        .unwrap();

    let err = synthesize_into(&mut graph, &project, &layout, project.settings()).unwrap_err();
    assert!(matches!(err, DevsyncError::ConfigError(ref msg) if msg.contains("publish")));
    assert_eq!(graph.names().collect::<Vec<_>>(), ["deploy"]);
}

#[test]
fn module_directory_that_no_module_path_can_name_is_rejected() {
    let project = ProjectFileBuilder::new()
        .module("M1", "my mod")
        .both("M1")
        .build();
    let layout = ProjectLayout::from_project(&project);

    let mut graph = TaskGraph::new();
    let err = synthesize_into(&mut graph, &project, &layout, project.settings()).unwrap_err();

    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("M1"), "got: {err}");
    assert!(err.to_string().contains("my mod"), "got: {err}");
    assert!(graph.is_empty());
}

#[test]
fn custom_trigger_file_is_the_marker_of_both_aggregates() {
    init_tracing();
    let graph = synth(
        ProjectFileBuilder::new()
            .trigger_file(".customTriggerFile")
            .module("M1", "modules/m1")
            .both("M1"),
    )
    .unwrap();

    let expected = Path::new("/p/app/build/.customTriggerFile");
    assert_eq!(graph.get("reload").unwrap().marker(), Some(expected));
    assert_eq!(graph.get("restart").unwrap().marker(), Some(expected));
    assert!(graph.get("restart-M1").unwrap().marker().is_none());
}

#[test]
fn groups_are_synthesized_independently() {
    let graph = synth(
        ProjectFileBuilder::new()
            .module("Web", "web")
            .module("Core", "core")
            .reload("Web")
            .restart("Core"),
    )
    .unwrap();

    let mut names: Vec<&str> = graph.names().collect();
    names.sort();
    assert_eq!(names, ["reload", "reload-Web", "restart", "restart-Core"]);

    let reload = graph.get("reload").unwrap();
    assert!(reload.depends_on_operation("reload-Web"));
    assert!(!reload.depends_on_operation("restart-Core"));
}

#[test]
fn empty_groups_still_produce_both_aggregates() {
    let graph = synth(ProjectFileBuilder::new()).unwrap();

    assert_eq!(graph.len(), 2);
    let reload = graph.get("reload").unwrap();
    assert_eq!(reload.upstream().len(), 1);
    assert!(reload.depends_on_step(&step("processResources")));

    let restart = graph.get("restart").unwrap();
    assert_eq!(restart.upstream().len(), 2);
}

#[test]
fn second_pass_into_the_same_graph_is_rejected_without_changes() {
    let project = ProjectFileBuilder::new().module("M1", "m1").both("M1").build();
    let layout = ProjectLayout::from_project(&project);

    let mut graph = TaskGraph::new();
    synthesize_into(&mut graph, &project, &layout, project.settings()).unwrap();
    let before = graph.len();

    let err = synthesize_into(&mut graph, &project, &layout, project.settings()).unwrap_err();
    assert!(matches!(err, DevsyncError::DuplicateOperation(_)));
    assert_eq!(graph.len(), before);
}

#[test]
fn module_outside_project_root_is_rejected() {
    let err = synth(ProjectFileBuilder::new().module("Ext", "../elsewhere").restart("Ext"))
        .unwrap_err();
    assert!(matches!(err, DevsyncError::ModuleOutsideProject { ref module, .. } if module == "Ext"));
}

#[test]
fn check_steps_reports_first_undeclared_producer() {
    let graph = synth(ProjectFileBuilder::new().module("M1", "m1").both("M1")).unwrap();

    let mut known: HashSet<String> = ["classes", "processResources", ":m1:classes"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let err = graph.check_steps(&known).unwrap_err();
    assert!(matches!(err, DevsyncError::UnknownStep(ref s) if s == ":m1:processResources"));

    known.insert(":m1:processResources".to_string());
    graph.check_steps(&known).unwrap();
}

#[test]
fn topological_order_runs_syncs_before_aggregates() {
    let graph = synth(ProjectFileBuilder::new().module("M1", "m1").both("M1")).unwrap();
    let order = graph.topological_order().unwrap();
    let pos = |name: &str| order.iter().position(|n| *n == name).unwrap();

    assert!(pos("reload-M1") < pos("reload"));
    assert!(pos("reload") < pos("restart"));
    assert!(pos("restart-M1") < pos("restart"));
}
