// src/lib.rs

pub mod agent;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod marker;
pub mod module;
pub mod synth;

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::agent::AgentDependency;
use crate::cli::CliArgs;
use crate::config::ProjectFile;
use crate::config::loader::load_and_validate;
use crate::engine::Runtime;
use crate::exec::CommandStepRunner;
use crate::fs::RealFileSystem;
use crate::graph::{OperationKind, TaskGraph};
use crate::synth::ProjectLayout;

/// Everything devsync derives from a descriptor before running anything.
#[derive(Debug)]
pub struct Plan {
    /// The descriptor, with the agent dependency applied.
    pub project: ProjectFile,
    pub layout: ProjectLayout,
    pub graph: TaskGraph,
    pub agent: AgentDependency,
}

/// Load the descriptor, add the agent dependency if missing, and synthesize
/// the operation graph.
pub fn prepare(config_path: &Path) -> Result<Plan> {
    let mut project = load_and_validate(config_path)
        .with_context(|| format!("loading project descriptor {:?}", config_path))?;

    let agent = agent::ensure_for_project(&mut project);
    debug!(agent = ?agent, "agent dependency check done");

    let layout = ProjectLayout::from_project(&project);
    let graph = synth::synthesize(&project, &layout, project.settings())?;

    Ok(Plan {
        project,
        layout,
        graph,
        agent,
    })
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - descriptor loading and the agent dependency check
/// - graph synthesis (and the optional producer step check)
/// - the local runtime with the shell step runner
pub async fn run(args: CliArgs) -> Result<()> {
    let plan = prepare(Path::new(&args.config))?;

    let runner = CommandStepRunner::new(
        plan.project.steps().clone(),
        plan.project.project_root(),
    );
    if args.check_steps {
        plan.graph.check_steps(&runner.known_steps())?;
    }

    if args.dry_run {
        print!("{}", render_dry_run(&plan)?);
        return Ok(());
    }

    let runtime = Runtime::new(
        Arc::new(plan.graph),
        Arc::new(RealFileSystem),
        Arc::new(runner),
    );
    runtime.run(args.target.operation_name()).await?;
    Ok(())
}

/// Human-readable listing of a plan, printed by `--dry-run`.
pub fn render_dry_run(plan: &Plan) -> Result<String> {
    let mut out = String::new();
    let layout = &plan.layout;

    writeln!(out, "devsync dry-run")?;
    writeln!(out, "  project.root = {}", layout.root.display())?;
    writeln!(out, "  project.build_dir = {}", layout.build_dir.display())?;
    writeln!(
        out,
        "  dependencies.development_only = {:?}",
        plan.project.dependencies().development_only
    )?;
    match &plan.agent {
        AgentDependency::Added(coordinate) => writeln!(out, "  agent: added {coordinate}")?,
        AgentDependency::AlreadyDeclared => writeln!(out, "  agent: already declared")?,
    }
    writeln!(out)?;

    write_operations(&mut out, &plan.graph)?;
    Ok(out)
}

fn write_operations(out: &mut String, graph: &TaskGraph) -> Result<()> {
    writeln!(out, "operations ({}):", graph.len())?;
    for name in graph.topological_order()? {
        let Some(node) = graph.get(name) else {
            continue;
        };
        writeln!(out, "  - {name}")?;
        if node.kind() != OperationKind::Copy {
            writeln!(out, "      kind: {:?}", node.kind())?;
        }
        for source in node.sources() {
            writeln!(out, "      from: {}", source.display())?;
        }
        if let Some(dest) = node.destination() {
            writeln!(out, "      into: {}", dest.display())?;
        }
        if !node.includes().is_empty() {
            writeln!(out, "      include: {:?}", node.includes())?;
        }
        let upstream: Vec<String> = node.upstream().iter().map(|u| u.to_string()).collect();
        if !upstream.is_empty() {
            writeln!(out, "      after: {:?}", upstream)?;
        }
        if let Some(marker) = node.marker() {
            writeln!(out, "      touch: {}", marker.display())?;
        }
    }
    Ok(())
}
