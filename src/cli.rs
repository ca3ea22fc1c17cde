// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `devsync`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devsync",
    version,
    about = "Sync module build output into the main module and signal devtools to reload or restart.",
    long_about = None
)]
pub struct CliArgs {
    /// Top-level operation to run.
    #[arg(value_enum, default_value_t = Target::Restart)]
    pub target: Target,

    /// Path to the project descriptor (TOML).
    ///
    /// Default: `Devsync.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Devsync.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVSYNC_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Synthesize and print the operation graph, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Fail during synthesis if a referenced producer step is not declared
    /// in `[steps]`, instead of at execution time.
    #[arg(long)]
    pub check_steps: bool,
}

/// The two externally invocable aggregates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Reload,
    Restart,
}

impl Target {
    /// Name of the aggregate operation in the synthesized graph.
    pub fn operation_name(self) -> &'static str {
        match self {
            Target::Reload => crate::synth::RELOAD_TASK_NAME,
            Target::Restart => crate::synth::RESTART_TASK_NAME,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
