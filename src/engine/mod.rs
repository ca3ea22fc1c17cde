// src/engine/mod.rs

//! Local executor for a synthesized graph.
//!
//! The pure ready-set logic lives in [`scheduler`]; the async shell that
//! performs copies, touches markers and delegates producer steps is
//! [`runtime`].

pub mod runtime;
pub mod scheduler;

use std::fmt;

use crate::exec::CopyReport;
use crate::graph::StepPath;

pub use runtime::Runtime;
pub use scheduler::Scheduler;

/// One schedulable piece of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    Operation(String),
    Step(StepPath),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Operation(name) => f.write_str(name),
            Unit::Step(path) => path.fmt(f),
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub operations: usize,
    pub steps: usize,
    pub copied: usize,
    pub up_to_date: usize,
    pub markers_touched: usize,
}

/// What a single unit produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitOutcome {
    Step,
    Operation { copy: CopyReport, touched: bool },
}

impl RunSummary {
    pub(crate) fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            UnitOutcome::Step => self.steps += 1,
            UnitOutcome::Operation { copy, touched } => {
                self.operations += 1;
                self.copied += copy.copied;
                self.up_to_date += copy.up_to_date;
                if touched {
                    self.markers_touched += 1;
                }
            }
        }
    }
}
