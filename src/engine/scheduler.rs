// src/engine/scheduler.rs

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use crate::engine::Unit;
use crate::errors::{DevsyncError, Result};
use crate::graph::{TaskGraph, Upstream};

/// Pure ready-set bookkeeping for one run of a target.
///
/// The plan covers the target and everything it transitively waits for:
/// upstream operations plus the producer steps they reference. Steps are
/// leaves; whatever they need is the step runner's business.
#[derive(Debug)]
pub struct Scheduler {
    /// Unfinished upstreams per unit.
    pending: BTreeMap<Unit, usize>,
    dependents: BTreeMap<Unit, Vec<Unit>>,
    ready: VecDeque<Unit>,
    done: BTreeSet<Unit>,
}

impl Scheduler {
    pub fn plan(graph: &TaskGraph, target: &str) -> Result<Self> {
        if !graph.contains(target) {
            return Err(DevsyncError::ConfigError(format!(
                "unknown target operation '{target}'"
            )));
        }

        let mut pending = BTreeMap::new();
        let mut dependents: BTreeMap<Unit, Vec<Unit>> = BTreeMap::new();
        let mut stack = vec![Unit::Operation(target.to_string())];

        while let Some(unit) = stack.pop() {
            if pending.contains_key(&unit) {
                continue;
            }
            let upstream: Vec<Unit> = match &unit {
                Unit::Operation(name) => {
                    let node = graph.get(name).ok_or_else(|| {
                        DevsyncError::ConfigError(format!("unknown operation '{name}'"))
                    })?;
                    node.upstream().iter().map(Unit::from).collect()
                }
                Unit::Step(_) => Vec::new(),
            };

            for up in &upstream {
                dependents.entry(up.clone()).or_default().push(unit.clone());
            }
            pending.insert(unit, upstream.len());
            stack.extend(upstream);
        }

        let ready = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(unit, _)| unit.clone())
            .collect();

        debug!(operation = target, units = pending.len(), "planned run");
        Ok(Self {
            pending,
            dependents,
            ready,
            done: BTreeSet::new(),
        })
    }

    /// Units that can start now. Each unit is handed out once.
    pub fn take_ready(&mut self) -> Vec<Unit> {
        self.ready.drain(..).collect()
    }

    /// Record a successful unit; returns the units it unblocked.
    pub fn complete(&mut self, unit: &Unit) -> Vec<Unit> {
        if !self.done.insert(unit.clone()) {
            return Vec::new();
        }
        let mut unblocked = Vec::new();
        for dependent in self.dependents.get(unit).into_iter().flatten() {
            if let Some(count) = self.pending.get_mut(dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    unblocked.push(dependent.clone());
                }
            }
        }
        self.ready.extend(unblocked.iter().cloned());
        self.take_ready()
    }

    pub fn is_finished(&self) -> bool {
        self.done.len() == self.pending.len()
    }

    /// Number of units in the plan.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.pending.keys()
    }
}

impl From<&Upstream> for Unit {
    fn from(upstream: &Upstream) -> Self {
        match upstream {
            Upstream::Operation(name) => Unit::Operation(name.clone()),
            Upstream::Step(path) => Unit::Step(path.clone()),
        }
    }
}
