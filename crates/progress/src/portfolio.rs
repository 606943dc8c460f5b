//! Cross-project rollup and portfolio health.

use populator_core::ProjectSnapshot;
use serde::Serialize;

use crate::aggregator::{aggregate, percent, Aggregate, Distribution};

/// Summed counts across projects.
///
/// `overall_progress` is computed from the summed counts, so a large project
/// weighs more than a small one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Rollup {
    pub projects: usize,
    pub total_tasks: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub todo: usize,
    pub backlog: usize,
    pub by_status: Distribution,
    pub by_phase: Distribution,
    pub by_priority: Distribution,
    pub by_developer: Distribution,
    pub overall_progress: u32,
}

impl Rollup {
    pub fn remaining(&self) -> usize {
        self.total_tasks - self.completed
    }
}

/// Sum aggregates into a rollup.
pub fn rollup<'a>(aggregates: impl IntoIterator<Item = &'a Aggregate>) -> Rollup {
    let mut total = Rollup::default();
    for agg in aggregates {
        total.projects += 1;
        total.total_tasks += agg.total_tasks;
        total.completed += agg.completed;
        total.in_progress += agg.in_progress;
        total.blocked += agg.blocked;
        total.todo += agg.todo;
        total.backlog += agg.backlog;
        total.by_status.merge(&agg.by_status);
        total.by_phase.merge(&agg.by_phase);
        total.by_priority.merge(&agg.by_priority);
        total.by_developer.merge(&agg.by_developer);
    }
    total.overall_progress = percent(total.completed, total.total_tasks);
    total
}

/// Project counts by health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Health {
    /// Every task done
    pub completed: usize,
    /// Work in progress and nothing blocked
    pub on_track: usize,
    /// Every task still in the backlog
    pub not_started: usize,
    pub with_blockers: usize,
}

/// A project and its aggregate.
#[derive(Debug, Clone)]
pub struct ProjectProgress<'a> {
    pub snapshot: &'a ProjectSnapshot,
    pub aggregate: Aggregate,
}

/// Every project of an owner, aggregated.
#[derive(Debug, Clone)]
pub struct Portfolio<'a> {
    pub projects: Vec<ProjectProgress<'a>>,
    pub totals: Rollup,
}

impl<'a> Portfolio<'a> {
    pub fn new(snapshots: &'a [ProjectSnapshot]) -> Self {
        let projects: Vec<ProjectProgress<'a>> = snapshots
            .iter()
            .map(|snapshot| ProjectProgress {
                snapshot,
                aggregate: aggregate(snapshot),
            })
            .collect();
        let totals = rollup(projects.iter().map(|p| &p.aggregate));
        Self { projects, totals }
    }

    pub fn active(&self) -> impl Iterator<Item = &ProjectProgress<'a>> {
        self.projects.iter().filter(|p| !p.snapshot.closed)
    }

    pub fn closed(&self) -> impl Iterator<Item = &ProjectProgress<'a>> {
        self.projects.iter().filter(|p| p.snapshot.closed)
    }

    /// Open projects, most progressed first. Equal progress keeps fetch order.
    pub fn active_by_progress(&self) -> Vec<&ProjectProgress<'a>> {
        let mut active: Vec<_> = self.active().collect();
        active.sort_by(|a, b| b.aggregate.progress_percent.cmp(&a.aggregate.progress_percent));
        active
    }

    /// Open projects by ascending number.
    pub fn active_by_number(&self) -> Vec<&ProjectProgress<'a>> {
        let mut active: Vec<_> = self.active().collect();
        active.sort_by_key(|p| p.snapshot.number);
        active
    }

    /// Projects with at least one risk flag, in fetch order.
    pub fn requiring_attention(&self) -> Vec<&ProjectProgress<'a>> {
        self.projects
            .iter()
            .filter(|p| p.aggregate.is_at_risk())
            .collect()
    }

    pub fn health(&self) -> Health {
        let mut health = Health::default();
        for agg in self.projects.iter().map(|p| &p.aggregate) {
            if agg.progress_percent == 100 {
                health.completed += 1;
            }
            if agg.in_progress > 0 && agg.blocked == 0 {
                health.on_track += 1;
            }
            if agg.backlog == agg.total_tasks {
                health.not_started += 1;
            }
            if agg.blocked > 0 {
                health.with_blockers += 1;
            }
        }
        health
    }
}
