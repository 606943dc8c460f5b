//! Pure aggregation of one project snapshot into progress counts.

use std::collections::BTreeSet;

use populator_core::{field_names, Item, ProjectSnapshot};
use serde::Serialize;

/// Value used when an item has no Status or Priority.
pub const UNKNOWN: &str = "Unknown";

/// Value used when an item has no Phase or Developer.
pub const UNASSIGNED: &str = "Unassigned";

/// Progress below this percentage, with nothing in progress, counts as stalled.
pub const LOW_PROGRESS_THRESHOLD: u32 = 30;

/// Status option names with a bucket of their own.
pub mod status {
    pub const BACKLOG: &str = "Backlog";
    pub const TO_DO: &str = "To Do";
    pub const IN_PROGRESS: &str = "In Progress";
    pub const IN_REVIEW: &str = "In Review";
    pub const DONE: &str = "Done";
    pub const BLOCKED: &str = "Blocked";

    /// Display order for status breakdowns.
    pub const ORDER: [&str; 6] = [BACKLOG, TO_DO, IN_PROGRESS, IN_REVIEW, DONE, BLOCKED];
}

/// Counts keyed by field value, in the order values were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    entries: Vec<(String, usize)>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: &str) {
        self.add_count(key, 1);
    }

    /// Count `count` occurrences of `key`.
    pub fn add_count(&mut self, key: &str, count: usize) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, n)) => *n += count,
            None => self.entries.push((key.to_string(), count)),
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, n)| *n)
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key with the highest count. On a tie the key seen first wins.
    pub fn max_key(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in self.iter() {
            if best.map_or(true, |(_, max)| count > max) {
                best = Some((key, count));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Entries sorted by descending count, ties in discovery order.
    pub fn by_count_desc(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }

    /// Add every entry of `other` into this distribution.
    pub fn merge(&mut self, other: &Distribution) {
        for (key, count) in other.iter() {
            self.add_count(key, count);
        }
    }
}

/// Conditions that put a project on the attention list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskKind {
    /// At least one item is blocked
    HasBlockers,
    /// Progress under the threshold and nothing in progress
    LowProgressStalled,
}

/// Rounded percentage of `part` in `total`, zero when `total` is zero.
///
/// Halves round up, so 1 of 8 is 13%.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u32
}

/// Risk flags for the given counts.
pub fn risk_flags(blocked: usize, in_progress: usize, progress_percent: u32) -> BTreeSet<RiskKind> {
    let mut flags = BTreeSet::new();
    if blocked > 0 {
        flags.insert(RiskKind::HasBlockers);
    }
    if progress_percent < LOW_PROGRESS_THRESHOLD && in_progress == 0 {
        flags.insert(RiskKind::LowProgressStalled);
    }
    flags
}

/// Progress figures for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    /// Items with linked content
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
    pub progress_percent: u32,
    /// Phase holding the most items
    pub current_phase: Option<String>,
    pub risk_flags: BTreeSet<RiskKind>,
}

impl Aggregate {
    /// Items not yet done.
    pub fn remaining(&self) -> usize {
        self.total_tasks - self.completed
    }

    /// Share of all tasks, rounded like the progress percentage.
    pub fn share(&self, count: usize) -> u32 {
        percent(count, self.total_tasks)
    }

    pub fn has_risk(&self, kind: RiskKind) -> bool {
        self.risk_flags.contains(&kind)
    }

    pub fn is_at_risk(&self) -> bool {
        !self.risk_flags.is_empty()
    }

    /// Every item is done. An empty project is never complete.
    pub fn is_complete(&self) -> bool {
        self.total_tasks > 0 && self.progress_percent == 100
    }
}

/// Status of an item, or [`UNKNOWN`].
pub fn item_status(item: &Item) -> String {
    item.field_or(field_names::STATUS, UNKNOWN)
}

/// Phase of an item, or [`UNASSIGNED`].
pub fn item_phase(item: &Item) -> String {
    item.field_or(field_names::PHASE, UNASSIGNED)
}

/// Priority of an item, or [`UNKNOWN`].
pub fn item_priority(item: &Item) -> String {
    item.field_or(field_names::PRIORITY, UNKNOWN)
}

/// Developer of an item, or [`UNASSIGNED`].
pub fn item_developer(item: &Item) -> String {
    item.field_or(field_names::DEVELOPER, UNASSIGNED)
}

/// Aggregate a snapshot. Items without linked content are ignored.
pub fn aggregate(snapshot: &ProjectSnapshot) -> Aggregate {
    let mut agg = Aggregate::default();

    for (item, _) in snapshot.linked_items() {
        agg.total_tasks += 1;

        let status = item_status(item);
        match status.as_str() {
            status::DONE => agg.completed += 1,
            status::IN_PROGRESS => agg.in_progress += 1,
            status::BLOCKED => agg.blocked += 1,
            status::TO_DO => agg.todo += 1,
            status::BACKLOG => agg.backlog += 1,
            _ => {}
        }

        agg.by_status.add(&status);
        agg.by_phase.add(&item_phase(item));
        agg.by_priority.add(&item_priority(item));
        agg.by_developer.add(&item_developer(item));
    }

    agg.progress_percent = percent(agg.completed, agg.total_tasks);
    agg.current_phase = agg.by_phase.max_key().map(str::to_string);
    agg.risk_flags = risk_flags(agg.blocked, agg.in_progress, agg.progress_percent);

    tracing::trace!(
        project = snapshot.number,
        total = agg.total_tasks,
        progress = agg.progress_percent,
        "aggregated"
    );
    agg
}
