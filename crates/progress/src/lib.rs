//! Progress aggregation
//!
//! Pure functions from fetched project snapshots to progress counts, risk
//! flags and cross-project rollups. Nothing here performs I/O.

pub mod aggregator;
pub mod grouping;
pub mod portfolio;

#[cfg(test)]
mod fixture;

pub use aggregator::{
    aggregate, percent, risk_flags, status, Aggregate, Distribution, RiskKind,
    LOW_PROGRESS_THRESHOLD, UNASSIGNED, UNKNOWN,
};
pub use grouping::{Group, GroupedItem, ItemGroups};
pub use portfolio::{rollup, Health, Portfolio, ProjectProgress, Rollup};
