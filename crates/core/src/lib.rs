//! Project populator core data models.
//!
//! This crate defines the declarative project template, the indices that map
//! template names onto remote ids, and the fetched project state consumed by
//! the aggregator.

#![warn(missing_docs)]

// Remote identities
mod id;

// Template
mod template;
mod phase;
mod task;

// Resolved remote state
mod index;
mod snapshot;

// Re-exports
pub use id::*;

pub use template::{
    ProjectTemplate, FieldDefinition, FieldKind, LabelDefinition, TemplateError, TemplateWarning,
};
pub use phase::Phase;
pub use task::{Task, Priority};

pub use index::{normalize_key, FieldIndex, FieldEntry, FieldOption, LabelIndex, RemoteField};
pub use snapshot::{ProjectSnapshot, Item, IssueContent, FieldValue, ProjectSummary};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Field keys the task materializer writes to.
pub mod field_keys {
    /// Workflow status (single-select)
    pub const STATUS: &str = "status";
    /// Delivery phase (single-select)
    pub const PHASE: &str = "phase";
    /// Task priority (single-select)
    pub const PRIORITY: &str = "priority";
    /// Share of the project (number)
    pub const TIME_ALLOCATION: &str = "timeallocation";
}

/// Field display names the aggregator reads.
pub mod field_names {
    /// Workflow status
    pub const STATUS: &str = "Status";
    /// Delivery phase
    pub const PHASE: &str = "Phase";
    /// Task priority
    pub const PRIORITY: &str = "Priority";
    /// Assigned developer
    pub const DEVELOPER: &str = "Developer";
}
