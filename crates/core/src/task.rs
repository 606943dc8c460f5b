//! Task model - one declarative unit of work in a phase.

use serde::{Deserialize, Serialize};

/// A task that becomes one issue on the project board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Task title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Share of the whole project, in percent
    pub percentage: f64,

    /// Task priority
    pub priority: Priority,

    /// Label names to attach to the issue
    #[serde(default)]
    pub labels: Vec<String>,

    /// Checklist items, rendered unchecked
    #[serde(default)]
    pub checklist: Vec<String>,

    /// Applicability predicates such as `siteType:E-Commerce`.
    ///
    /// Evaluated by whoever selects tasks, never by the synchronizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Option name used on the `Priority` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
