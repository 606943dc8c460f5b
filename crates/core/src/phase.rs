//! Phase model - an ordered stage of the project template.

use serde::{Deserialize, Serialize};
use crate::task::Task;

/// A phase is a stage of the delivery template with its own tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Template-local identifier (e.g. `phase-3`)
    pub id: String,

    /// Phase name, also used to pick the matching `Phase` field option
    pub name: String,

    /// Share of the whole project, in percent
    pub percentage: f64,

    /// Planned duration in working days
    pub days: f64,

    /// Tasks in execution order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    /// First whitespace-delimited token of the name, lower-cased.
    ///
    /// `"Discovery & Requirements"` yields `"discovery"`.
    pub fn leading_token(&self) -> String {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Sum of the task percentages in this phase.
    pub fn task_percentage_total(&self) -> f64 {
        self.tasks.iter().map(|t| t.percentage).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(name: &str) -> Phase {
        Phase {
            id: "phase-1".to_string(),
            name: name.to_string(),
            percentage: 10.0,
            days: 2.0,
            tasks: Vec::new(),
        }
    }

    #[test]
    fn leading_token_is_lowercased_first_word() {
        assert_eq!(phase("Discovery & Requirements").leading_token(), "discovery");
        assert_eq!(phase("3. Design").leading_token(), "3.");
        assert_eq!(phase("   ").leading_token(), "");
    }
}
