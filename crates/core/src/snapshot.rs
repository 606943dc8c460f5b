//! Fetched project state, the input of the aggregator and the reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{ItemId, ProjectId};
use crate::Time;

/// A project with its items and their field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Project id
    pub id: ProjectId,

    /// Project number, unique per owner
    pub number: u64,

    /// Title
    pub title: String,

    /// Board URL
    pub url: String,

    /// Whether the project is closed
    pub closed: bool,

    /// When created
    pub created_at: Time,

    /// Last update
    pub updated_at: Time,

    /// Items in board order, capped at the fetch limit
    pub items: Vec<Item>,

    /// Item count reported by the service, including items past the cap
    pub total_item_count: usize,
}

impl ProjectSnapshot {
    /// Items with resolvable issue content. Drafts and the like are skipped.
    pub fn linked_items(&self) -> impl Iterator<Item = (&Item, &IssueContent)> {
        self.items
            .iter()
            .filter_map(|item| item.content.as_ref().map(|content| (item, content)))
    }
}

/// One item on a project board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item id
    pub id: ItemId,

    /// Linked issue, if the item resolves to one
    pub content: Option<IssueContent>,

    /// Field display name to value
    #[serde(default)]
    pub field_values: BTreeMap<String, FieldValue>,
}

impl Item {
    /// Display value of a field, if set.
    pub fn field(&self, name: &str) -> Option<String> {
        self.field_values.get(name).and_then(FieldValue::display)
    }

    /// Display value of a field, or `default` when unset.
    pub fn field_or(&self, name: &str, default: &str) -> String {
        self.field(name).unwrap_or_else(|| default.to_string())
    }
}

/// The issue behind a project item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueContent {
    /// Issue number
    pub number: u64,
    /// Title
    pub title: String,
    /// Issue URL
    pub url: String,
    /// `OPEN` or `CLOSED`
    pub state: String,
}

/// A field value on an item. Exactly one representation is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    SingleSelect(String),
}

impl FieldValue {
    /// Display form. Empty text and zero count as unset.
    pub fn display(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) | FieldValue::SingleSelect(text) => {
                (!text.is_empty()).then(|| text.clone())
            }
            FieldValue::Number(n) if *n == 0.0 || n.is_nan() => None,
            FieldValue::Number(n) => Some(format_number(*n)),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A project as listed for an owner, without items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project number
    pub number: u64,
    /// Title
    pub title: String,
    /// Board URL
    pub url: String,
    /// Whether the project is closed
    pub closed: bool,
    /// When created
    pub created_at: Time,
    /// Number of items
    pub item_count: usize,
}
