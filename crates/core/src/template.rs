//! The declarative project template: custom fields, labels and phases.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::index::normalize_key;
use crate::phase::Phase;

const WORDPRESS_TEMPLATE: &str = include_str!("templates/wordpress.json");

/// Errors raised while loading a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// I/O error
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed template document
    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete project template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTemplate {
    /// Template name, used in generated project titles
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Planned project length in working days
    #[serde(default)]
    pub total_days: f64,

    /// Custom project fields
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    /// Repository labels
    #[serde(default)]
    pub labels: Vec<LabelDefinition>,

    /// Phases in execution order
    #[serde(default)]
    pub phases: Vec<Phase>,
}

/// A custom field on the project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Lookup key, normalized before use
    pub key: String,

    /// Human-readable field name shown on the board
    pub display_name: String,

    /// Field data type
    pub kind: FieldKind,

    /// Options, single-select fields only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldDefinition {
    /// The normalized lookup key.
    pub fn normalized_key(&self) -> String {
        normalize_key(&self.key)
    }
}

/// Field data types known to the populator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    SingleSelect,
    Number,
    /// Readable from existing boards; never created from a template.
    Text,
}

/// A repository label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDefinition {
    /// Label name, the natural key
    pub name: String,

    /// Hex color without the leading `#`
    pub color: String,

    /// Description
    #[serde(default)]
    pub description: String,
}

/// Something odd about a template. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateWarning {
    /// Phase percentages do not add up to 100
    PercentageTotal(f64),
    /// A task references a label the template never defines
    UndefinedLabel { task: String, label: String },
    /// Two field definitions normalize to the same key
    DuplicateFieldKey(String),
    /// A single-select field without options
    EmptyOptions(String),
}

impl std::fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateWarning::PercentageTotal(total) => {
                write!(f, "phase percentages sum to {}, not 100", total)
            }
            TemplateWarning::UndefinedLabel { task, label } => {
                write!(f, "task '{}' uses undefined label '{}'", task, label)
            }
            TemplateWarning::DuplicateFieldKey(key) => {
                write!(f, "field key '{}' is defined more than once", key)
            }
            TemplateWarning::EmptyOptions(name) => {
                write!(f, "single-select field '{}' has no options", name)
            }
        }
    }
}

impl ProjectTemplate {
    /// The built-in WordPress delivery template.
    pub fn wordpress() -> Result<Self, TemplateError> {
        Self::from_json(WORDPRESS_TEMPLATE)
    }

    /// Parse a template from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a template from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Total number of tasks across all phases.
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }

    /// Sum of phase percentages. Advisory only.
    pub fn percentage_total(&self) -> f64 {
        self.phases.iter().map(|p| p.percentage).sum()
    }

    /// Find a field definition by normalized key.
    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        let key = normalize_key(key);
        self.fields.iter().find(|f| f.normalized_key() == key)
    }

    /// Collect advisory warnings about the template.
    pub fn validate(&self) -> Vec<TemplateWarning> {
        let mut warnings = Vec::new();

        let total = self.percentage_total();
        if (total - 100.0).abs() > 0.5 {
            warnings.push(TemplateWarning::PercentageTotal(total));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let key = field.normalized_key();
            if !seen.insert(key.clone()) {
                warnings.push(TemplateWarning::DuplicateFieldKey(key));
            }
            if field.kind == FieldKind::SingleSelect && field.options.is_empty() {
                warnings.push(TemplateWarning::EmptyOptions(field.display_name.clone()));
            }
        }

        let defined: HashSet<&str> = self.labels.iter().map(|l| l.name.as_str()).collect();
        for task in self.phases.iter().flat_map(|p| &p.tasks) {
            for label in &task.labels {
                if !defined.contains(label.as_str()) {
                    warnings.push(TemplateWarning::UndefinedLabel {
                        task: task.title.clone(),
                        label: label.clone(),
                    });
                }
            }
        }

        warnings
    }
}
