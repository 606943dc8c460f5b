//! Resolved remote ids for fields, options and labels.
//!
//! Both indices are owned by a single reconciliation run. They are seeded from
//! what already exists remotely and grow only when something is created.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::id::{FieldId, LabelId, OptionId};
use crate::phase::Phase;
use crate::template::FieldDefinition;

/// Normalize a field key: lower-cased with all whitespace removed.
///
/// `"Time Allocation"` and `"timeallocation"` both become `"timeallocation"`.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A single-select option as the remote service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Option id
    pub id: OptionId,
    /// Option display name
    pub name: String,
}

/// A project field as the remote service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteField {
    /// Field id
    pub id: FieldId,
    /// Display name
    pub name: String,
    /// Options, present for single-select fields only
    pub options: Option<Vec<FieldOption>>,
}

/// A resolved field and its options, in remote order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field id
    pub id: FieldId,
    /// Options in the order the service returned them
    pub options: Vec<FieldOption>,
}

impl FieldEntry {
    /// Create an entry with no options.
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            options: Vec::new(),
        }
    }

    /// Attach options.
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Option id for an exact option name.
    pub fn option_id(&self, name: &str) -> Option<&OptionId> {
        self.options.iter().find(|o| o.name == name).map(|o| &o.id)
    }

    /// Option matching a phase.
    ///
    /// An option equal to the phase name (ignoring case) wins. Otherwise the
    /// first option containing the phase's leading token is used, so phase
    /// `"Design"` picks option `"3. Design"`. This containment rule is a
    /// heuristic: two phases sharing a leading token land on the same option.
    pub fn option_for_phase(&self, phase: &Phase) -> Option<&OptionId> {
        let full = phase.name.to_lowercase();
        if let Some(exact) = self.options.iter().find(|o| o.name.to_lowercase() == full) {
            return Some(&exact.id);
        }

        let token = phase.leading_token();
        if token.is_empty() {
            return None;
        }
        self.options
            .iter()
            .find(|o| o.name.to_lowercase().contains(&token))
            .map(|o| &o.id)
    }
}

/// Normalized field key to resolved field.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    entries: HashMap<String, FieldEntry>,
}

impl FieldIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a project's existing fields.
    ///
    /// Each remote field is keyed by its normalized display name, unless a
    /// definition's display name normalizes to the same value, in which case
    /// the definition's key is used. That keeps `"Time %"` on the board and
    /// `timeAllocation` in the template pointing at the same entry.
    pub fn from_remote(fields: &[RemoteField], definitions: &[FieldDefinition]) -> Self {
        let mut index = Self::new();
        for field in fields {
            let display = normalize_key(&field.name);
            let key = definitions
                .iter()
                .find(|d| normalize_key(&d.display_name) == display)
                .map(|d| d.normalized_key())
                .unwrap_or(display);
            let entry = FieldEntry::new(field.id.clone())
                .with_options(field.options.clone().unwrap_or_default());
            index.entries.insert(key, entry);
        }
        index
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: &str, entry: FieldEntry) {
        self.entries.insert(normalize_key(key), entry);
    }

    /// Look up an entry by key (normalized on the way in).
    pub fn get(&self, key: &str) -> Option<&FieldEntry> {
        self.entries.get(&normalize_key(key))
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no fields are resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Label name to label id.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    by_name: HashMap<String, LabelId>,
}

impl LabelIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a label.
    pub fn insert(&mut self, name: impl Into<String>, id: LabelId) {
        self.by_name.insert(name.into(), id);
    }

    /// Label id for an exact name.
    pub fn get(&self, name: &str) -> Option<&LabelId> {
        self.by_name.get(name)
    }

    /// Whether a label is present.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of known labels.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no labels are known.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolve names to ids, returning the ids and the names that were dropped.
    pub fn resolve<'a>(&self, names: &'a [String]) -> (Vec<LabelId>, Vec<&'a str>) {
        let mut ids = Vec::new();
        let mut dropped = Vec::new();
        for name in names {
            match self.by_name.get(name) {
                Some(id) => ids.push(id.clone()),
                None => dropped.push(name.as_str()),
            }
        }
        (ids, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FieldKind;

    fn option(id: &str, name: &str) -> FieldOption {
        FieldOption {
            id: OptionId::new(id),
            name: name.to_string(),
        }
    }

    fn phase(name: &str) -> Phase {
        Phase {
            id: "p".to_string(),
            name: name.to_string(),
            percentage: 0.0,
            days: 0.0,
            tasks: Vec::new(),
        }
    }

    fn definition(key: &str, display: &str) -> FieldDefinition {
        FieldDefinition {
            key: key.to_string(),
            display_name: display.to_string(),
            kind: FieldKind::Number,
            options: Vec::new(),
        }
    }

    #[test]
    fn normalize_strips_whitespace_and_case() {
        assert_eq!(normalize_key("Time Allocation"), "timeallocation");
        assert_eq!(normalize_key(" Est. Days "), "est.days");
        assert_eq!(normalize_key("Time %"), "time%");
    }

    #[test]
    fn phase_option_prefers_exact_name() {
        let entry = FieldEntry::new(FieldId::new("f")).with_options(vec![
            option("o1", "Testing Prep"),
            option("o2", "Testing"),
        ]);
        assert_eq!(entry.option_for_phase(&phase("Testing")).unwrap().as_str(), "o2");
    }

    #[test]
    fn phase_option_falls_back_to_leading_token() {
        let entry = FieldEntry::new(FieldId::new("f")).with_options(vec![
            option("o1", "1. Discovery"),
            option("o3", "3. Design"),
        ]);
        assert_eq!(
            entry.option_for_phase(&phase("Design")).unwrap().as_str(),
            "o3"
        );
        assert_eq!(
            entry
                .option_for_phase(&phase("Discovery & Requirements"))
                .unwrap()
                .as_str(),
            "o1"
        );
        assert!(entry.option_for_phase(&phase("User Acceptance Testing")).is_none());
    }

    #[test]
    fn seed_maps_display_names_onto_definition_keys() {
        let remote = vec![
            RemoteField {
                id: FieldId::new("f-time"),
                name: "Time %".to_string(),
                options: None,
            },
            RemoteField {
                id: FieldId::new("f-title"),
                name: "Title".to_string(),
                options: None,
            },
        ];
        let index = FieldIndex::from_remote(&remote, &[definition("timeAllocation", "Time %")]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("timeallocation").unwrap().id.as_str(), "f-time");
        assert!(index.contains("Title"));
        assert_eq!(index.keys(), vec!["timeallocation", "title"]);
    }

    #[test]
    fn label_resolution_drops_unknown_names() {
        let mut labels = LabelIndex::new();
        labels.insert("qa", LabelId::new("L1"));
        labels.insert("seo", LabelId::new("L2"));

        let wanted = vec!["seo".to_string(), "ghost".to_string(), "qa".to_string()];
        let (ids, dropped) = labels.resolve(&wanted);
        assert_eq!(ids, vec![LabelId::new("L2"), LabelId::new("L1")]);
        assert_eq!(dropped, vec!["ghost"]);
    }
}
