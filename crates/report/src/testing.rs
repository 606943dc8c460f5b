//! Snapshot builders for report tests.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use populator_core::{
    field_names, FieldValue, IssueContent, Item, ItemId, ProjectId, ProjectSnapshot, Time,
};

pub fn generated_at() -> Time {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
}

/// An issue item. Empty strings leave the field unset.
pub fn item(number: u64, status: &str, phase: &str, priority: &str, developer: &str) -> Item {
    let field_values: BTreeMap<String, FieldValue> = [
        (field_names::STATUS, status),
        (field_names::PHASE, phase),
        (field_names::PRIORITY, priority),
        (field_names::DEVELOPER, developer),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(name, value)| (name.to_string(), FieldValue::SingleSelect(value.to_string())))
    .collect();

    Item {
        id: ItemId::new(format!("PVTI_{}", number)),
        content: Some(IssueContent {
            number,
            title: format!("Task {}", number),
            url: format!("https://example.test/issues/{}", number),
            state: "OPEN".to_string(),
        }),
        field_values,
    }
}

pub fn snapshot(number: u64, title: &str, items: Vec<Item>) -> ProjectSnapshot {
    ProjectSnapshot {
        id: ProjectId::new(format!("PVT_{}", number)),
        number,
        title: title.to_string(),
        url: format!("https://example.test/projects/{}", number),
        closed: false,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 4, 15, 17, 30, 0).unwrap(),
        total_item_count: items.len(),
        items,
    }
}
