//! Snapshot builders for tests.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use populator_core::{
    field_names, FieldValue, IssueContent, Item, ItemId, ProjectId, ProjectSnapshot,
};

/// An issue item. Empty strings leave the field unset.
pub fn row(number: u64, status: &str, phase: &str, priority: &str, developer: &str) -> Item {
    let mut field_values = BTreeMap::new();
    for (name, value) in [
        (field_names::STATUS, status),
        (field_names::PHASE, phase),
        (field_names::PRIORITY, priority),
        (field_names::DEVELOPER, developer),
    ] {
        if !value.is_empty() {
            field_values.insert(name.to_string(), FieldValue::SingleSelect(value.to_string()));
        }
    }
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

/// An item with no linked issue.
pub fn draft(status: &str) -> Item {
    let mut item = row(0, status, "", "", "");
    item.id = ItemId::new("PVTI_draft");
    item.content = None;
    item
}

pub fn snapshot(number: u64, items: Vec<Item>) -> ProjectSnapshot {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let updated = Utc.with_ymd_and_hms(2024, 4, 15, 17, 30, 0).unwrap();
    ProjectSnapshot {
        id: ProjectId::new(format!("PVT_{}", number)),
        number,
        title: format!("Client {} - WordPress Development", number),
        url: format!("https://example.test/projects/{}", number),
        closed: false,
        created_at: created,
        updated_at: updated,
        total_item_count: items.len(),
        items,
    }
}
