//! Items grouped by field value, for detailed reports.

use populator_core::{field_names, IssueContent, Item, Priority, ProjectSnapshot};

use crate::aggregator::{item_developer, item_phase, item_priority, item_status, percent, status};

/// A linked item with its field values resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedItem<'a> {
    pub issue: &'a IssueContent,
    pub status: String,
    pub phase: String,
    pub priority: String,
    pub developer: String,
    /// Raw phase and priority, unset when the item has no value
    pub phase_value: Option<String>,
    pub priority_value: Option<String>,
}

impl<'a> GroupedItem<'a> {
    fn new(item: &'a Item, issue: &'a IssueContent) -> Self {
        Self {
            issue,
            status: item_status(item),
            phase: item_phase(item),
            priority: item_priority(item),
            developer: item_developer(item),
            phase_value: item.field(field_names::PHASE),
            priority_value: item.field(field_names::PRIORITY),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == status::DONE
    }
}

/// Items sharing one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    pub key: String,
    pub items: Vec<GroupedItem<'a>>,
}

impl Group<'_> {
    pub fn completed(&self) -> usize {
        self.items.iter().filter(|i| i.is_done()).count()
    }

    /// Completion of this group, rounded.
    pub fn percent(&self) -> u32 {
        percent(self.completed(), self.items.len())
    }
}

fn push<'a>(groups: &mut Vec<Group<'a>>, key: &str, item: GroupedItem<'a>) {
    match groups.iter_mut().find(|g| g.key == key) {
        Some(group) => group.items.push(item),
        None => groups.push(Group {
            key: key.to_string(),
            items: vec![item],
        }),
    }
}

/// Groups named in `order` first, then the rest in discovery order.
fn ordered<'g, 'a>(groups: &'g [Group<'a>], order: &[&str]) -> Vec<&'g Group<'a>> {
    let mut ordered: Vec<_> = order
        .iter()
        .filter_map(|key| groups.iter().find(|g| g.key == *key))
        .collect();
    ordered.extend(groups.iter().filter(|g| !order.contains(&g.key.as_str())));
    ordered
}

/// Linked items grouped four ways. Groups keep discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemGroups<'a> {
    pub by_status: Vec<Group<'a>>,
    pub by_phase: Vec<Group<'a>>,
    pub by_priority: Vec<Group<'a>>,
    pub by_developer: Vec<Group<'a>>,
}

impl<'a> ItemGroups<'a> {
    pub fn from_snapshot(snapshot: &'a ProjectSnapshot) -> Self {
        let mut groups = Self::default();
        for (item, issue) in snapshot.linked_items() {
            let grouped = GroupedItem::new(item, issue);
            push(&mut groups.by_status, &grouped.status, grouped.clone());
            push(&mut groups.by_phase, &grouped.phase, grouped.clone());
            push(&mut groups.by_priority, &grouped.priority, grouped.clone());
            let developer = grouped.developer.clone();
            push(&mut groups.by_developer, &developer, grouped);
        }
        groups
    }

    pub fn status(&self, key: &str) -> Option<&Group<'a>> {
        self.by_status.iter().find(|g| g.key == key)
    }

    pub fn priority(&self, key: &str) -> Option<&Group<'a>> {
        self.by_priority.iter().find(|g| g.key == key)
    }

    /// Every status group, known statuses in workflow order first.
    pub fn statuses_in_order(&self) -> Vec<&Group<'a>> {
        ordered(&self.by_status, &status::ORDER)
    }

    /// Every priority group, Critical to Low first.
    pub fn priorities_in_order(&self) -> Vec<&Group<'a>> {
        ordered(&self.by_priority, &Priority::ALL.map(|p| p.as_str()))
    }

    /// Phase groups sorted by name.
    pub fn phases_by_name(&self) -> Vec<&Group<'a>> {
        let mut groups: Vec<_> = self.by_phase.iter().collect();
        groups.sort_by(|a, b| a.key.cmp(&b.key));
        groups
    }

    /// Developer groups sorted by name.
    pub fn developers_by_name(&self) -> Vec<&Group<'a>> {
        let mut groups: Vec<_> = self.by_developer.iter().collect();
        groups.sort_by(|a, b| a.key.cmp(&b.key));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{UNASSIGNED, UNKNOWN};
    use crate::fixture::{draft, row, snapshot};

    #[test]
    fn groups_follow_discovery_order() {
        let mut snap = snapshot(
            1,
            vec![
                row(1, "Done", "3. Design", "High", "Dev 2 (FE)"),
                row(2, "To Do", "1. Discovery", "High", "Dev 1 (Lead)"),
                row(3, "Done", "3. Design", "Low", ""),
            ],
        );
        snap.items.push(draft("Done"));

        let groups = ItemGroups::from_snapshot(&snap);
        let statuses: Vec<_> = groups.by_status.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(statuses, vec!["Done", "To Do"]);
        assert_eq!(groups.status("Done").unwrap().items.len(), 2);
        assert_eq!(groups.priority("High").unwrap().items[1].issue.number, 2);

        let phases: Vec<_> = groups.phases_by_name().into_iter().map(|g| g.key.as_str()).collect();
        assert_eq!(phases, vec!["1. Discovery", "3. Design"]);
        let devs: Vec<_> = groups.developers_by_name().into_iter().map(|g| g.key.as_str()).collect();
        assert_eq!(devs, vec!["Dev 1 (Lead)", "Dev 2 (FE)", UNASSIGNED]);
    }

    #[test]
    fn group_completion() {
        let snap = snapshot(
            1,
            vec![
                row(1, "Done", "3. Design", "", ""),
                row(2, "In Progress", "3. Design", "", ""),
                row(3, "Done", "3. Design", "", ""),
            ],
        );
        let groups = ItemGroups::from_snapshot(&snap);
        let design = &groups.by_phase[0];
        assert_eq!(design.completed(), 2);
        assert_eq!(design.percent(), 67);
        assert_eq!(design.items[0].priority, UNKNOWN);
        assert_eq!(design.items[0].priority_value, None);
    }

    #[test]
    fn unknown_values_follow_the_fixed_order() {
        let snap = snapshot(
            1,
            vec![
                row(1, "Todo", "1. Discovery", "", "Dev 1 (Lead)"),
                row(2, "", "1. Discovery", "Medium", ""),
                row(3, "Done", "1. Discovery", "Critical", ""),
                row(4, "Backlog", "1. Discovery", "", ""),
            ],
        );
        let groups = ItemGroups::from_snapshot(&snap);

        let statuses: Vec<_> = groups.statuses_in_order().into_iter().map(|g| g.key.as_str()).collect();
        assert_eq!(statuses, vec!["Backlog", "Done", "Todo", UNKNOWN]);

        let priorities: Vec<_> = groups
            .priorities_in_order()
            .into_iter()
            .map(|g| (g.key.as_str(), g.items.len()))
            .collect();
        assert_eq!(priorities, vec![("Critical", 1), ("Medium", 1), (UNKNOWN, 2)]);
    }
}
