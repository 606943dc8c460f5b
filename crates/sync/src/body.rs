//! Issue title and markdown body for a task.

use std::fmt::Write;

use populator_core::{Phase, Task};

const FOOTER: &str = "*Generated by GitHub Project Populator*";

/// Issue title: the task title prefixed with its phase.
pub fn issue_title(phase: &Phase, task: &Task) -> String {
    format!("[{}] {}", phase.name, task.title)
}

/// Issue body with description, phase details, checklist and conditions.
pub fn issue_body(phase: &Phase, task: &Task) -> String {
    let mut body = String::new();

    // Writing into a String cannot fail.
    let _ = write!(body, "## Description\n{}\n\n", task.description);
    body.push_str("## Phase Details\n");
    let _ = writeln!(body, "- **Phase:** {}", phase.name);
    let _ = writeln!(body, "- **Time Allocation:** {}%", task.percentage);
    let _ = write!(body, "- **Priority:** {}\n\n", task.priority);

    if !task.checklist.is_empty() {
        body.push_str("## Checklist\n");
        for item in &task.checklist {
            let _ = writeln!(body, "- [ ] {}", item);
        }
    }

    if let Some(conditions) = &task.conditions {
        body.push_str("\n## Conditions\n");
        let _ = writeln!(body, "This task applies when: {}", conditions.join(", "));
    }

    body.push_str("\n---\n");
    body.push_str(FOOTER);
    body
}
