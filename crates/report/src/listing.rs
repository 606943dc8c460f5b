//! Plain-text listing of an owner's projects.

use std::fmt::Write;

use populator_core::ProjectSummary;

use crate::format::date;

/// Render the project list shown by `populator list`.
pub fn render_listing(owner: &str, projects: &[ProjectSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 Projects for {}\n", owner);

    if projects.is_empty() {
        out.push_str("No projects found.\n");
        return out;
    }

    let rule = "─".repeat(80);
    let _ = writeln!(out, "{}", rule);
    for project in projects {
        let state = if project.closed { "[CLOSED]" } else { "[OPEN]" };
        let _ = writeln!(out, "\n  {} #{} - {}", state, project.number, project.title);
        let _ = writeln!(out, "    Items: {}", project.item_count);
        let _ = writeln!(out, "    Created: {}", date(&project.created_at));
        let _ = writeln!(out, "    URL: {}", project.url);
    }
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "\nTotal: {} projects", projects.len());
    out.push_str("\nTo populate a specific project, set PROJECT_NUMBER=<number>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn summary(number: u64, closed: bool) -> ProjectSummary {
        ProjectSummary {
            number,
            title: format!("Client {}", number),
            url: format!("https://example.test/projects/{}", number),
            closed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
            item_count: 33,
        }
    }

    #[test]
    fn lists_each_project_with_state() {
        let out = render_listing("acme", &[summary(1, false), summary(2, true)]);
        assert!(out.contains("[OPEN] #1 - Client 1"));
        assert!(out.contains("[CLOSED] #2 - Client 2"));
        assert!(out.contains("    Items: 33"));
        assert!(out.contains("    Created: 2024-01-20"));
        assert!(out.contains("Total: 2 projects"));
    }

    #[test]
    fn empty_listing() {
        let out = render_listing("acme", &[]);
        assert!(out.ends_with("No projects found.\n"));
    }
}
