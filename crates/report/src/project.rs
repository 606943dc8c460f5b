//! Single-project markdown report.

use std::fmt::Write;

use populator_core::{ProjectSnapshot, Time};
use populator_progress::{status, Aggregate, GroupedItem, ItemGroups};

use crate::format::{date, progress_bar, timestamp};
use crate::FOOTER;

const BAR_WIDTH: usize = 30;
const NOT_SET: &str = "N/A";

fn status_icon(status: &str) -> &'static str {
    match status {
        status::DONE => "✅",
        status::IN_PROGRESS => "🔄",
        status::BLOCKED => "🚫",
        _ => "⏳",
    }
}

fn link(item: &GroupedItem<'_>) -> String {
    format!("**[#{}]({})** {}", item.issue.number, item.issue.url, item.issue.title)
}

/// Render a detailed report for one project.
pub fn render_project(snapshot: &ProjectSnapshot, agg: &Aggregate, generated_at: &Time) -> String {
    let groups = ItemGroups::from_snapshot(snapshot);
    let mut md = String::new();

    // Writing into a String cannot fail.
    let _ = write_all(&mut md, snapshot, agg, &groups, generated_at);

    md.push_str(FOOTER);
    md
}

fn write_all(
    md: &mut String,
    snapshot: &ProjectSnapshot,
    agg: &Aggregate,
    groups: &ItemGroups<'_>,
    generated_at: &Time,
) -> std::fmt::Result {
    write_header(md, snapshot, generated_at)?;
    write_summary(md, agg)?;
    write_statuses(md, groups)?;
    write_phases(md, groups)?;
    write_priorities(md, groups)?;
    write_developers(md, groups)
}

fn write_header(md: &mut String, snapshot: &ProjectSnapshot, generated_at: &Time) -> std::fmt::Result {
    writeln!(md, "# Project Report: {}\n", snapshot.title)?;
    writeln!(md, "**Generated:** {}\n", timestamp(generated_at))?;
    writeln!(md, "**Project Number:** #{}\n", snapshot.number)?;
    let state = if snapshot.closed { "🔴 Closed" } else { "🟢 Open" };
    writeln!(md, "**Status:** {}\n", state)?;
    writeln!(md, "**Created:** {}\n", date(&snapshot.created_at))?;
    writeln!(md, "**Last Updated:** {}\n", date(&snapshot.updated_at))?;
    writeln!(md, "**URL:** [View Project]({})\n", snapshot.url)?;
    if snapshot.total_item_count > snapshot.items.len() {
        writeln!(
            md,
            "> Only the first {} of {} items were fetched.\n",
            snapshot.items.len(),
            snapshot.total_item_count
        )?;
    }
    md.push_str("---\n\n");
    Ok(())
}

fn write_summary(md: &mut String, agg: &Aggregate) -> std::fmt::Result {
    md.push_str("## 📊 Progress Summary\n\n");
    md.push_str("| Metric | Count | Percentage |\n");
    md.push_str("|--------|-------|------------|\n");
    writeln!(md, "| **Total Tasks** | {} | 100% |", agg.total_tasks)?;
    writeln!(md, "| **Completed** | {} | {}% |", agg.completed, agg.progress_percent)?;
    writeln!(md, "| **In Progress** | {} | {}% |", agg.in_progress, agg.share(agg.in_progress))?;
    writeln!(md, "| **Blocked** | {} | {}% |", agg.blocked, agg.share(agg.blocked))?;
    writeln!(
        md,
        "| **Remaining** | {} | {}% |\n",
        agg.remaining(),
        100 - agg.progress_percent
    )?;
    writeln!(
        md,
        "**Progress:** {} {}%\n",
        progress_bar(agg.progress_percent, BAR_WIDTH),
        agg.progress_percent
    )?;
    md.push_str("---\n\n");
    Ok(())
}

fn write_statuses(md: &mut String, groups: &ItemGroups<'_>) -> std::fmt::Result {
    md.push_str("## 📋 Status Breakdown\n\n");
    for group in groups.statuses_in_order() {
        writeln!(md, "### {} ({})\n", group.key, group.items.len())?;
        for item in &group.items {
            writeln!(md, "- {}", link(item))?;
            writeln!(
                md,
                "  - Phase: {} | Priority: {}",
                item.phase_value.as_deref().unwrap_or(NOT_SET),
                item.priority_value.as_deref().unwrap_or(NOT_SET)
            )?;
        }
        md.push('\n');
    }
    md.push_str("---\n\n");
    Ok(())
}

fn write_phases(md: &mut String, groups: &ItemGroups<'_>) -> std::fmt::Result {
    md.push_str("## 🎯 Phase Breakdown\n\n");
    for group in groups.phases_by_name() {
        writeln!(md, "### {}\n", group.key)?;
        writeln!(
            md,
            "**Progress:** {}/{} tasks ({}%)\n",
            group.completed(),
            group.items.len(),
            group.percent()
        )?;
        for item in &group.items {
            writeln!(md, "- {} {}", status_icon(&item.status), link(item))?;
            writeln!(
                md,
                "  - Status: {} | Priority: {}",
                item.status,
                item.priority_value.as_deref().unwrap_or(NOT_SET)
            )?;
        }
        md.push('\n');
    }
    md.push_str("---\n\n");
    Ok(())
}

fn write_priorities(md: &mut String, groups: &ItemGroups<'_>) -> std::fmt::Result {
    md.push_str("## ⚡ Priority Breakdown\n\n");
    for group in groups.priorities_in_order() {
        writeln!(md, "### {} Priority ({})\n", group.key, group.items.len())?;
        for item in &group.items {
            writeln!(md, "- {} - *{}*", link(item), item.status)?;
        }
        md.push('\n');
    }
    md.push_str("---\n\n");
    Ok(())
}

fn write_developers(md: &mut String, groups: &ItemGroups<'_>) -> std::fmt::Result {
    md.push_str("## 👥 Developer Assignments\n\n");
    for group in groups.developers_by_name() {
        writeln!(md, "### {}\n", group.key)?;
        writeln!(
            md,
            "**Assigned:** {} tasks | **Completed:** {} ({}%)\n",
            group.items.len(),
            group.completed(),
            group.percent()
        )?;
        for item in &group.items {
            writeln!(md, "- {} {}", status_icon(&item.status), link(item))?;
            writeln!(
                md,
                "  - Phase: {} | Status: {}",
                item.phase_value.as_deref().unwrap_or(NOT_SET),
                item.status
            )?;
        }
        md.push('\n');
    }
    md.push_str("---\n\n");
    Ok(())
}
