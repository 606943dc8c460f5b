//! Portfolio report across every project of an owner.

use std::fmt::Write;

use populator_core::{Priority, Time};
use populator_progress::{Aggregate, Portfolio, ProjectProgress, RiskKind, UNASSIGNED};

use crate::format::{date, progress_bar, timestamp};
use crate::FOOTER;

const OVERVIEW_BAR_WIDTH: usize = 10;
const DETAIL_BAR_WIDTH: usize = 50;

/// Icon summarizing where a project stands.
pub fn project_icon(agg: &Aggregate) -> &'static str {
    if agg.blocked > 0 {
        "🚫"
    } else if agg.in_progress > 0 {
        "🔄"
    } else if agg.progress_percent == 100 {
        "✅"
    } else {
        "⏳"
    }
}

/// Render the portfolio report.
pub fn render_portfolio(portfolio: &Portfolio<'_>, generated_at: &Time) -> String {
    let mut md = String::new();

    // Writing into a String cannot fail.
    let _ = write_all(&mut md, portfolio, generated_at);

    md.push_str("---\n\n");
    md.push_str(FOOTER);
    md
}

fn write_all(md: &mut String, portfolio: &Portfolio<'_>, generated_at: &Time) -> std::fmt::Result {
    write_header(md, portfolio, generated_at)?;
    write_summary(md, portfolio)?;
    write_overview(md, portfolio)?;
    write_details(md, portfolio)?;
    write_closed(md, portfolio)?;
    write_health(md, portfolio)
}

fn write_header(md: &mut String, portfolio: &Portfolio<'_>, generated_at: &Time) -> std::fmt::Result {
    md.push_str("# All Projects Portfolio Report\n\n");
    writeln!(md, "**Generated:** {}\n", timestamp(generated_at))?;
    writeln!(md, "**Total Projects:** {}\n", portfolio.projects.len())?;
    writeln!(
        md,
        "**Active Projects:** {} | **Closed Projects:** {}\n",
        portfolio.active().count(),
        portfolio.closed().count()
    )?;
    md.push_str("---\n\n");
    Ok(())
}

fn write_summary(md: &mut String, portfolio: &Portfolio<'_>) -> std::fmt::Result {
    let totals = &portfolio.totals;
    md.push_str("## 📊 Executive Summary\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    writeln!(md, "| **Total Tasks Across All Projects** | {} |", totals.total_tasks)?;
    writeln!(
        md,
        "| **Completed Tasks** | {} ({}%) |",
        totals.completed, totals.overall_progress
    )?;
    writeln!(md, "| **In Progress** | {} |", totals.in_progress)?;
    writeln!(md, "| **Blocked** | {} |", totals.blocked)?;
    writeln!(md, "| **Remaining** | {} |\n", totals.remaining())?;
    md.push_str("---\n\n");
    Ok(())
}

fn write_overview(md: &mut String, portfolio: &Portfolio<'_>) -> std::fmt::Result {
    let active = portfolio.active_by_progress();
    if active.is_empty() {
        return Ok(());
    }
    md.push_str("## 🟢 Active Projects Overview\n\n");
    md.push_str("| # | Project Name | Tasks | Progress | Phase | Status |\n");
    md.push_str("|---|--------------|-------|----------|-------|--------|\n");
    for ProjectProgress { snapshot, aggregate } in active {
        writeln!(
            md,
            "| **[#{}]({})** | {} | {} | {} {}% | {} | {} |",
            snapshot.number,
            snapshot.url,
            snapshot.title,
            aggregate.total_tasks,
            progress_bar(aggregate.progress_percent, OVERVIEW_BAR_WIDTH),
            aggregate.progress_percent,
            aggregate.current_phase.as_deref().unwrap_or("N/A"),
            project_icon(aggregate)
        )?;
    }
    md.push('\n');
    md.push_str("---\n\n");
    Ok(())
}

fn write_details(md: &mut String, portfolio: &Portfolio<'_>) -> std::fmt::Result {
    md.push_str("## 📋 Detailed Project Reports\n\n");
    for ProjectProgress { snapshot, aggregate: agg } in portfolio.active_by_number() {
        writeln!(md, "### Project #{}: {}\n", snapshot.number, snapshot.title)?;
        writeln!(md, "**URL:** [View Project]({})\n", snapshot.url)?;
        writeln!(
            md,
            "**Created:** {} | **Updated:** {}\n",
            date(&snapshot.created_at),
            date(&snapshot.updated_at)
        )?;

        md.push_str("#### Progress\n\n");
        writeln!(
            md,
            "{} **{}%**\n",
            progress_bar(agg.progress_percent, DETAIL_BAR_WIDTH),
            agg.progress_percent
        )?;
        md.push_str("| Status | Count |\n");
        md.push_str("|--------|-------|\n");
        writeln!(md, "| Completed | {} |", agg.completed)?;
        writeln!(md, "| In Progress | {} |", agg.in_progress)?;
        writeln!(md, "| To Do | {} |", agg.todo)?;
        writeln!(md, "| Backlog | {} |", agg.backlog)?;
        if agg.blocked > 0 {
            writeln!(md, "| **Blocked** | **{}** ⚠️ |", agg.blocked)?;
        }
        writeln!(md, "| **Total** | **{}** |\n", agg.total_tasks)?;

        md.push_str("#### Phase Distribution\n\n");
        for (phase, count) in agg.by_phase.by_count_desc() {
            writeln!(md, "- **{}:** {} tasks", phase, count)?;
        }
        md.push('\n');

        md.push_str("#### Priority Breakdown\n\n");
        for priority in Priority::ALL {
            let count = agg.by_priority.get(priority.as_str());
            if count > 0 {
                writeln!(md, "- **{}:** {} tasks", priority, count)?;
            }
        }
        md.push('\n');

        let assigned: Vec<_> = agg
            .by_developer
            .by_count_desc()
            .into_iter()
            .filter(|(developer, _)| *developer != UNASSIGNED)
            .collect();
        if !assigned.is_empty() {
            md.push_str("#### Developer Assignments\n\n");
            for (developer, count) in assigned {
                writeln!(md, "- **{}:** {} tasks", developer, count)?;
            }
            md.push('\n');
        }

        md.push_str("---\n\n");
    }
    Ok(())
}

fn write_closed(md: &mut String, portfolio: &Portfolio<'_>) -> std::fmt::Result {
    let closed: Vec<_> = portfolio.closed().collect();
    if closed.is_empty() {
        return Ok(());
    }
    md.push_str("## 🔴 Closed Projects\n\n");
    md.push_str("| # | Project Name | Tasks | Completed | Closed Date |\n");
    md.push_str("|---|--------------|-------|-----------|-------------|\n");
    for ProjectProgress { snapshot, aggregate } in closed {
        writeln!(
            md,
            "| #{} | {} | {} | {} | {} |",
            snapshot.number,
            snapshot.title,
            aggregate.total_tasks,
            aggregate.completed,
            date(&snapshot.updated_at)
        )?;
    }
    md.push('\n');
    md.push_str("---\n\n");
    Ok(())
}

fn write_health(md: &mut String, portfolio: &Portfolio<'_>) -> std::fmt::Result {
    let health = portfolio.health();
    md.push_str("## 🏥 Portfolio Health Indicators\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    writeln!(md, "| ✅ Completed Projects | {} |", health.completed)?;
    writeln!(md, "| 🟢 On Track | {} |", health.on_track)?;
    writeln!(md, "| ⏳ Not Started | {} |", health.not_started)?;
    if health.with_blockers > 0 {
        writeln!(md, "| ⚠️ **Projects with Blockers** | **{}** |", health.with_blockers)?;
    }
    md.push('\n');

    let flagged = portfolio.requiring_attention();
    if flagged.is_empty() {
        return Ok(());
    }
    md.push_str("### ⚠️ Projects Requiring Attention\n\n");
    for ProjectProgress { snapshot, aggregate } in flagged {
        writeln!(md, "- **[#{}]({}) {}**", snapshot.number, snapshot.url, snapshot.title)?;
        if aggregate.has_risk(RiskKind::HasBlockers) {
            writeln!(md, "  - 🚫 {} blocked tasks", aggregate.blocked)?;
        }
        if aggregate.has_risk(RiskKind::LowProgressStalled) {
            writeln!(
                md,
                "  - ⚠️ Low progress ({}%) with no active tasks",
                aggregate.progress_percent
            )?;
        }
    }
    md.push('\n');
    Ok(())
}
