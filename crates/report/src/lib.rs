//! Markdown reports
//!
//! Rendering is deterministic given its inputs: the generation time is passed
//! in and every ordering is fixed. The only I/O is [`write_report`].

pub mod format;
pub mod listing;
pub mod portfolio;
pub mod project;
pub mod writer;

#[cfg(test)]
mod testing;

pub use format::progress_bar;
pub use listing::render_listing;
pub use portfolio::{project_icon, render_portfolio};
pub use project::render_project;
pub use writer::{
    portfolio_report_name, project_report_name, sanitize_title, write_report, ReportError,
};

/// Closing line of every report.
pub const FOOTER: &str = "*Report generated by GitHub Project Populator*\n";
