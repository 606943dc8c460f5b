//! Report file names and writing reports to disk.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use populator_core::Time;
use regex::Regex;
use tracing::info;

use crate::format::date;

/// Errors raised while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error
    #[error("failed to write report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

static NON_ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();

fn non_alphanumeric() -> &'static Regex {
    NON_ALPHANUMERIC.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("Invalid file name regex"))
}

/// Title reduced to lower-case ASCII letters, digits and underscores.
pub fn sanitize_title(title: &str) -> String {
    non_alphanumeric().replace_all(title, "_").to_lowercase()
}

/// `project_<n>_<sanitized title>_<YYYY-MM-DD>.md`
pub fn project_report_name(number: u64, title: &str, generated_at: &Time) -> String {
    format!(
        "project_{}_{}_{}.md",
        number,
        sanitize_title(title),
        date(generated_at)
    )
}

/// `all_projects_portfolio_<YYYY-MM-DD>.md`
pub fn portfolio_report_name(generated_at: &Time) -> String {
    format!("all_projects_portfolio_{}.md", date(generated_at))
}

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub async fn write_report(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, ReportError> {
    let path = dir.join(name);
    let io_error = |source| ReportError::Io {
        path: path.clone(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
    tokio::fs::write(&path, contents).await.map_err(io_error)?;

    info!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(path)
}
