//! Fatal errors of a populate run.

use populator_directory::DirectoryError;

/// Stage of run setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Resolving the target repository
    Repository,
    /// Resolving the project owner
    Owner,
    /// Fetching existing labels
    Labels,
    /// Loading or creating the project
    Project,
}

impl std::fmt::Display for SetupStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SetupStage::Repository => "repository lookup",
            SetupStage::Owner => "owner lookup",
            SetupStage::Labels => "label lookup",
            SetupStage::Project => "project setup",
        })
    }
}

/// Errors that abort a run. Everything else degrades and is logged.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Required identifying parameters are missing
    #[error("missing required configuration: {}", .missing.join(", "))]
    Configuration {
        /// Names of the missing parameters
        missing: Vec<String>,
    },

    /// Identity, repository or project resolution failed
    #[error("{stage} failed: {source}")]
    Setup {
        /// Failing stage
        stage: SetupStage,
        /// Underlying directory error
        #[source]
        source: DirectoryError,
    },
}

impl SyncError {
    /// Build a closure mapping a directory error onto a setup failure.
    pub fn setup(stage: SetupStage) -> impl FnOnce(DirectoryError) -> SyncError {
        move |source| SyncError::Setup { stage, source }
    }

    /// Nested API messages, for reporting.
    pub fn details(&self) -> Vec<String> {
        match self {
            SyncError::Configuration { .. } => Vec::new(),
            SyncError::Setup { source, .. } => source.messages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_lists_every_missing_name() {
        let err = SyncError::Configuration {
            missing: vec!["GITHUB_TOKEN".to_string(), "GITHUB_REPO".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required configuration: GITHUB_TOKEN, GITHUB_REPO"
        );
        assert!(err.details().is_empty());
    }

    #[test]
    fn setup_error_names_stage_and_keeps_details() {
        let err = SyncError::setup(SetupStage::Owner)(DirectoryError::Api {
            messages: vec!["bad credentials".to_string()],
        });
        assert_eq!(err.to_string(), "owner lookup failed: API error: bad credentials");
        assert_eq!(err.details(), vec!["bad credentials"]);
    }
}
