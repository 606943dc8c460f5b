//! Run configuration from flags and the environment.

use std::path::PathBuf;

use clap::Args;
use populator_core::{ProjectTemplate, TemplateError};
use populator_directory::DEFAULT_ENDPOINT;
use populator_sync::{SyncError, Target};

/// A setting a command cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Required {
    Token,
    Owner,
    Repo,
    ProjectNumber,
}

impl Required {
    /// Environment variable that supplies this setting.
    pub fn env_name(&self) -> &'static str {
        match self {
            Required::Token => "GITHUB_TOKEN",
            Required::Owner => "GITHUB_OWNER",
            Required::Repo => "GITHUB_REPO",
            Required::ProjectNumber => "PROJECT_NUMBER",
        }
    }
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Owner login (user or organization)
    #[arg(long, env = "GITHUB_OWNER", global = true)]
    pub owner: Option<String>,

    /// Repository that receives labels and issues
    #[arg(long, env = "GITHUB_REPO", global = true)]
    pub repo: Option<String>,

    /// Existing project to populate or report on
    #[arg(long, env = "PROJECT_NUMBER", global = true)]
    pub project_number: Option<u64>,

    /// Client name used in new project titles
    #[arg(long, env = "CLIENT_NAME", default_value = "Client Project", global = true)]
    pub client_name: String,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    pub graphql_url: String,

    /// JSON template file. The built-in WordPress template is used when absent.
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(long, default_value = "reports", global = true)]
    pub out_dir: PathBuf,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl Settings {
    /// Check every required setting, naming all that are missing at once.
    pub fn validate_for(&self, required: &[Required]) -> Result<(), SyncError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|r| !self.has(**r))
            .map(|r| r.env_name().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Configuration { missing })
        }
    }

    fn has(&self, required: Required) -> bool {
        match required {
            Required::Token => present(&self.token),
            Required::Owner => present(&self.owner),
            Required::Repo => present(&self.repo),
            Required::ProjectNumber => self.project_number.is_some(),
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }

    pub fn owner(&self) -> &str {
        self.owner.as_deref().unwrap_or_default()
    }

    pub fn repo(&self) -> &str {
        self.repo.as_deref().unwrap_or_default()
    }

    /// Where a populate run writes to.
    pub fn target(&self) -> Target {
        Target {
            owner: self.owner().to_string(),
            repo: self.repo().to_string(),
            project_number: self.project_number,
            client_name: self.client_name.clone(),
        }
    }

    /// The configured template, or the built-in one.
    pub fn load_template(&self) -> Result<ProjectTemplate, TemplateError> {
        match &self.template {
            Some(path) => ProjectTemplate::load(path),
            None => ProjectTemplate::wordpress(),
        }
    }
}
