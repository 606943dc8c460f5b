//! Project directory trait abstraction.

use async_trait::async_trait;
use populator_core::{
    FieldId, FieldOption, IssueId, ItemId, LabelDefinition, LabelId, OwnerId, ProjectId, ProjectSnapshot,
    ProjectSummary, RepositoryId,
};

use crate::types::{
    CreatedIssue, CreatedProject, FieldValueInput, OptionInput, OwnerKind, RemoteLabel,
    RemoteProject,
};

/// Error type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Errors that can occur talking to the project directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service rejected a create because the name collides or is invalid
    #[error("Duplicate or invalid: {0}")]
    DuplicateOrInvalid(String),

    /// The service answered with GraphQL errors
    #[error("API error: {}", .messages.join("; "))]
    Api {
        /// Every error message reported
        messages: Vec<String>,
    },

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Network or TLS failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A field the response must carry was null or absent
    #[error("Missing data at {0}")]
    MissingData(String),
}

impl DirectoryError {
    /// Whether this is a typed not-found failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }

    /// Individual messages, for nested error reporting.
    pub fn messages(&self) -> Vec<String> {
        match self {
            DirectoryError::Api { messages } => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Access to the remote issue tracker's repositories and project boards.
///
/// Implementations own transport and credentials. Every method is one remote
/// round trip; callers sequence them.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    // === Identity ===

    /// Node id of `login` as the given owner kind. `NotFound` if the login is
    /// not that kind of account.
    async fn fetch_owner_id(&self, login: &str, kind: OwnerKind) -> Result<OwnerId>;

    // === Repository ===

    /// Node id of a repository.
    async fn fetch_repository_id(&self, owner: &str, repo: &str) -> Result<RepositoryId>;

    /// Labels currently defined on a repository.
    async fn fetch_labels(&self, owner: &str, repo: &str) -> Result<Vec<RemoteLabel>>;

    /// Create a label. `DuplicateOrInvalid` when the name collides.
    async fn create_label(
        &self,
        repository_id: &RepositoryId,
        label: &LabelDefinition,
    ) -> Result<RemoteLabel>;

    /// Create an issue.
    async fn create_issue(
        &self,
        repository_id: &RepositoryId,
        title: &str,
        body: &str,
        label_ids: &[LabelId],
    ) -> Result<CreatedIssue>;

    // === Project ===

    /// Fetch an existing project and its fields.
    async fn fetch_project(
        &self,
        owner: &str,
        kind: OwnerKind,
        number: u64,
    ) -> Result<RemoteProject>;

    /// Create a project.
    async fn create_project(&self, owner_id: &OwnerId, title: &str) -> Result<CreatedProject>;

    /// Create a single-select field without options.
    async fn create_single_select_field(&self, project_id: &ProjectId, name: &str)
        -> Result<FieldId>;

    /// Create a number field.
    async fn create_number_field(&self, project_id: &ProjectId, name: &str) -> Result<FieldId>;

    /// Replace a single-select field's options, returning them with their ids.
    async fn set_single_select_options(
        &self,
        project_id: &ProjectId,
        field_id: &FieldId,
        name: &str,
        options: &[OptionInput],
    ) -> Result<Vec<FieldOption>>;

    /// Attach content (an issue) to a project.
    async fn add_item_to_project(&self, project_id: &ProjectId, content_id: &IssueId)
        -> Result<ItemId>;

    /// Write one field value on an item.
    async fn set_item_field_value(
        &self,
        project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        value: &FieldValueInput,
    ) -> Result<()>;

    // === Reporting ===

    /// Projects owned by `owner`, without items.
    async fn list_projects(&self, owner: &str, kind: OwnerKind) -> Result<Vec<ProjectSummary>>;

    /// One project with its items, capped at the fetch limit.
    async fn fetch_project_with_items(
        &self,
        owner: &str,
        kind: OwnerKind,
        number: u64,
    ) -> Result<ProjectSnapshot>;

    /// Every project of `owner` with items, capped at the fetch limits.
    async fn fetch_all_projects_with_items(
        &self,
        owner: &str,
        kind: OwnerKind,
    ) -> Result<Vec<ProjectSnapshot>>;
}
