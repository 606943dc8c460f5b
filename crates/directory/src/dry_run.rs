//! Directory that fabricates placeholder ids instead of calling the service.
//!
//! Every write succeeds with a `dry-run-*` id so a populate run walks the same
//! path it would against the real service. Reads return empty state.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use populator_core::{
    FieldId, FieldOption, IssueId, ItemId, LabelDefinition, LabelId, OptionId, OwnerId,
    ProjectId, ProjectSnapshot, ProjectSummary, RepositoryId,
};
use tracing::debug;

use crate::types::{
    CreatedIssue, CreatedProject, FieldValueInput, OptionInput, OwnerKind, RemoteLabel,
    RemoteProject,
};
use crate::{ProjectDirectory, Result};

/// Project number handed out for projects "created" in a dry run.
pub const DRY_RUN_PROJECT_NUMBER: u64 = 999;

/// Placeholder directory for dry runs.
#[derive(Debug, Default)]
pub struct DryRunDirectory {
    issues: AtomicU64,
    field_writes: AtomicU64,
}

impl DryRunDirectory {
    /// Create a dry-run directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Field values "written" so far.
    pub fn field_writes(&self) -> u64 {
        self.field_writes.load(Ordering::Relaxed)
    }

    fn next_issue(&self) -> u64 {
        self.issues.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[async_trait]
impl ProjectDirectory for DryRunDirectory {
    async fn fetch_owner_id(&self, login: &str, _kind: OwnerKind) -> Result<OwnerId> {
        Ok(OwnerId::new(format!("dry-run-owner-{}", login)))
    }

    async fn fetch_repository_id(&self, owner: &str, repo: &str) -> Result<RepositoryId> {
        Ok(RepositoryId::new(format!("dry-run-repo-{}-{}", owner, repo)))
    }

    async fn fetch_labels(&self, _owner: &str, _repo: &str) -> Result<Vec<RemoteLabel>> {
        Ok(Vec::new())
    }

    async fn create_label(
        &self,
        _repository_id: &RepositoryId,
        label: &LabelDefinition,
    ) -> Result<RemoteLabel> {
        debug!(label = %label.name, "dry run: create label");
        Ok(RemoteLabel {
            id: LabelId::new(format!("dry-run-{}", label.name)),
            name: label.name.clone(),
        })
    }

    async fn create_issue(
        &self,
        _repository_id: &RepositoryId,
        title: &str,
        _body: &str,
        label_ids: &[LabelId],
    ) -> Result<CreatedIssue> {
        let number = self.next_issue();
        debug!(%title, labels = label_ids.len(), "dry run: create issue");
        Ok(CreatedIssue {
            id: IssueId::new(format!("dry-run-issue-{}", number)),
            number,
            url: format!("dry-run://issues/{}", number),
        })
    }

    async fn fetch_project(
        &self,
        owner: &str,
        _kind: OwnerKind,
        number: u64,
    ) -> Result<RemoteProject> {
        Ok(RemoteProject {
            id: ProjectId::new("dry-run-project-id"),
            number,
            title: format!("{} project #{}", owner, number),
            url: format!("dry-run://projects/{}", number),
            fields: Vec::new(),
        })
    }

    async fn create_project(&self, _owner_id: &OwnerId, title: &str) -> Result<CreatedProject> {
        debug!(%title, "dry run: create project");
        Ok(CreatedProject {
            id: ProjectId::new("dry-run-project-id"),
            number: DRY_RUN_PROJECT_NUMBER,
            url: format!("dry-run://projects/{}", DRY_RUN_PROJECT_NUMBER),
        })
    }

    async fn create_single_select_field(
        &self,
        _project_id: &ProjectId,
        name: &str,
    ) -> Result<FieldId> {
        Ok(FieldId::new(format!("dry-run-field-{}", slug(name))))
    }

    async fn create_number_field(&self, _project_id: &ProjectId, name: &str) -> Result<FieldId> {
        Ok(FieldId::new(format!("dry-run-field-{}", slug(name))))
    }

    async fn set_single_select_options(
        &self,
        _project_id: &ProjectId,
        field_id: &FieldId,
        _name: &str,
        options: &[OptionInput],
    ) -> Result<Vec<FieldOption>> {
        Ok(options
            .iter()
            .enumerate()
            .map(|(i, option)| FieldOption {
                id: OptionId::new(format!("{}-option-{}", field_id, i)),
                name: option.name.clone(),
            })
            .collect())
    }

    async fn add_item_to_project(
        &self,
        _project_id: &ProjectId,
        content_id: &IssueId,
    ) -> Result<ItemId> {
        Ok(ItemId::new(format!("{}-item", content_id)))
    }

    async fn set_item_field_value(
        &self,
        _project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        value: &FieldValueInput,
    ) -> Result<()> {
        self.field_writes.fetch_add(1, Ordering::Relaxed);
        debug!(item = %item_id, field = %field_id, ?value, "dry run: set field value");
        Ok(())
    }

    async fn list_projects(&self, _owner: &str, _kind: OwnerKind) -> Result<Vec<ProjectSummary>> {
        Ok(Vec::new())
    }

    async fn fetch_project_with_items(
        &self,
        _owner: &str,
        _kind: OwnerKind,
        number: u64,
    ) -> Result<ProjectSnapshot> {
        let now = chrono::Utc::now();
        Ok(ProjectSnapshot {
            id: ProjectId::new("dry-run-project-id"),
            number,
            title: format!("Dry run project #{}", number),
            url: format!("dry-run://projects/{}", number),
            closed: false,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            total_item_count: 0,
        })
    }

    async fn fetch_all_projects_with_items(
        &self,
        _owner: &str,
        _kind: OwnerKind,
    ) -> Result<Vec<ProjectSnapshot>> {
        Ok(Vec::new())
    }
}
