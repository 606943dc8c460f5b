//! Idempotent setup of labels, project and custom fields.
//!
//! Everything that already exists remotely is reused by name. Only missing
//! labels and fields are created, and a rejected create degrades to an absent
//! index entry instead of failing the run.

use populator_core::{
    FieldEntry, FieldIndex, FieldKind, LabelIndex, ProjectId, ProjectTemplate, RemoteField,
    RepositoryId,
};
use populator_directory::{OptionInput, OwnerIdentity, ProjectDirectory};
use tracing::{debug, info};

use crate::attempt::{attempt, Degradation};
use crate::error::{SetupStage, SyncError};
use crate::identity::resolve_owner_identity;

/// Where a run writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Repository and project owner login
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Existing project to populate. A new project is created when absent.
    pub project_number: Option<u64>,
    /// Client name used in the title of a new project
    pub client_name: String,
}

/// Title of a client's project: `"<client> - <template name>"`.
pub fn project_title(client_name: &str, template_name: &str) -> String {
    format!("{} - {}", client_name, template_name)
}

impl Target {
    /// Title given to a project created for this target.
    pub fn project_title(&self, template: &ProjectTemplate) -> String {
        project_title(&self.client_name, &template.name)
    }
}

/// The project a run populates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    pub id: ProjectId,
    pub number: u64,
    pub url: String,
    pub title: String,
    /// Whether this run created the project
    pub created: bool,
}

/// Resolved remote state after reconciliation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub owner: OwnerIdentity,
    pub repository_id: RepositoryId,
    pub project: ProjectHandle,
    pub fields: FieldIndex,
    pub labels: LabelIndex,
    /// Labels created by this run
    pub labels_created: usize,
    /// Fields created by this run
    pub fields_created: usize,
}

/// Brings a repository and project in line with a template.
pub struct Reconciler<'a, D: ?Sized> {
    directory: &'a D,
    template: &'a ProjectTemplate,
}

impl<'a, D> Reconciler<'a, D>
where
    D: ProjectDirectory + ?Sized,
{
    pub fn new(directory: &'a D, template: &'a ProjectTemplate) -> Self {
        Self {
            directory,
            template,
        }
    }

    /// Reconcile repository labels, the project and its fields.
    ///
    /// Repository, owner, label listing and project resolution failures are
    /// fatal. Individual label and field creates are not.
    pub async fn reconcile(&self, target: &Target) -> Result<Reconciliation, SyncError> {
        let repository_id = self
            .directory
            .fetch_repository_id(&target.owner, &target.repo)
            .await
            .map_err(SyncError::setup(SetupStage::Repository))?;

        let owner = resolve_owner_identity(self.directory, &target.owner)
            .await
            .map_err(SyncError::setup(SetupStage::Owner))?;

        let (labels, labels_created) = self.reconcile_labels(target, &repository_id).await?;

        let (project, remote_fields) = self.resolve_project(target, &owner).await?;

        let (fields, fields_created) = self.reconcile_fields(&project.id, &remote_fields).await;

        info!(
            project = project.number,
            labels = labels.len(),
            labels_created,
            fields = fields.len(),
            fields_created,
            "reconciliation complete"
        );

        Ok(Reconciliation {
            owner,
            repository_id,
            project,
            fields,
            labels,
            labels_created,
            fields_created,
        })
    }

    /// Create every template label missing by exact name.
    pub async fn reconcile_labels(
        &self,
        target: &Target,
        repository_id: &RepositoryId,
    ) -> Result<(LabelIndex, usize), SyncError> {
        let existing = self
            .directory
            .fetch_labels(&target.owner, &target.repo)
            .await
            .map_err(SyncError::setup(SetupStage::Labels))?;

        let mut index = LabelIndex::new();
        for label in existing {
            index.insert(label.name, label.id);
        }

        let mut created = 0;
        for definition in &self.template.labels {
            if index.contains(&definition.name) {
                continue;
            }
            let what = format!("label {}", definition.name);
            let create = self.directory.create_label(repository_id, definition);
            if let Some(label) = attempt(Degradation::Reconciliation, what, create).await {
                index.insert(label.name, label.id);
                created += 1;
            }
        }

        debug!(known = index.len(), created, "labels reconciled");
        Ok((index, created))
    }

    /// Load the target project, or create one and load its built-in fields.
    pub async fn resolve_project(
        &self,
        target: &Target,
        owner: &OwnerIdentity,
    ) -> Result<(ProjectHandle, Vec<RemoteField>), SyncError> {
        if let Some(number) = target.project_number {
            let project = self
                .directory
                .fetch_project(&owner.login, owner.kind, number)
                .await
                .map_err(SyncError::setup(SetupStage::Project))?;
            info!(number, title = %project.title, "using existing project");
            let handle = ProjectHandle {
                id: project.id,
                number: project.number,
                url: project.url,
                title: project.title,
                created: false,
            };
            return Ok((handle, project.fields));
        }

        let title = target.project_title(self.template);
        let created = self
            .directory
            .create_project(&owner.id, &title)
            .await
            .map_err(SyncError::setup(SetupStage::Project))?;
        info!(number = created.number, %title, "created project");

        // New projects come with built-in fields such as Status.
        let refetch = self
            .directory
            .fetch_project(&owner.login, owner.kind, created.number);
        let fields = attempt(Degradation::Reconciliation, "new project fields", refetch)
            .await
            .map(|p| p.fields)
            .unwrap_or_default();

        let handle = ProjectHandle {
            id: created.id,
            number: created.number,
            url: created.url,
            title,
            created: true,
        };
        Ok((handle, fields))
    }

    /// Create every template field whose key is not yet resolved.
    pub async fn reconcile_fields(
        &self,
        project_id: &ProjectId,
        remote: &[RemoteField],
    ) -> (FieldIndex, usize) {
        let mut index = FieldIndex::from_remote(remote, &self.template.fields);
        let mut created = 0;

        for definition in &self.template.fields {
            let key = definition.normalized_key();
            if index.contains(&key) {
                continue;
            }
            let name = definition.display_name.as_str();
            let what = format!("field {}", name);

            let entry = match definition.kind {
                FieldKind::Number => {
                    let create = self.directory.create_number_field(project_id, name);
                    attempt(Degradation::Reconciliation, what, create)
                        .await
                        .map(FieldEntry::new)
                }
                FieldKind::SingleSelect => {
                    let create = self.directory.create_single_select_field(project_id, name);
                    match attempt(Degradation::Reconciliation, &what, create).await {
                        Some(field_id) => {
                            let inputs = OptionInput::from_names(&definition.options);
                            let assign = self.directory.set_single_select_options(
                                project_id, &field_id, name, &inputs,
                            );
                            let options = attempt(
                                Degradation::Reconciliation,
                                format!("{} options", what),
                                assign,
                            )
                            .await
                            .unwrap_or_default();
                            Some(FieldEntry::new(field_id).with_options(options))
                        }
                        None => None,
                    }
                }
                FieldKind::Text => {
                    debug!(field = name, "text fields are not created");
                    None
                }
            };

            if let Some(entry) = entry {
                index.insert(&key, entry);
                created += 1;
            }
        }

        debug!(known = index.len(), created, "fields reconciled");
        (index, created)
    }
}
