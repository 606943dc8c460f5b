//! Scripted in-memory directory for unit tests.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use populator_core::{
    FieldId, FieldOption, IssueId, ItemId, LabelDefinition, LabelId, OptionId, OwnerId,
    ProjectId, ProjectSnapshot, ProjectSummary, RemoteField, RepositoryId,
};
use populator_directory::{
    CreatedIssue, CreatedProject, DirectoryError, FieldValueInput, OptionInput, OwnerKind,
    ProjectDirectory, RemoteLabel, RemoteProject, Result,
};

#[derive(Debug, Clone)]
pub struct StoredProject {
    pub id: ProjectId,
    pub number: u64,
    pub title: String,
    pub fields: Vec<RemoteField>,
}

#[derive(Debug, Clone)]
pub struct StoredIssue {
    pub id: IssueId,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub label_ids: Vec<LabelId>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Calls {
    pub create_label: usize,
    pub create_field: usize,
    pub set_options: usize,
    pub create_project: usize,
    pub create_issue: usize,
    pub set_value: usize,
}

#[derive(Debug, Default)]
pub struct State {
    pub users: HashSet<String>,
    pub organizations: HashSet<String>,
    pub user_lookup_broken: bool,
    pub labels: Vec<RemoteLabel>,
    pub projects: Vec<StoredProject>,
    pub issues: Vec<StoredIssue>,
    pub items: Vec<(ProjectId, IssueId, ItemId)>,
    pub values: Vec<(ItemId, FieldId, FieldValueInput)>,
    pub reject_fields: HashSet<String>,
    pub reject_issue_titles: HashSet<String>,
    pub reject_project_titles: HashSet<String>,
    pub fail_label_fetch: bool,
    pub fail_add_item: bool,
    pub fail_field_values: bool,
    pub calls: Calls,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }
}

/// A directory whose state and failures are set up by the test.
///
/// New projects come with the service's built-in `Title` and `Status`
/// fields, like the real service.
#[derive(Debug, Default)]
pub struct ScriptedDirectory {
    state: Mutex<State>,
}

impl ScriptedDirectory {
    /// Directory where `acme` is a user.
    pub fn new() -> Self {
        Self::with(|_| {})
    }

    /// Directory where `acme` is a user, adjusted by `setup`.
    pub fn with(setup: impl FnOnce(&mut State)) -> Self {
        let mut state = State::default();
        state.users.insert("acme".to_string());
        setup(&mut state);
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

fn builtin_fields(state: &mut State) -> Vec<RemoteField> {
    let title = RemoteField {
        id: FieldId::new(state.next_id("F")),
        name: "Title".to_string(),
        options: None,
    };
    let mut options = Vec::new();
    for name in ["Todo", "In Progress", "Done"] {
        options.push(FieldOption {
            id: OptionId::new(state.next_id("O")),
            name: name.to_string(),
        });
    }
    let status = RemoteField {
        id: FieldId::new(state.next_id("F")),
        name: "Status".to_string(),
        options: Some(options),
    };
    vec![title, status]
}

impl State {
    fn project_mut(&mut self, id: &ProjectId) -> Result<&mut StoredProject> {
        self.projects
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DirectoryError::NotFound(format!("project {}", id)))
    }

    fn create_field(&mut self, project_id: &ProjectId, name: &str, single: bool) -> Result<FieldId> {
        self.calls.create_field += 1;
        if self.reject_fields.contains(name) {
            return Err(DirectoryError::Api {
                messages: vec![format!("cannot create {}", name)],
            });
        }
        let id = FieldId::new(self.next_id("F"));
        let project = self.project_mut(project_id)?;
        if project.fields.iter().any(|f| f.name == name) {
            return Err(DirectoryError::DuplicateOrInvalid(format!(
                "Name {} has already been taken",
                name
            )));
        }
        project.fields.push(RemoteField {
            id: id.clone(),
            name: name.to_string(),
            options: single.then(Vec::new),
        });
        Ok(id)
    }
}

#[async_trait]
impl ProjectDirectory for ScriptedDirectory {
    async fn fetch_owner_id(&self, login: &str, kind: OwnerKind) -> Result<OwnerId> {
        let state = self.state();
        match kind {
            OwnerKind::User if state.user_lookup_broken => Err(DirectoryError::Api {
                messages: vec!["Bad credentials".to_string()],
            }),
            OwnerKind::User if state.users.contains(login) => {
                Ok(OwnerId::new(format!("U_{}", login)))
            }
            OwnerKind::Organization if state.organizations.contains(login) => {
                Ok(OwnerId::new(format!("O_{}", login)))
            }
            _ => Err(DirectoryError::NotFound(format!("{} {}", kind, login))),
        }
    }

    async fn fetch_repository_id(&self, owner: &str, repo: &str) -> Result<RepositoryId> {
        Ok(RepositoryId::new(format!("R_{}_{}", owner, repo)))
    }

    async fn fetch_labels(&self, _owner: &str, _repo: &str) -> Result<Vec<RemoteLabel>> {
        let state = self.state();
        if state.fail_label_fetch {
            return Err(DirectoryError::Http {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(state.labels.clone())
    }

    async fn create_label(
        &self,
        _repository_id: &RepositoryId,
        label: &LabelDefinition,
    ) -> Result<RemoteLabel> {
        let mut state = self.state();
        state.calls.create_label += 1;
        let lowered = label.name.to_lowercase();
        if state.labels.iter().any(|l| l.name.to_lowercase() == lowered) {
            return Err(DirectoryError::DuplicateOrInvalid(format!(
                "Name {} has already been taken",
                label.name
            )));
        }
        let created = RemoteLabel {
            id: LabelId::new(state.next_id("L")),
            name: label.name.clone(),
        };
        state.labels.push(created.clone());
        Ok(created)
    }

    async fn create_issue(
        &self,
        _repository_id: &RepositoryId,
        title: &str,
        body: &str,
        label_ids: &[LabelId],
    ) -> Result<CreatedIssue> {
        let mut state = self.state();
        state.calls.create_issue += 1;
        if state.reject_issue_titles.contains(title) {
            return Err(DirectoryError::Api {
                messages: vec!["issue rejected".to_string()],
            });
        }
        let number = state.issues.len() as u64 + 1;
        let issue = StoredIssue {
            id: IssueId::new(state.next_id("I")),
            number,
            title: title.to_string(),
            body: body.to_string(),
            label_ids: label_ids.to_vec(),
        };
        state.issues.push(issue.clone());
        Ok(CreatedIssue {
            id: issue.id,
            number,
            url: format!("https://example.test/issues/{}", number),
        })
    }

    async fn fetch_project(
        &self,
        _owner: &str,
        _kind: OwnerKind,
        number: u64,
    ) -> Result<RemoteProject> {
        let state = self.state();
        let project = state
            .projects
            .iter()
            .find(|p| p.number == number)
            .ok_or_else(|| DirectoryError::NotFound(format!("project #{}", number)))?;
        Ok(RemoteProject {
            id: project.id.clone(),
            number: project.number,
            title: project.title.clone(),
            url: format!("https://example.test/projects/{}", project.number),
            fields: project.fields.clone(),
        })
    }

    async fn create_project(&self, _owner_id: &OwnerId, title: &str) -> Result<CreatedProject> {
        let mut state = self.state();
        state.calls.create_project += 1;
        if state.reject_project_titles.contains(title) {
            return Err(DirectoryError::Api {
                messages: vec!["project limit reached".to_string()],
            });
        }
        let number = state.projects.len() as u64 + 1;
        let id = ProjectId::new(state.next_id("PVT"));
        let fields = builtin_fields(&mut state);
        state.projects.push(StoredProject {
            id: id.clone(),
            number,
            title: title.to_string(),
            fields,
        });
        Ok(CreatedProject {
            id,
            number,
            url: format!("https://example.test/projects/{}", number),
        })
    }

    async fn create_single_select_field(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<FieldId> {
        self.state().create_field(project_id, name, true)
    }

    async fn create_number_field(&self, project_id: &ProjectId, name: &str) -> Result<FieldId> {
        self.state().create_field(project_id, name, false)
    }

    async fn set_single_select_options(
        &self,
        project_id: &ProjectId,
        field_id: &FieldId,
        _name: &str,
        options: &[OptionInput],
    ) -> Result<Vec<FieldOption>> {
        let mut state = self.state();
        state.calls.set_options += 1;
        let assigned: Vec<FieldOption> = options
            .iter()
            .map(|o| FieldOption {
                id: OptionId::new(state.next_id("O")),
                name: o.name.clone(),
            })
            .collect();
        let project = state.project_mut(project_id)?;
        let field = project
            .fields
            .iter_mut()
            .find(|f| &f.id == field_id)
            .ok_or_else(|| DirectoryError::NotFound(format!("field {}", field_id)))?;
        field.options = Some(assigned.clone());
        Ok(assigned)
    }

    async fn add_item_to_project(
        &self,
        project_id: &ProjectId,
        content_id: &IssueId,
    ) -> Result<ItemId> {
        let mut state = self.state();
        if state.fail_add_item {
            return Err(DirectoryError::Api {
                messages: vec!["item rejected".to_string()],
            });
        }
        let item = ItemId::new(state.next_id("PVTI"));
        state
            .items
            .push((project_id.clone(), content_id.clone(), item.clone()));
        Ok(item)
    }

    async fn set_item_field_value(
        &self,
        _project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        value: &FieldValueInput,
    ) -> Result<()> {
        let mut state = self.state();
        state.calls.set_value += 1;
        if state.fail_field_values {
            return Err(DirectoryError::Api {
                messages: vec!["field value rejected".to_string()],
            });
        }
        state
            .values
            .push((item_id.clone(), field_id.clone(), value.clone()));
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
        Err(DirectoryError::NotFound(format!("project #{}", number)))
    }

    async fn fetch_all_projects_with_items(
        &self,
        _owner: &str,
        _kind: OwnerKind,
    ) -> Result<Vec<ProjectSnapshot>> {
        Ok(Vec::new())
    }
}
