//! Turns template tasks into issues on the project board.

use populator_core::{field_keys, FieldId, ItemId, Phase, Task};
use populator_directory::{FieldValueInput, ProjectDirectory};
use tracing::debug;

use crate::attempt::{attempt, Degradation};
use crate::body::{issue_body, issue_title};
use crate::reconciler::Reconciliation;

/// Status option every new item starts in.
pub const INITIAL_STATUS: &str = "Backlog";

/// A task that now exists as an issue and project item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub issue_number: u64,
    pub url: String,
    pub item_id: ItemId,
    /// Field values written successfully
    pub fields_set: usize,
    /// Task labels with no resolved id
    pub dropped_labels: Vec<String>,
}

/// Result of materializing one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Created(CreatedTask),
    /// Issue creation or project attachment failed
    Failed(String),
}

impl TaskOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, TaskOutcome::Created(_))
    }
}

/// Creates one issue per task against a reconciled project.
pub struct Materializer<'a, D: ?Sized> {
    directory: &'a D,
    state: &'a Reconciliation,
}

impl<'a, D> Materializer<'a, D>
where
    D: ProjectDirectory + ?Sized,
{
    pub fn new(directory: &'a D, state: &'a Reconciliation) -> Self {
        Self { directory, state }
    }

    /// Create the issue, attach it to the project and set its fields.
    ///
    /// Only issue creation and attachment can fail the task. Missing labels
    /// are dropped and field writes are best effort.
    pub async fn materialize(&self, phase: &Phase, task: &Task) -> TaskOutcome {
        let title = issue_title(phase, task);
        let body = issue_body(phase, task);

        let (label_ids, dropped) = self.state.labels.resolve(&task.labels);
        let dropped_labels: Vec<String> = dropped.into_iter().map(str::to_string).collect();
        if !dropped_labels.is_empty() {
            debug!(task = %task.title, labels = ?dropped_labels, "labels unavailable, omitted");
        }

        let issue = match self
            .directory
            .create_issue(&self.state.repository_id, &title, &body, &label_ids)
            .await
        {
            Ok(issue) => issue,
            Err(e) => return TaskOutcome::Failed(format!("issue creation failed: {}", e)),
        };

        let item_id = match self
            .directory
            .add_item_to_project(&self.state.project.id, &issue.id)
            .await
        {
            Ok(item) => item,
            Err(e) => {
                return TaskOutcome::Failed(format!(
                    "issue #{} not added to project: {}",
                    issue.number, e
                ))
            }
        };

        let fields_set = self.set_fields(&item_id, phase, task).await;

        TaskOutcome::Created(CreatedTask {
            issue_number: issue.number,
            url: issue.url,
            item_id,
            fields_set,
            dropped_labels,
        })
    }

    /// Write phase, priority, status and time allocation. Each write is
    /// skipped when its field or option is not resolved.
    async fn set_fields(&self, item_id: &ItemId, phase: &Phase, task: &Task) -> usize {
        let fields = &self.state.fields;
        let mut writes: Vec<(&str, &FieldId, FieldValueInput)> = Vec::new();

        if let Some(entry) = fields.get(field_keys::PHASE) {
            if let Some(option) = entry.option_for_phase(phase) {
                writes.push(("phase", &entry.id, FieldValueInput::SingleSelect(option.clone())));
            }
        }
        if let Some(entry) = fields.get(field_keys::PRIORITY) {
            if let Some(option) = entry.option_id(task.priority.as_str()) {
                writes.push(("priority", &entry.id, FieldValueInput::SingleSelect(option.clone())));
            }
        }
        if let Some(entry) = fields.get(field_keys::STATUS) {
            if let Some(option) = entry.option_id(INITIAL_STATUS) {
                writes.push(("status", &entry.id, FieldValueInput::SingleSelect(option.clone())));
            }
        }
        if let Some(entry) = fields.get(field_keys::TIME_ALLOCATION) {
            writes.push(("time allocation", &entry.id, FieldValueInput::Number(task.percentage)));
        }

        let mut set = 0;
        for (name, field_id, value) in writes {
            let write = self.directory.set_item_field_value(
                &self.state.project.id,
                item_id,
                field_id,
                &value,
            );
            if attempt(Degradation::FieldValue, name, write).await.is_some() {
                set += 1;
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::{Reconciler, Target};
    use crate::testing::ScriptedDirectory;
    use populator_core::{
        FieldEntry, FieldOption, LabelId, OptionId, Priority, ProjectTemplate,
    };

    fn target() -> Target {
        Target {
            owner: "acme".to_string(),
            repo: "site".to_string(),
            project_number: None,
            client_name: "Acme".to_string(),
        }
    }

    async fn reconciled(dir: &ScriptedDirectory, template: &ProjectTemplate) -> Reconciliation {
        Reconciler::new(dir, template).reconcile(&target()).await.unwrap()
    }

    fn first_task(template: &ProjectTemplate) -> (&Phase, &Task) {
        let phase = &template.phases[0];
        (phase, &phase.tasks[0])
    }

    #[tokio::test]
    async fn created_task_sets_resolvable_fields() {
        let template = ProjectTemplate::wordpress().unwrap();
        let dir = ScriptedDirectory::new();
        let state = reconciled(&dir, &template).await;
        let (phase, task) = first_task(&template);

        let outcome = Materializer::new(&dir, &state).materialize(phase, task).await;
        let TaskOutcome::Created(created) = outcome else {
            panic!("expected created task");
        };
        // Built-in Status has no Backlog option, so three fields are written.
        assert_eq!(created.fields_set, 3);
        assert!(created.dropped_labels.is_empty());

        let s = dir.state();
        assert_eq!(s.issues.len(), 1);
        assert_eq!(s.issues[0].title, format!("[{}] {}", phase.name, task.title));
        assert_eq!(s.issues[0].label_ids.len(), task.labels.len());
        assert!(s
            .values
            .iter()
            .any(|(_, _, v)| *v == FieldValueInput::Number(task.percentage)));
    }

    #[tokio::test]
    async fn status_is_set_to_backlog_when_the_option_exists() {
        let template = ProjectTemplate::wordpress().unwrap();
        let dir = ScriptedDirectory::new();
        let mut state = reconciled(&dir, &template).await;
        let status = state.fields.get(field_keys::STATUS).unwrap().id.clone();
        state.fields.insert(
            field_keys::STATUS,
            FieldEntry::new(status.clone()).with_options(vec![FieldOption {
                id: OptionId::new("O_backlog"),
                name: "Backlog".to_string(),
            }]),
        );
        let (phase, task) = first_task(&template);

        Materializer::new(&dir, &state).materialize(phase, task).await;

        let s = dir.state();
        assert!(s.values.iter().any(|(_, field, value)| {
            *field == status && *value == FieldValueInput::SingleSelect(OptionId::new("O_backlog"))
        }));
    }

    #[tokio::test]
    async fn field_failures_do_not_fail_the_task() {
        let template = ProjectTemplate::wordpress().unwrap();
        let dir = ScriptedDirectory::new();
        let state = reconciled(&dir, &template).await;
        dir.state().fail_field_values = true;
        let (phase, task) = first_task(&template);

        let outcome = Materializer::new(&dir, &state).materialize(phase, task).await;
        let TaskOutcome::Created(created) = outcome else {
            panic!("expected created task");
        };
        assert_eq!(created.fields_set, 0);
        assert_eq!(dir.state().calls.set_value, 3);
    }

    #[tokio::test]
    async fn unknown_labels_are_omitted() {
        let template = ProjectTemplate::wordpress().unwrap();
        let dir = ScriptedDirectory::new();
        let mut state = reconciled(&dir, &template).await;
        state.labels = populator_core::LabelIndex::new();
        state.labels.insert("documentation", LabelId::new("L_doc"));
        let (phase, task) = first_task(&template);

        let outcome = Materializer::new(&dir, &state).materialize(phase, task).await;
        let TaskOutcome::Created(created) = outcome else {
            panic!("expected created task");
        };
        assert_eq!(created.dropped_labels, vec!["client-facing".to_string()]);
        assert_eq!(dir.state().issues[0].label_ids, vec![LabelId::new("L_doc")]);
    }

    #[tokio::test]
    async fn issue_rejection_fails_the_task() {
        let template = ProjectTemplate::wordpress().unwrap();
        let (phase, task) = first_task(&template);
        let title = issue_title(phase, task);
        let dir = ScriptedDirectory::with(|s| {
            s.reject_issue_titles.insert(title);
        });
        let state = reconciled(&dir, &template).await;

        let outcome = Materializer::new(&dir, &state).materialize(phase, task).await;
        assert!(matches!(outcome, TaskOutcome::Failed(ref reason) if reason.contains("issue rejected")));
        assert!(dir.state().items.is_empty());
    }

    #[tokio::test]
    async fn attachment_failure_fails_the_task() {
        let template = ProjectTemplate::wordpress().unwrap();
        let dir = ScriptedDirectory::with(|s| s.fail_add_item = true);
        let state = reconciled(&dir, &template).await;
        let (phase, task) = first_task(&template);

        let outcome = Materializer::new(&dir, &state).materialize(phase, task).await;
        assert!(matches!(outcome, TaskOutcome::Failed(ref reason) if reason.contains("#1")));
        assert_eq!(dir.state().calls.set_value, 0);
    }

    #[tokio::test]
    async fn priority_without_matching_option_is_skipped() {
        let template = ProjectTemplate::wordpress().unwrap();
        let dir = ScriptedDirectory::new();
        let mut state = reconciled(&dir, &template).await;
        let priority = state.fields.get(field_keys::PRIORITY).unwrap().id.clone();
        state.fields.insert(field_keys::PRIORITY, FieldEntry::new(priority.clone()));
        let (phase, task) = first_task(&template);
        assert_eq!(task.priority, Priority::Critical);

        Materializer::new(&dir, &state).materialize(phase, task).await;
        assert!(!dir.state().values.iter().any(|(_, field, _)| *field == priority));
    }
}
