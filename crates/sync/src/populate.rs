//! A complete populate run: reconcile, then materialize every task.

use std::time::Duration;

use populator_core::ProjectTemplate;
use populator_directory::ProjectDirectory;
use tracing::{info, warn};

use crate::error::SyncError;
use crate::materializer::{Materializer, TaskOutcome};
use crate::reconciler::{Reconciler, Target};

/// Delays between remote writes, to stay under rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each task
    pub between_tasks: Duration,
    /// Pause after each project in a batch
    pub between_projects: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            between_tasks: Duration::from_millis(100),
            between_projects: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    /// No delays. Used for dry runs and tests.
    pub fn none() -> Self {
        Self {
            between_tasks: Duration::ZERO,
            between_projects: Duration::ZERO,
        }
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Outcome of one task, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub phase: String,
    pub title: String,
    pub outcome: TaskOutcome,
}

/// What a populate run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub project_number: u64,
    pub project_url: String,
    pub project_title: String,
    /// Whether the run created the project
    pub project_created: bool,
    pub labels_created: usize,
    pub fields_created: usize,
    /// One entry per template task, in template order
    pub tasks: Vec<TaskReport>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.tasks.len()
    }

    pub fn created(&self) -> usize {
        self.tasks.iter().filter(|t| t.outcome.is_created()).count()
    }

    /// Tasks that failed, with their reasons.
    pub fn failed(&self) -> impl Iterator<Item = (&TaskReport, &str)> {
        self.tasks.iter().filter_map(|t| match &t.outcome {
            TaskOutcome::Failed(reason) => Some((t, reason.as_str())),
            TaskOutcome::Created(_) => None,
        })
    }
}

/// Populates one project from a template.
pub struct Populator<'a, D: ?Sized> {
    directory: &'a D,
    template: &'a ProjectTemplate,
    pacing: Pacing,
}

impl<'a, D> Populator<'a, D>
where
    D: ProjectDirectory + ?Sized,
{
    pub fn new(directory: &'a D, template: &'a ProjectTemplate) -> Self {
        Self {
            directory,
            template,
            pacing: Pacing::default(),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Reconcile the target and create every task.
    ///
    /// Fails only when setup fails. Once tasks are being created the batch
    /// always runs to the end and per-task failures land in the summary.
    pub async fn run(&self, target: &Target) -> Result<RunSummary, SyncError> {
        let state = Reconciler::new(self.directory, self.template)
            .reconcile(target)
            .await?;
        let materializer = Materializer::new(self.directory, &state);

        let total = self.template.task_count();
        info!(
            tasks = total,
            phases = self.template.phases.len(),
            project = state.project.number,
            "creating tasks"
        );

        let mut tasks = Vec::with_capacity(total);
        let mut position = 0;
        for phase in &self.template.phases {
            info!(phase = %phase.name, percentage = phase.percentage, days = phase.days, "phase");

            for task in &phase.tasks {
                position += 1;
                let outcome = materializer.materialize(phase, task).await;
                match &outcome {
                    TaskOutcome::Created(created) => {
                        info!("[{}/{}] {} (#{})", position, total, task.title, created.issue_number);
                    }
                    TaskOutcome::Failed(reason) => {
                        warn!("[{}/{}] {} failed: {}", position, total, task.title, reason);
                    }
                }
                tasks.push(TaskReport {
                    phase: phase.name.clone(),
                    title: task.title.clone(),
                    outcome,
                });
                pause(self.pacing.between_tasks).await;
            }
        }

        let summary = RunSummary {
            project_number: state.project.number,
            project_url: state.project.url,
            project_title: state.project.title,
            project_created: state.project.created,
            labels_created: state.labels_created,
            fields_created: state.fields_created,
            tasks,
        };
        info!(
            created = summary.created(),
            attempted = summary.attempted(),
            "populate complete"
        );
        Ok(summary)
    }
}
