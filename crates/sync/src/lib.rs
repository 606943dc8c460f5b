//! Sync layer - reconciles a project with a template and creates its tasks.

pub mod attempt;
pub mod batch;
pub mod body;
pub mod error;
pub mod identity;
pub mod materializer;
pub mod populate;
pub mod reconciler;

#[cfg(test)]
mod testing;

pub use attempt::{attempt, Degradation};
pub use batch::{create_batch, BatchClient, BatchOutcome, BatchProject};
pub use body::{issue_body, issue_title};
pub use error::{SetupStage, SyncError};
pub use identity::resolve_owner_identity;
pub use materializer::{CreatedTask, Materializer, TaskOutcome, INITIAL_STATUS};
pub use populate::{Pacing, Populator, RunSummary, TaskReport};
pub use reconciler::{project_title, ProjectHandle, Reconciler, Reconciliation, Target};
