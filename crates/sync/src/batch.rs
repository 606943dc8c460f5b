//! Creating one empty project per client.

use populator_directory::ProjectDirectory;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{SetupStage, SyncError};
use crate::identity::resolve_owner_identity;
use crate::populate::{pause, Pacing};
use crate::reconciler::project_title;

fn unassigned() -> String {
    "Unassigned".to_string()
}

/// A client that gets its own project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchClient {
    pub name: String,
    #[serde(rename = "type")]
    pub site_type: String,
    #[serde(default = "unassigned")]
    pub developer: String,
}

impl BatchClient {
    pub fn new(name: &str, site_type: &str, developer: &str) -> Self {
        Self {
            name: name.to_string(),
            site_type: site_type.to_string(),
            developer: developer.to_string(),
        }
    }

    /// Six sample clients, one per developer slot.
    pub fn defaults() -> Vec<BatchClient> {
        vec![
            BatchClient::new("Client Alpha", "E-Commerce", "Dev 4 (BE/Ecom)"),
            BatchClient::new("Client Beta", "Corporate", "Dev 1 (Lead)"),
            BatchClient::new("Client Gamma", "Portfolio", "Dev 2 (FE)"),
            BatchClient::new("Client Delta", "Blog", "Dev 3 (FE)"),
            BatchClient::new("Client Epsilon", "Static", "Dev 2 (FE)"),
            BatchClient::new("Client Zeta", "Dynamic", "Dev 5 (BE/Int)"),
        ]
    }
}

/// A project created for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProject {
    pub client: BatchClient,
    pub number: u64,
    pub url: String,
}

/// Projects created and clients that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub created: Vec<BatchProject>,
    pub failed: Vec<(BatchClient, String)>,
}

/// Create one project per client, best effort per client.
///
/// The owner is resolved once; failing that is the only fatal error.
pub async fn create_batch<D>(
    directory: &D,
    owner: &str,
    clients: &[BatchClient],
    template_name: &str,
    pacing: Pacing,
) -> Result<BatchOutcome, SyncError>
where
    D: ProjectDirectory + ?Sized,
{
    let identity = resolve_owner_identity(directory, owner)
        .await
        .map_err(SyncError::setup(SetupStage::Owner))?;

    let mut outcome = BatchOutcome::default();
    for client in clients {
        let title = project_title(&client.name, template_name);
        match directory.create_project(&identity.id, &title).await {
            Ok(project) => {
                info!(client = %client.name, number = project.number, "project created");
                outcome.created.push(BatchProject {
                    client: client.clone(),
                    number: project.number,
                    url: project.url,
                });
            }
            Err(e) => {
                warn!(client = %client.name, error = %e, "project creation failed");
                outcome.failed.push((client.clone(), e.to_string()));
            }
        }
        pause(pacing.between_projects).await;
    }

    Ok(outcome)
}
