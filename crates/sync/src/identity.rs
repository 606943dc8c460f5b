//! Owner identity resolution.

use populator_directory::{DirectoryError, OwnerIdentity, OwnerKind, ProjectDirectory};
use tracing::debug;

/// Resolve `login` as a user, falling back to an organization.
///
/// Only a typed not-found on the user lookup triggers the fallback. Any other
/// failure is returned as is.
pub async fn resolve_owner_identity<D>(
    directory: &D,
    login: &str,
) -> Result<OwnerIdentity, DirectoryError>
where
    D: ProjectDirectory + ?Sized,
{
    for kind in [OwnerKind::User, OwnerKind::Organization] {
        match directory.fetch_owner_id(login, kind).await {
            Ok(id) => {
                debug!(%login, %kind, "owner resolved");
                return Ok(OwnerIdentity {
                    id,
                    login: login.to_string(),
                    kind,
                });
            }
            Err(e) if e.is_not_found() && kind == OwnerKind::User => {
                debug!(%login, "not a user, trying organization");
            }
            Err(e) => return Err(e),
        }
    }

    Err(DirectoryError::NotFound(format!("owner {}", login)))
}
