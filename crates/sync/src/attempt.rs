//! Best-effort execution of remote operations.

use std::fmt::Display;
use std::future::Future;

use populator_directory::DirectoryError;
use tracing::{debug, warn};

/// How a swallowed failure degrades the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// A label or field could not be created; its index entry stays absent.
    Reconciliation,
    /// A field value could not be written on an item that does exist.
    FieldValue,
}

/// Run `operation`, turning a directory failure into `None`.
///
/// Reconciliation failures are logged as warnings. Field value failures are
/// absorbed at debug level and never surface in the run summary.
pub async fn attempt<T, F>(degradation: Degradation, what: impl Display, operation: F) -> Option<T>
where
    F: Future<Output = Result<T, DirectoryError>>,
{
    match operation.await {
        Ok(value) => Some(value),
        Err(error) => {
            match degradation {
                Degradation::Reconciliation => {
                    warn!(subject = %what, %error, "remote create rejected, continuing without it");
                }
                Degradation::FieldValue => {
                    debug!(subject = %what, %error, "field value not set");
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn success_passes_value_through() {
        let value = attempt(Degradation::Reconciliation, "label qa", async {
            Ok::<_, DirectoryError>(7)
        })
        .await;
        assert_eq!(value, Some(7));
    }

    #[tokio::test]
    async fn failure_becomes_none() {
        let value: Option<u32> = attempt(Degradation::FieldValue, "Status", async {
            Err(DirectoryError::DuplicateOrInvalid("taken".to_string()))
        })
        .await;
        assert!(value.is_none());
    }
}
