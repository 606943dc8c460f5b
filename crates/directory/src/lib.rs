//! Project directory abstraction and implementations.
//!
//! This crate provides the trait the synchronizer and the reports talk
//! through, a GraphQL implementation for the live service, and a dry-run
//! implementation that fabricates ids.

#![warn(missing_docs)]

pub mod trait_;
pub mod types;
pub mod queries;
pub mod graphql;
pub mod dry_run;

pub use trait_::{ProjectDirectory, DirectoryError, Result};
pub use types::{
    OwnerKind, OwnerIdentity, RemoteLabel, RemoteProject, CreatedProject, CreatedIssue,
    OptionColor, OptionInput, FieldValueInput,
};
pub use graphql::{GraphqlDirectory, DEFAULT_ENDPOINT};
pub use dry_run::{DryRunDirectory, DRY_RUN_PROJECT_NUMBER};
