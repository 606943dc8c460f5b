//! Identifiers for entities that live in the remote project service.
//!
//! The service hands out opaque node ids. They are wrapped in newtypes so a
//! field id can never be passed where an option id is expected.

use serde::{Deserialize, Serialize};

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw node id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw node id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

remote_id!(
    /// Node id of a user or organization that owns projects.
    OwnerId
);

remote_id!(
    /// Node id of a repository.
    RepositoryId
);

remote_id!(
    /// Node id of a project board.
    ProjectId
);

remote_id!(
    /// Node id of a custom project field.
    FieldId
);

remote_id!(
    /// Node id of a single-select option.
    OptionId
);

remote_id!(
    /// Node id of a repository label.
    LabelId
);

remote_id!(
    /// Node id of an issue.
    IssueId
);

remote_id!(
    /// Node id of a project item.
    ItemId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = FieldId::new("PVTF_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"PVTF_abc\"");
        let back: FieldId = serde_json::from_str("\"PVTF_abc\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "PVTF_abc");
    }
}
