//! GraphQL documents sent to the project service.
//!
//! Owner-scoped documents carry an `__OWNER__` placeholder that is replaced
//! with the `user` or `organization` root field before sending.

use crate::types::OwnerKind;

/// Placeholder for the owner root field.
const OWNER_ROOT: &str = "__OWNER__";

/// Items fetched per project. There is no pagination past this bound.
pub const ITEM_LIMIT: usize = 100;

/// Projects fetched by the portfolio query.
pub const PROJECT_LIMIT: usize = 50;

/// Projects fetched by the listing query.
pub const LISTING_LIMIT: usize = 20;

/// Substitute the owner root field into a document.
pub fn for_owner(document: &str, kind: OwnerKind) -> String {
    document.replace(OWNER_ROOT, kind.root_field())
}

pub const OWNER_ID: &str = r#"
query($owner: String!) {
  __OWNER__(login: $owner) {
    id
  }
}
"#;

pub const REPOSITORY_ID: &str = r#"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    id
  }
}
"#;

pub const LABELS: &str = r#"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    labels(first: 100) {
      nodes {
        id
        name
      }
    }
  }
}
"#;

pub const CREATE_LABEL: &str = r#"
mutation($repositoryId: ID!, $name: String!, $color: String!, $description: String) {
  createLabel(input: {
    repositoryId: $repositoryId
    name: $name
    color: $color
    description: $description
  }) {
    label {
      id
      name
    }
  }
}
"#;

pub const PROJECT: &str = r#"
query($owner: String!, $projectNumber: Int!) {
  __OWNER__(login: $owner) {
    projectV2(number: $projectNumber) {
      id
      number
      title
      url
      fields(first: 20) {
        nodes {
          ... on ProjectV2Field {
            id
            name
          }
          ... on ProjectV2SingleSelectField {
            id
            name
            options {
              id
              name
            }
          }
        }
      }
    }
  }
}
"#;

pub const CREATE_PROJECT: &str = r#"
mutation($ownerId: ID!, $title: String!) {
  createProjectV2(input: {
    ownerId: $ownerId
    title: $title
  }) {
    projectV2 {
      id
      number
      url
    }
  }
}
"#;

pub const CREATE_SINGLE_SELECT_FIELD: &str = r#"
mutation($projectId: ID!, $name: String!) {
  createProjectV2Field(input: {
    projectId: $projectId
    dataType: SINGLE_SELECT
    name: $name
  }) {
    projectV2Field {
      ... on ProjectV2SingleSelectField {
        id
        name
      }
    }
  }
}
"#;

pub const CREATE_NUMBER_FIELD: &str = r#"
mutation($projectId: ID!, $name: String!) {
  createProjectV2Field(input: {
    projectId: $projectId
    dataType: NUMBER
    name: $name
  }) {
    projectV2Field {
      ... on ProjectV2Field {
        id
        name
      }
    }
  }
}
"#;

pub const UPDATE_SINGLE_SELECT_FIELD: &str = r#"
mutation($projectId: ID!, $fieldId: ID!, $name: String!, $options: [ProjectV2SingleSelectFieldOptionInput!]!) {
  updateProjectV2Field(input: {
    projectId: $projectId
    fieldId: $fieldId
    name: $name
    singleSelectOptions: $options
  }) {
    projectV2Field {
      ... on ProjectV2SingleSelectField {
        id
        options {
          id
          name
        }
      }
    }
  }
}
"#;

pub const CREATE_ISSUE: &str = r#"
mutation($repositoryId: ID!, $title: String!, $body: String!, $labelIds: [ID!]) {
  createIssue(input: {
    repositoryId: $repositoryId
    title: $title
    body: $body
    labelIds: $labelIds
  }) {
    issue {
      id
      number
      url
    }
  }
}
"#;

pub const ADD_ITEM: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {
    projectId: $projectId
    contentId: $contentId
  }) {
    item {
      id
    }
  }
}
"#;

pub const UPDATE_ITEM_FIELD: &str = r#"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $value: ProjectV2FieldValue!) {
  updateProjectV2ItemFieldValue(input: {
    projectId: $projectId
    itemId: $itemId
    fieldId: $fieldId
    value: $value
  }) {
    projectV2Item {
      id
    }
  }
}
"#;

pub const LIST_PROJECTS: &str = r#"
query($owner: String!) {
  __OWNER__(login: $owner) {
    projectsV2(first: 20) {
      nodes {
        number
        title
        url
        closed
        createdAt
        items {
          totalCount
        }
      }
    }
  }
}
"#;

/// Shared selection for a project with its items and field values.
macro_rules! project_with_items {
    () => {
        r#"
        id
        number
        title
        url
        closed
        createdAt
        updatedAt
        items(first: 100) {
          totalCount
          nodes {
            id
            fieldValues(first: 20) {
              nodes {
                ... on ProjectV2ItemFieldTextValue {
                  text
                  field { ... on ProjectV2FieldCommon { name } }
                }
                ... on ProjectV2ItemFieldNumberValue {
                  number
                  field { ... on ProjectV2FieldCommon { name } }
                }
                ... on ProjectV2ItemFieldSingleSelectValue {
                  name
                  field { ... on ProjectV2FieldCommon { name } }
                }
              }
            }
            content {
              ... on Issue {
                number
                title
                url
                state
              }
            }
          }
        }
        "#
    };
}

pub const PROJECT_WITH_ITEMS: &str = concat!(
    r#"
query($owner: String!, $projectNumber: Int!) {
  __OWNER__(login: $owner) {
    projectV2(number: $projectNumber) {"#,
    project_with_items!(),
    r#"
    }
  }
}
"#
);

pub const ALL_PROJECTS_WITH_ITEMS: &str = concat!(
    r#"
query($owner: String!) {
  __OWNER__(login: $owner) {
    projectsV2(first: 50) {
      nodes {"#,
    project_with_items!(),
    r#"
      }
    }
  }
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_placeholder_is_substituted() {
        let user = for_owner(OWNER_ID, OwnerKind::User);
        assert!(user.contains("user(login: $owner)"));
        let org = for_owner(PROJECT_WITH_ITEMS, OwnerKind::Organization);
        assert!(org.contains("organization(login: $owner)"));
        assert!(!org.contains(OWNER_ROOT));
    }

    #[test]
    fn item_documents_share_the_bounded_selection() {
        assert!(PROJECT_WITH_ITEMS.contains(&format!("items(first: {})", ITEM_LIMIT)));
        assert!(ALL_PROJECTS_WITH_ITEMS.contains(&format!("projectsV2(first: {})", PROJECT_LIMIT)));
        assert!(LIST_PROJECTS.contains(&format!("projectsV2(first: {})", LISTING_LIMIT)));
    }
}
