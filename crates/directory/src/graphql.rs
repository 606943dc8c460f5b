//! GraphQL-over-HTTP directory backed by the GitHub API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use populator_core::{
    FieldId, FieldOption, FieldValue, IssueContent, IssueId, Item, ItemId, LabelDefinition,
    LabelId, OptionId, OwnerId, ProjectId, ProjectSnapshot, ProjectSummary, RemoteField,
    RepositoryId, Time,
};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::queries::{self, for_owner};
use crate::types::{
    CreatedIssue, CreatedProject, FieldValueInput, OptionInput, OwnerKind, RemoteLabel,
    RemoteProject,
};
use crate::{DirectoryError, ProjectDirectory, Result};

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// Directory client speaking GraphQL to the remote service.
#[derive(Clone)]
pub struct GraphqlDirectory {
    /// HTTP client
    client: Client,

    /// GraphQL endpoint URL
    endpoint: String,

    /// Access token
    token: String,
}

impl GraphqlDirectory {
    /// Create a client for the public endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at another endpoint (GitHub Enterprise, a proxy).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Execute one document and decode its `data`.
    async fn execute<T: DeserializeOwned>(&self, document: &str, variables: Value) -> Result<T> {
        trace!(endpoint = %self.endpoint, "sending GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("bearer {}", self.token))
            .header(USER_AGENT, concat!("project-populator/", env!("CARGO_PKG_VERSION")))
            .json(&json!({ "query": document, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // GraphQL errors can come back with a non-2xx status too
            if let Ok(envelope) = serde_json::from_str::<Envelope<Value>>(&body) {
                if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
                    return Err(classify(errors));
                }
            }
            return Err(DirectoryError::Http {
                status: status.as_u16(),
                body,
            });
        }

        decode_envelope(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<Vec<ErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        return Err(classify(errors));
    }
    envelope
        .data
        .ok_or_else(|| DirectoryError::MissingData("data".to_string()))
}

/// Map GraphQL error entries onto the typed error kinds.
fn classify(errors: Vec<ErrorEntry>) -> DirectoryError {
    let messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
    let joined = messages.join("; ");

    if errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND")) {
        return DirectoryError::NotFound(joined);
    }

    let duplicate = errors.iter().any(|e| {
        e.kind.as_deref() == Some("UNPROCESSABLE") || {
            let message = e.message.to_lowercase();
            message.contains("already been taken") || message.contains("already exists")
        }
    });
    if duplicate {
        return DirectoryError::DuplicateOrInvalid(joined);
    }

    DirectoryError::Api { messages }
}

fn require<T>(value: Option<T>, path: &str) -> Result<T> {
    value.ok_or_else(|| DirectoryError::MissingData(path.to_string()))
}

// === Response shapes ===

#[derive(Debug, Deserialize)]
struct OwnerRoot<T> {
    #[serde(rename = "user", alias = "organization")]
    owner: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Node {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RepositoryRoot<T> {
    repository: Option<T>,
}

#[derive(Debug, Deserialize)]
struct LabelsHolder {
    labels: Nodes<RawLabel>,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    id: String,
    name: String,
}

impl From<RawLabel> for RemoteLabel {
    fn from(raw: RawLabel) -> Self {
        RemoteLabel {
            id: LabelId::new(raw.id),
            name: raw.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateLabelData {
    create_label: Option<LabelPayload>,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    label: Option<RawLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectHolder<T> {
    project_v2: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: String,
    number: u64,
    title: String,
    url: String,
    fields: Nodes<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    id: Option<String>,
    name: Option<String>,
    options: Option<Vec<RawOption>>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    id: String,
    name: String,
}

impl From<RawOption> for FieldOption {
    fn from(raw: RawOption) -> Self {
        FieldOption {
            id: OptionId::new(raw.id),
            name: raw.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectData {
    create_project_v2: Option<CreatedProjectPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedProjectPayload {
    project_v2: Option<RawCreatedProject>,
}

#[derive(Debug, Deserialize)]
struct RawCreatedProject {
    id: String,
    number: u64,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFieldData {
    create_project_v2_field: Option<FieldPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFieldData {
    update_project_v2_field: Option<FieldPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldPayload {
    project_v2_field: Option<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIssueData {
    create_issue: Option<IssuePayload>,
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    issue: Option<RawCreatedIssue>,
}

#[derive(Debug, Deserialize)]
struct RawCreatedIssue {
    id: String,
    number: u64,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddItemData {
    add_project_v2_item_by_id: Option<ItemPayload>,
}

#[derive(Debug, Deserialize)]
struct ItemPayload {
    item: Option<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectsHolder<T> {
    projects_v2: Nodes<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListedProject {
    number: u64,
    title: String,
    url: String,
    closed: bool,
    created_at: Time,
    items: ItemCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemCount {
    total_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    id: String,
    number: u64,
    title: String,
    url: String,
    closed: bool,
    created_at: Time,
    updated_at: Time,
    items: RawItems,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItems {
    total_count: usize,
    #[serde(default)]
    nodes: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    id: String,
    field_values: Nodes<RawFieldValue>,
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    number: Option<u64>,
    title: Option<String>,
    url: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFieldValue {
    text: Option<String>,
    number: Option<f64>,
    name: Option<String>,
    field: Option<RawFieldName>,
}

#[derive(Debug, Deserialize)]
struct RawFieldName {
    name: Option<String>,
}

impl From<RawSnapshot> for ProjectSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        ProjectSnapshot {
            id: ProjectId::new(raw.id),
            number: raw.number,
            title: raw.title,
            url: raw.url,
            closed: raw.closed,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            total_item_count: raw.items.total_count,
            items: raw.items.nodes.into_iter().map(Item::from).collect(),
        }
    }
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        // Pull requests and drafts come back as an empty content object
        let content = raw.content.and_then(|c| {
            Some(IssueContent {
                number: c.number?,
                title: c.title?,
                url: c.url?,
                state: c.state.unwrap_or_default(),
            })
        });

        let mut field_values = BTreeMap::new();
        for value in raw.field_values.nodes {
            let Some(field_name) = value.field.and_then(|f| f.name) else {
                continue;
            };
            let parsed = if let Some(name) = value.name {
                FieldValue::SingleSelect(name)
            } else if let Some(text) = value.text {
                FieldValue::Text(text)
            } else if let Some(number) = value.number {
                FieldValue::Number(number)
            } else {
                continue;
            };
            field_values.entry(field_name).or_insert(parsed);
        }

        Item {
            id: ItemId::new(raw.id),
            content,
            field_values,
        }
    }
}

fn remote_field(raw: RawField) -> Option<RemoteField> {
    Some(RemoteField {
        id: FieldId::new(raw.id?),
        name: raw.name?,
        options: raw
            .options
            .map(|options| options.into_iter().map(FieldOption::from).collect()),
    })
}

#[async_trait]
impl ProjectDirectory for GraphqlDirectory {
    async fn fetch_owner_id(&self, login: &str, kind: OwnerKind) -> Result<OwnerId> {
        let data: OwnerRoot<Node> = self
            .execute(&for_owner(queries::OWNER_ID, kind), json!({ "owner": login }))
            .await?;
        let node = data
            .owner
            .ok_or_else(|| DirectoryError::NotFound(format!("{} {}", kind, login)))?;
        Ok(OwnerId::new(node.id))
    }

    async fn fetch_repository_id(&self, owner: &str, repo: &str) -> Result<RepositoryId> {
        let data: RepositoryRoot<Node> = self
            .execute(queries::REPOSITORY_ID, json!({ "owner": owner, "repo": repo }))
            .await?;
        let node = data
            .repository
            .ok_or_else(|| DirectoryError::NotFound(format!("repository {}/{}", owner, repo)))?;
        Ok(RepositoryId::new(node.id))
    }

    async fn fetch_labels(&self, owner: &str, repo: &str) -> Result<Vec<RemoteLabel>> {
        let data: RepositoryRoot<LabelsHolder> = self
            .execute(queries::LABELS, json!({ "owner": owner, "repo": repo }))
            .await?;
        let holder = data
            .repository
            .ok_or_else(|| DirectoryError::NotFound(format!("repository {}/{}", owner, repo)))?;
        Ok(holder.labels.nodes.into_iter().map(RemoteLabel::from).collect())
    }

    async fn create_label(
        &self,
        repository_id: &RepositoryId,
        label: &LabelDefinition,
    ) -> Result<RemoteLabel> {
        let data: CreateLabelData = self
            .execute(
                queries::CREATE_LABEL,
                json!({
                    "repositoryId": repository_id,
                    "name": label.name,
                    "color": label.color,
                    "description": label.description,
                }),
            )
            .await?;
        let raw = require(data.create_label.and_then(|p| p.label), "createLabel.label")?;
        Ok(raw.into())
    }

    async fn create_issue(
        &self,
        repository_id: &RepositoryId,
        title: &str,
        body: &str,
        label_ids: &[LabelId],
    ) -> Result<CreatedIssue> {
        let label_ids = if label_ids.is_empty() {
            Value::Null
        } else {
            json!(label_ids)
        };
        let data: CreateIssueData = self
            .execute(
                queries::CREATE_ISSUE,
                json!({
                    "repositoryId": repository_id,
                    "title": title,
                    "body": body,
                    "labelIds": label_ids,
                }),
            )
            .await?;
        let raw = require(data.create_issue.and_then(|p| p.issue), "createIssue.issue")?;
        Ok(CreatedIssue {
            id: IssueId::new(raw.id),
            number: raw.number,
            url: raw.url,
        })
    }

    async fn fetch_project(
        &self,
        owner: &str,
        kind: OwnerKind,
        number: u64,
    ) -> Result<RemoteProject> {
        let data: OwnerRoot<ProjectHolder<RawProject>> = self
            .execute(
                &for_owner(queries::PROJECT, kind),
                json!({ "owner": owner, "projectNumber": number }),
            )
            .await?;
        let raw = data
            .owner
            .and_then(|o| o.project_v2)
            .ok_or_else(|| DirectoryError::NotFound(format!("project #{} of {}", number, owner)))?;

        Ok(RemoteProject {
            id: ProjectId::new(raw.id),
            number: raw.number,
            title: raw.title,
            url: raw.url,
            fields: raw.fields.nodes.into_iter().filter_map(remote_field).collect(),
        })
    }

    async fn create_project(&self, owner_id: &OwnerId, title: &str) -> Result<CreatedProject> {
        let data: CreateProjectData = self
            .execute(
                queries::CREATE_PROJECT,
                json!({ "ownerId": owner_id, "title": title }),
            )
            .await?;
        let raw = require(
            data.create_project_v2.and_then(|p| p.project_v2),
            "createProjectV2.projectV2",
        )?;
        debug!(number = raw.number, "created project");
        Ok(CreatedProject {
            id: ProjectId::new(raw.id),
            number: raw.number,
            url: raw.url,
        })
    }

    async fn create_single_select_field(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<FieldId> {
        let data: CreateFieldData = self
            .execute(
                queries::CREATE_SINGLE_SELECT_FIELD,
                json!({ "projectId": project_id, "name": name }),
            )
            .await?;
        let raw = require(
            data.create_project_v2_field.and_then(|p| p.project_v2_field),
            "createProjectV2Field.projectV2Field",
        )?;
        Ok(FieldId::new(require(raw.id, "projectV2Field.id")?))
    }

    async fn create_number_field(&self, project_id: &ProjectId, name: &str) -> Result<FieldId> {
        let data: CreateFieldData = self
            .execute(
                queries::CREATE_NUMBER_FIELD,
                json!({ "projectId": project_id, "name": name }),
            )
            .await?;
        let raw = require(
            data.create_project_v2_field.and_then(|p| p.project_v2_field),
            "createProjectV2Field.projectV2Field",
        )?;
        Ok(FieldId::new(require(raw.id, "projectV2Field.id")?))
    }

    async fn set_single_select_options(
        &self,
        project_id: &ProjectId,
        field_id: &FieldId,
        name: &str,
        options: &[OptionInput],
    ) -> Result<Vec<FieldOption>> {
        let data: UpdateFieldData = self
            .execute(
                queries::UPDATE_SINGLE_SELECT_FIELD,
                json!({
                    "projectId": project_id,
                    "fieldId": field_id,
                    "name": name,
                    "options": options,
                }),
            )
            .await?;
        let raw = require(
            data.update_project_v2_field.and_then(|p| p.project_v2_field),
            "updateProjectV2Field.projectV2Field",
        )?;
        Ok(raw
            .options
            .unwrap_or_default()
            .into_iter()
            .map(FieldOption::from)
            .collect())
    }

    async fn add_item_to_project(
        &self,
        project_id: &ProjectId,
        content_id: &IssueId,
    ) -> Result<ItemId> {
        let data: AddItemData = self
            .execute(
                queries::ADD_ITEM,
                json!({ "projectId": project_id, "contentId": content_id }),
            )
            .await?;
        let node = require(
            data.add_project_v2_item_by_id.and_then(|p| p.item),
            "addProjectV2ItemById.item",
        )?;
        Ok(ItemId::new(node.id))
    }

    async fn set_item_field_value(
        &self,
        project_id: &ProjectId,
        item_id: &ItemId,
        field_id: &FieldId,
        value: &FieldValueInput,
    ) -> Result<()> {
        let _: Value = self
            .execute(
                queries::UPDATE_ITEM_FIELD,
                json!({
                    "projectId": project_id,
                    "itemId": item_id,
                    "fieldId": field_id,
                    "value": value,
                }),
            )
            .await?;
        Ok(())
    }

    async fn list_projects(&self, owner: &str, kind: OwnerKind) -> Result<Vec<ProjectSummary>> {
        let data: OwnerRoot<ProjectsHolder<RawListedProject>> = self
            .execute(&for_owner(queries::LIST_PROJECTS, kind), json!({ "owner": owner }))
            .await?;
        let holder = data
            .owner
            .ok_or_else(|| DirectoryError::NotFound(format!("{} {}", kind, owner)))?;

        Ok(holder
            .projects_v2
            .nodes
            .into_iter()
            .map(|raw| ProjectSummary {
                number: raw.number,
                title: raw.title,
                url: raw.url,
                closed: raw.closed,
                created_at: raw.created_at,
                item_count: raw.items.total_count,
            })
            .collect())
    }

    async fn fetch_project_with_items(
        &self,
        owner: &str,
        kind: OwnerKind,
        number: u64,
    ) -> Result<ProjectSnapshot> {
        let data: OwnerRoot<ProjectHolder<RawSnapshot>> = self
            .execute(
                &for_owner(queries::PROJECT_WITH_ITEMS, kind),
                json!({ "owner": owner, "projectNumber": number }),
            )
            .await?;
        let raw = data
            .owner
            .and_then(|o| o.project_v2)
            .ok_or_else(|| DirectoryError::NotFound(format!("project #{} of {}", number, owner)))?;
        Ok(raw.into())
    }

    async fn fetch_all_projects_with_items(
        &self,
        owner: &str,
        kind: OwnerKind,
    ) -> Result<Vec<ProjectSnapshot>> {
        let data: OwnerRoot<ProjectsHolder<RawSnapshot>> = self
            .execute(
                &for_owner(queries::ALL_PROJECTS_WITH_ITEMS, kind),
                json!({ "owner": owner }),
            )
            .await?;
        let holder = data
            .owner
            .ok_or_else(|| DirectoryError::NotFound(format!("{} {}", kind, owner)))?;
        Ok(holder
            .projects_v2
            .nodes
            .into_iter()
            .map(ProjectSnapshot::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_are_typed() {
        let body = r#"{
            "data": {"user": null},
            "errors": [{"type": "NOT_FOUND", "message": "Could not resolve to a User with the login of 'acme'."}]
        }"#;
        let err = decode_envelope::<OwnerRoot<Node>>(body).unwrap_err();
        assert!(err.is_not_found(), "{:?}", err);
    }

    #[test]
    fn duplicate_label_errors_are_typed() {
        let body = r#"{
            "data": {"createLabel": null},
            "errors": [{"type": "UNPROCESSABLE", "message": "Name has already been taken"}]
        }"#;
        let err = decode_envelope::<CreateLabelData>(body).unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateOrInvalid(_)), "{:?}", err);
    }

    #[test]
    fn other_errors_keep_all_messages() {
        let body = r#"{
            "errors": [
                {"type": "FORBIDDEN", "message": "Resource not accessible"},
                {"message": "Something else"}
            ]
        }"#;
        match decode_envelope::<Value>(body).unwrap_err() {
            DirectoryError::Api { messages } => {
                assert_eq!(messages, vec!["Resource not accessible", "Something else"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn owner_root_accepts_organization_key() {
        let data: OwnerRoot<Node> =
            decode_envelope(r#"{"data": {"organization": {"id": "O_1"}}}"#).unwrap();
        assert_eq!(data.owner.unwrap().id, "O_1");
    }

    #[test]
    fn project_fields_skip_unsupported_field_types() {
        let data: OwnerRoot<ProjectHolder<RawProject>> = decode_envelope(
            r#"{"data": {"user": {"projectV2": {
                "id": "PVT_1", "number": 4, "title": "Acme", "url": "https://example.test/p/4",
                "fields": {"nodes": [
                    {"id": "F1", "name": "Title"},
                    {"id": "F2", "name": "Status", "options": [{"id": "S1", "name": "Backlog"}]},
                    {}
                ]}
            }}}}"#,
        )
        .unwrap();
        let raw = data.owner.unwrap().project_v2.unwrap();
        let fields: Vec<RemoteField> = raw.fields.nodes.into_iter().filter_map(remote_field).collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].options.as_ref().unwrap()[0].name, "Backlog");
        assert!(fields[0].options.is_none());
    }

    #[test]
    fn snapshot_items_decode_field_values_and_skip_non_issues() {
        let data: OwnerRoot<ProjectHolder<RawSnapshot>> = decode_envelope(
            r#"{"data": {"user": {"projectV2": {
                "id": "PVT_1", "number": 4, "title": "Acme", "url": "https://example.test/p/4",
                "closed": false,
                "createdAt": "2024-01-02T03:04:05Z", "updatedAt": "2024-02-02T03:04:05Z",
                "items": {"totalCount": 2, "nodes": [
                    {"id": "I1",
                     "fieldValues": {"nodes": [
                        {"name": "Done", "field": {"name": "Status"}},
                        {"number": 3, "field": {"name": "Time %"}},
                        {"text": "Kickoff", "field": {"name": "Title"}},
                        {}
                     ]},
                     "content": {"number": 12, "title": "Kickoff", "url": "https://example.test/i/12", "state": "OPEN"}},
                    {"id": "I2", "fieldValues": {"nodes": []}, "content": {}}
                ]}
            }}}}"#,
        )
        .unwrap();
        let snapshot: ProjectSnapshot = data.owner.unwrap().project_v2.unwrap().into();

        assert_eq!(snapshot.total_item_count, 2);
        assert_eq!(snapshot.linked_items().count(), 1);
        let first = &snapshot.items[0];
        assert_eq!(first.field("Status").as_deref(), Some("Done"));
        assert_eq!(first.field("Time %").as_deref(), Some("3"));
        assert_eq!(first.content.as_ref().unwrap().number, 12);
        assert!(snapshot.items[1].content.is_none());
    }
}
