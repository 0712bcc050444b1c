use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ProjectSource, SourceError};
use crate::model::{FieldValue, IssueContent, ItemPage, RawProjectItem};

const SOURCE: &str = "GitHub";
const USER_AGENT: &str = concat!("pending-payments/", env!("CARGO_PKG_VERSION"));

/// Projects (v2) on GitHub, read through the GraphQL API.
pub struct GitHubProjects {
    api_url: String,
    token: String,
    client: reqwest::Client,
}

impl GitHubProjects {
    pub fn new(api_url: String, token: String) -> Self {
        Self {
            api_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, SourceError> {
        let body = serde_json::json!({ "query": query, "variables": variables });
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&body)
            .send()
            .await
            .map_err(|error| SourceError::Transport {
                source_name: SOURCE,
                error,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                source_name: SOURCE,
                status,
                body,
            });
        }

        let gql: GqlResponse<T> = resp.json().await.map_err(|error| SourceError::Decode {
            source_name: SOURCE,
            error,
        })?;

        if !gql.errors.is_empty() {
            return Err(SourceError::Query {
                source_name: SOURCE,
                messages: gql.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql.data.ok_or_else(|| SourceError::Query {
            source_name: SOURCE,
            messages: vec!["no data in response".to_string()],
        })
    }
}

pub(crate) const PROJECT_QUERY: &str = r#"query($login: String!, $number: Int!) {
  organization(login: $login) {
    projectV2(number: $number) { id }
  }
}"#;

pub(crate) const ITEMS_QUERY: &str = r#"query($id: ID!) {
  node(id: $id) {
    ... on ProjectV2 {
      items(first: 100) {
        pageInfo { hasNextPage }
        nodes {
          id
          fieldValues(first: 100) {
            nodes {
              __typename
              ... on ProjectV2ItemFieldSingleSelectValue { name }
              ... on ProjectV2ItemFieldTextValue { text }
              ... on ProjectV2ItemFieldNumberValue { number }
            }
          }
          content {
            ... on Issue {
              title url createdAt updatedAt body
              assignees(first: 100) { nodes { login } }
              labels(first: 100) { nodes { name } }
            }
          }
        }
      }
    }
  }
}"#;

#[derive(Deserialize)]
struct GqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

#[derive(Deserialize)]
struct GqlError {
    message: String,
}

#[derive(Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.nodes.into_iter().flatten()
    }
}

#[derive(Deserialize)]
struct ProjectData {
    organization: Option<Organization>,
}

#[derive(Deserialize)]
struct Organization {
    #[serde(rename = "projectV2")]
    project_v2: Option<ProjectRef>,
}

#[derive(Deserialize)]
struct ProjectRef {
    id: String,
}

#[derive(Deserialize)]
struct ItemsData {
    node: Option<ProjectNode>,
}

#[derive(Deserialize)]
struct ProjectNode {
    items: Option<ItemConnection>,
}

#[derive(Deserialize)]
struct ItemConnection {
    #[serde(rename = "pageInfo", default)]
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<Option<ItemNode>>,
}

#[derive(Deserialize, Default)]
struct PageInfo {
    #[serde(rename = "hasNextPage", default)]
    has_next_page: bool,
}

#[derive(Deserialize)]
struct ItemNode {
    id: String,
    #[serde(rename = "fieldValues", default)]
    field_values: Connection<FieldValueNode>,
    content: Option<ContentNode>,
}

#[derive(Deserialize)]
#[serde(tag = "__typename")]
enum FieldValueNode {
    #[serde(rename = "ProjectV2ItemFieldSingleSelectValue")]
    SingleSelect {
        #[serde(default)]
        name: Option<String>,
    },
    #[serde(rename = "ProjectV2ItemFieldTextValue")]
    Text {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(rename = "ProjectV2ItemFieldNumberValue")]
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    #[serde(other)]
    Unsupported,
}

impl FieldValueNode {
    fn into_field(self) -> Option<FieldValue> {
        match self {
            FieldValueNode::SingleSelect { name } => name.map(FieldValue::SingleSelect),
            FieldValueNode::Text { text } => text.map(FieldValue::Text),
            FieldValueNode::Number { number } => number.map(FieldValue::Number),
            FieldValueNode::Unsupported => None,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ContentNode {
    title: Option<String>,
    url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    body: Option<String>,
    assignees: Connection<Assignee>,
    labels: Connection<Label>,
}

#[derive(Deserialize)]
struct Assignee {
    login: String,
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

impl From<ContentNode> for IssueContent {
    fn from(content: ContentNode) -> Self {
        IssueContent {
            title: content.title.unwrap_or_default(),
            url: content.url.unwrap_or_default(),
            created_at: content.created_at,
            updated_at: content.updated_at,
            body: content.body.unwrap_or_default(),
            assignees: content.assignees.into_nodes().map(|a| a.login).collect(),
            labels: content.labels.into_nodes().map(|l| l.name).collect(),
        }
    }
}

impl From<ItemNode> for RawProjectItem {
    fn from(node: ItemNode) -> Self {
        RawProjectItem {
            id: node.id,
            fields: node
                .field_values
                .into_nodes()
                .filter_map(FieldValueNode::into_field)
                .collect(),
            content: node.content.map(IssueContent::from).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ProjectSource for GitHubProjects {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn resolve_project_id(
        &self,
        organization: &str,
        number: u32,
    ) -> Result<String, SourceError> {
        let variables = serde_json::json!({ "login": organization, "number": number });
        let data: ProjectData = self.query(PROJECT_QUERY, variables).await?;

        data.organization
            .and_then(|org| org.project_v2)
            .map(|project| project.id)
            .ok_or_else(|| SourceError::ProjectNotFound {
                organization: organization.to_string(),
                number,
            })
    }

    async fn fetch_items(&self, project_id: &str) -> Result<ItemPage, SourceError> {
        let variables = serde_json::json!({ "id": project_id });
        let data: ItemsData = self.query(ITEMS_QUERY, variables).await?;

        let connection = data
            .node
            .and_then(|node| node.items)
            .ok_or_else(|| SourceError::NodeNotFound(project_id.to_string()))?;

        Ok(ItemPage {
            items: connection
                .nodes
                .into_iter()
                .flatten()
                .map(RawProjectItem::from)
                .collect(),
            has_more: connection.page_info.has_next_page,
        })
    }
}
