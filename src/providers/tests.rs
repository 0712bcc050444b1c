use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::github::{GitHubProjects, ITEMS_QUERY, PROJECT_QUERY};
use super::{ProjectSource, SourceError};
use crate::model::{FieldValue, ItemPage};

/// An in-memory source that records the calls made against it.
pub struct MockSource {
    pub project_id: String,
    pub page: ItemPage,
    pub calls: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
}

impl MockSource {
    pub fn new(page: ItemPage) -> Self {
        Self {
            project_id: "PVT_mock".to_string(),
            page,
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl ProjectSource for MockSource {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn resolve_project_id(
        &self,
        organization: &str,
        number: u32,
    ) -> Result<String, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("resolve {organization}/{number}"));
        if self.should_fail {
            return Err(SourceError::ProjectNotFound {
                organization: organization.to_string(),
                number,
            });
        }
        Ok(self.project_id.clone())
    }

    async fn fetch_items(&self, project_id: &str) -> Result<ItemPage, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("fetch {project_id}"));
        Ok(self.page.clone())
    }
}

fn client(server: &MockServer) -> GitHubProjects {
    GitHubProjects::new(format!("{}/graphql", server.uri()), "ghp_test".to_string())
}

#[tokio::test]
async fn resolve_project_id_sends_variables_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer ghp_test"))
        .and(body_partial_json(json!({
            "query": PROJECT_QUERY,
            "variables": { "login": "NautilusOSS", "number": 2 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "organization": { "projectV2": { "id": "PVT_kwDO" } } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let id = client(&server)
        .resolve_project_id("NautilusOSS", 2)
        .await
        .unwrap();
    assert_eq!(id, "PVT_kwDO");
}

#[tokio::test]
async fn resolve_project_id_reports_missing_project() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "organization": { "projectV2": null } }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .resolve_project_id("acme", 9)
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::ProjectNotFound { number: 9, .. }));
    assert!(err.to_string().contains("acme"));
}

#[tokio::test]
async fn graphql_errors_fail_the_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "organization": null },
            "errors": [
                { "type": "NOT_FOUND", "message": "Could not resolve to an Organization with the login of 'nope'." }
            ]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .resolve_project_id("nope", 1)
        .await
        .unwrap_err();
    match err {
        SourceError::Query { messages, .. } => {
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("'nope'"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn http_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_items("PVT_x").await.unwrap_err();
    match err {
        SourceError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "Bad credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_items("PVT_x").await.unwrap_err();
    assert!(matches!(err, SourceError::Decode { .. }));
}

#[tokio::test]
async fn fetch_items_decodes_field_values_and_issue() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "query": ITEMS_QUERY,
            "variables": { "id": "PVT_kwDO" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "node": { "items": {
                "pageInfo": { "hasNextPage": true },
                "nodes": [
                    {
                        "id": "PVTI_1",
                        "fieldValues": { "nodes": [
                            { "__typename": "ProjectV2ItemFieldSingleSelectValue", "name": "Pending Payment" },
                            { "__typename": "ProjectV2ItemFieldTextValue", "text": "alice" },
                            { "__typename": "ProjectV2ItemFieldNumberValue", "number": 250 },
                            { "__typename": "ProjectV2ItemFieldDateValue" },
                            { "__typename": "ProjectV2ItemFieldNumberValue", "number": null },
                            null
                        ] },
                        "content": {
                            "title": "Fix the indexer",
                            "url": "https://github.com/NautilusOSS/app/issues/12",
                            "createdAt": "2024-03-01T10:00:00Z",
                            "updatedAt": "2024-03-05T16:30:00Z",
                            "body": "Details",
                            "assignees": { "nodes": [ { "login": "alice" } ] },
                            "labels": { "nodes": [ { "name": "bounty" }, { "name": "backend" } ] }
                        }
                    },
                    {
                        "id": "PVTI_2",
                        "fieldValues": { "nodes": [] },
                        "content": {}
                    }
                ]
            } } }
        })))
        .mount(&server)
        .await;

    let page = client(&server).fetch_items("PVT_kwDO").await.unwrap();
    assert!(page.has_more);
    assert_eq!(page.items.len(), 2);

    let first = &page.items[0];
    assert_eq!(first.id, "PVTI_1");
    assert_eq!(
        first.fields,
        vec![
            FieldValue::SingleSelect("Pending Payment".to_string()),
            FieldValue::Text("alice".to_string()),
            FieldValue::Number(250.0),
        ]
    );
    assert_eq!(first.content.title, "Fix the indexer");
    assert_eq!(
        first.content.updated_at.unwrap().to_rfc3339(),
        "2024-03-05T16:30:00+00:00"
    );
    assert_eq!(first.content.assignees, vec!["alice"]);
    assert_eq!(first.content.labels, vec!["bounty", "backend"]);

    let draft = &page.items[1];
    assert!(draft.fields.is_empty());
    assert_eq!(draft.content.title, "");
    assert!(draft.content.created_at.is_none());
}

#[tokio::test]
async fn fetch_items_rejects_non_project_node() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "node": {} }
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_items("I_kwDO").await.unwrap_err();
    assert!(matches!(err, SourceError::NodeNotFound(id) if id == "I_kwDO"));
}

#[tokio::test]
async fn mock_source_records_calls() {
    let source = MockSource::new(ItemPage::default());
    let calls = source.calls.clone();

    let id = source.resolve_project_id("acme", 3).await.unwrap();
    source.fetch_items(&id).await.unwrap();

    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &["resolve acme/3", "fetch PVT_mock"]
    );
}

#[tokio::test]
async fn mock_source_failure_propagates() {
    let source = MockSource::new(ItemPage::default()).with_failure();
    let result = source.resolve_project_id("acme", 3).await;
    assert!(result.is_err());
}
