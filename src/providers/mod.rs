pub mod github;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Settings;
use crate::model::ItemPage;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name} API request failed: {error}")]
    Transport {
        source_name: &'static str,
        #[source]
        error: reqwest::Error,
    },

    #[error("{source_name} API returned {status}: {body}")]
    Status {
        source_name: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{source_name} query failed: {}", .messages.join("; "))]
    Query {
        source_name: &'static str,
        messages: Vec<String>,
    },

    #[error("failed to parse {source_name} response: {error}")]
    Decode {
        source_name: &'static str,
        #[source]
        error: reqwest::Error,
    },

    #[error("project {number} not found for organization {organization}")]
    ProjectNotFound { organization: String, number: u32 },

    #[error("no project found with id {0}")]
    NodeNotFound(String),
}

/// A remote board holding project items.
#[async_trait]
pub trait ProjectSource: Send + Sync {
    fn name(&self) -> &str;

    /// Look up the opaque project id for an organization's numbered project.
    async fn resolve_project_id(
        &self,
        organization: &str,
        number: u32,
    ) -> Result<String, SourceError>;

    /// Fetch the first page of items on a project.
    async fn fetch_items(&self, project_id: &str) -> Result<ItemPage, SourceError>;
}

#[cfg(test)]
pub mod tests;

pub fn create_source(settings: &Settings) -> Box<dyn ProjectSource> {
    Box::new(github::GitHubProjects::new(
        settings.api_url.clone(),
        settings.token.clone(),
    ))
}
