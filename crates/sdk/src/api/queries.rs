//! Query API endpoints.

use super::path_segment;
use crate::client::PosthogClient;
use crate::error::PosthogResult;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;

/// Queries API.
pub struct QueriesApi<'a> {
    client: &'a PosthogClient,
}

impl<'a> QueriesApi<'a> {
    pub(crate) fn new(client: &'a PosthogClient) -> Self {
        Self { client }
    }

    /// Submit a query for execution.
    pub async fn create(
        &self,
        project_id: impl Display,
        query: &Value,
        refresh: QueryRefresh,
    ) -> PosthogResult<Value> {
        let body = CreateQuery { query, refresh };
        let path = format!("/api/projects/{}/query/", path_segment(project_id)?);
        self.client.http.post(&path, Some(&body)).await
    }

    /// Poll a previously submitted query.
    pub async fn get(&self, project_id: impl Display, query_id: impl Display) -> PosthogResult<Value> {
        let path = format!(
            "/api/projects/{}/query/{}",
            path_segment(project_id)?,
            path_segment(query_id)?
        );
        self.client.http.get(&path).await
    }
}

/// Build the query node for a HogQL statement.
pub fn hogql(query: impl Into<String>) -> Value {
    json!({
        "kind": "HogQLQuery",
        "query": query.into(),
    })
}

/// How the query endpoint should compute results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryRefresh {
    #[default]
    Blocking,
    Async,
    ForceBlocking,
    ForceAsync,
}

#[derive(Debug, Serialize)]
struct CreateQuery<'q> {
    query: &'q Value,
    refresh: QueryRefresh,
}
