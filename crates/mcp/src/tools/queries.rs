// Query submission and polling tools

use crate::format::{query_results, query_status, truncate_output};
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use posthog_sdk::{hogql, PosthogClient, QueryRefresh};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Tool to poll a query by id
pub struct GetQueryTool {
    client: PosthogClient,
}

impl GetQueryTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct GetQueryArgs {
    #[serde(deserialize_with = "id_string")]
    project_id: String,
    #[serde(deserialize_with = "id_string")]
    query_id: String,
}

/// Accept ids given either as JSON strings or numbers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

#[async_trait::async_trait]
impl Tool for GetQueryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_posthog_query".to_string(),
            description: "Get the status and results of a PostHog query by its ID.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_string("The ID of the project (e.g. \"99423\")"),
                    "query_id": json_schema_string("The ID of the query to look up")
                }),
                vec!["project_id", "query_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetQueryArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_posthog_query")?;

        match self
            .client
            .queries()
            .get(&args.project_id, &args.query_id)
            .await
        {
            Ok(status) => Ok(CallToolResult::text(truncate_output(query_status(&status)))),
            Err(e) => Ok(CallToolResult::failure(format!("Failed to get query: {}", e))),
        }
    }
}

/// Tool to run a HogQL query against the caller's first project
pub struct RunHogqlQueryTool {
    client: PosthogClient,
}

impl RunHogqlQueryTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct RunHogqlQueryArgs {
    query: String,
}

#[async_trait::async_trait]
impl Tool for RunHogqlQueryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "run_hogql_query".to_string(),
            description: "Run a HogQL query against the first available PostHog project and return the results.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("The HogQL query text (e.g. \"select event, count() from events group by event limit 10\")")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: RunHogqlQueryArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for run_hogql_query")?;

        let org = match self.client.organizations().current().await {
            Ok(org) => org,
            Err(e) => {
                return Ok(CallToolResult::failure(format!(
                    "Failed to get organization: {}",
                    e
                )))
            }
        };

        let projects = match self.client.projects().list(&org.id).await {
            Ok(projects) => projects,
            Err(e) => return Ok(CallToolResult::failure(format!("Failed to list projects: {}", e))),
        };

        // Implicitly the first project; callers with several projects get no choice here.
        let Some(project) = projects.first() else {
            return Ok(CallToolResult::failure("No projects available"));
        };
        if projects.len() > 1 {
            tracing::info!(
                project_id = project.id,
                available = projects.len(),
                "Multiple projects available, running query against the first"
            );
        }

        match self
            .client
            .queries()
            .create(project.id, &hogql(args.query), QueryRefresh::Blocking)
            .await
        {
            Ok(response) => {
                let output = query_results(&response).unwrap_or_else(|| query_status(&response));
                Ok(CallToolResult::text(truncate_output(output)))
            }
            Err(e) => Ok(CallToolResult::failure(format!("Failed to run query: {}", e))),
        }
    }
}
