// Insight listing, search and detail tools

use crate::format::key_value_lines;
use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use posthog_sdk::{Insight, PosthogClient};
use serde::Deserialize;
use serde_json::Value;

/// Tool to list a project's insights
pub struct ListInsightsTool {
    client: PosthogClient,
}

impl ListInsightsTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ListInsightsArgs {
    project_id: i64,
    #[serde(default)]
    search: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListInsightsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_posthog_insights".to_string(),
            description: "List all available PostHog insights for a project.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The ID of the project as an integer (e.g. 99423)"),
                    "search": json_schema_string("Optional search query to filter insights")
                }),
                vec!["project_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: ListInsightsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for list_posthog_insights")?;

        match self
            .client
            .insights()
            .list(args.project_id, args.search.as_deref())
            .await
        {
            Ok(insights) => Ok(CallToolResult::text(format_insights(
                "Available insights",
                &insights,
            ))),
            Err(e) => Ok(CallToolResult::failure(format!("Failed to list insights: {}", e))),
        }
    }
}

/// Tool to search a project's insights by name
pub struct SearchInsightsTool {
    client: PosthogClient,
}

impl SearchInsightsTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SearchInsightsArgs {
    project_id: i64,
    search: String,
}

#[async_trait::async_trait]
impl Tool for SearchInsightsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_posthog_insights".to_string(),
            description: "Search for PostHog insights by name.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The ID of the project as an integer (e.g. 99423)"),
                    "search": json_schema_string("The search query to filter insights by name")
                }),
                vec!["project_id", "search"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchInsightsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for search_posthog_insights")?;

        match self
            .client
            .insights()
            .list(args.project_id, Some(&args.search))
            .await
        {
            Ok(insights) => Ok(CallToolResult::text(format_insights(
                "Search results",
                &insights,
            ))),
            Err(e) => Ok(CallToolResult::failure(format!(
                "Failed to search insights: {}",
                e
            ))),
        }
    }
}

/// Tool to dump every field of one insight
pub struct InsightDetailsTool {
    client: PosthogClient,
}

impl InsightDetailsTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct InsightDetailsArgs {
    project_id: i64,
    insight_id: i64,
}

#[async_trait::async_trait]
impl Tool for InsightDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_posthog_insight_details".to_string(),
            description: "Get details for a specific PostHog insight.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The ID of the project as an integer (e.g. 99423)"),
                    "insight_id": json_schema_integer("The ID of the insight as an integer (e.g. 12345)")
                }),
                vec!["project_id", "insight_id"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: InsightDetailsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_posthog_insight_details")?;

        match self
            .client
            .insights()
            .get(args.project_id, args.insight_id)
            .await
        {
            Ok(details) => Ok(CallToolResult::text(format_details(&details))),
            Err(e) => Ok(CallToolResult::failure(format!(
                "Failed to get insight details: {}",
                e
            ))),
        }
    }
}

fn format_insights(heading: &str, insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "No insights found".to_string();
    }

    let lines: Vec<String> = insights
        .iter()
        .map(|i| format!("ID: {} - Name: {}", i.display_id(), i.display_name()))
        .collect();
    format!("{} ({}):\n{}", heading, insights.len(), lines.join("\n"))
}

fn format_details(details: &Value) -> String {
    match details.as_object() {
        Some(object) if !object.is_empty() => {
            format!("Insight details:\n{}", key_value_lines(object).join("\n"))
        }
        _ => "No insight details found".to_string(),
    }
}
