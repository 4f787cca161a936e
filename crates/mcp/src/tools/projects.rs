// Project listing tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, Tool};
use anyhow::Result;
use posthog_sdk::{PosthogClient, Project};

/// Tool listing every project of the caller's organization
pub struct ListProjectsTool {
    client: PosthogClient,
}

impl ListProjectsTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for ListProjectsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_posthog_projects".to_string(),
            description: "List all available PostHog projects.".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<CallToolResult> {
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

        Ok(CallToolResult::text(format_projects(&projects)))
    }
}

pub(crate) fn format_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found".to_string();
    }

    let lines: Vec<String> = projects
        .iter()
        .map(|p| format!("ID: {} - Name: {}", p.id, p.name))
        .collect();
    format!("Available projects ({}):\n{}", projects.len(), lines.join("\n"))
}
