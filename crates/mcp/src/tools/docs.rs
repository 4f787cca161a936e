// Documentation search tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use posthog_sdk::{completion_text, DocsClient};
use serde::Deserialize;

/// Tool to answer questions from the PostHog documentation
pub struct SearchDocsTool {
    docs: DocsClient,
}

impl SearchDocsTool {
    pub fn new(docs: DocsClient) -> Self {
        Self { docs }
    }
}

#[derive(Debug, Deserialize)]
struct SearchDocsArgs {
    query: String,
}

#[async_trait::async_trait]
impl Tool for SearchDocsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_posthog_docs".to_string(),
            description: "Search PostHog documentation using Inkeep.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("The search query for the documentation")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: SearchDocsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for search_posthog_docs")?;

        let response = match self.docs.search(&args.query).await {
            Ok(response) => response,
            Err(e) => return Ok(CallToolResult::failure(format!("Failed to search docs: {}", e))),
        };

        match completion_text(&response) {
            Ok(Some(answer)) => Ok(CallToolResult::text(format!(
                "Documentation search results:\n\n{}",
                answer
            ))),
            Ok(None) => Ok(CallToolResult::text("No results found")),
            Err(e) => Ok(CallToolResult::failure(format!("Failed to search docs: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posthog_sdk::DocsConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_for(server: &MockServer, api_key: Option<&str>) -> SearchDocsTool {
        SearchDocsTool::new(
            DocsClient::new(DocsConfig {
                base_url: url::Url::parse(&format!("{}/v1/", server.uri())).unwrap(),
                api_key: api_key.map(str::to_string),
                ..DocsConfig::default()
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_answer_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Use `posthog.capture`."}}]
            })))
            .mount(&server)
            .await;

        let result = tool_for(&server, Some("ik-test"))
            .execute(json!({"query": "How do I send events?"}))
            .await
            .unwrap();

        assert_eq!(
            result.text_content(),
            "Documentation search results:\n\nUse `posthog.capture`."
        );
    }

    #[tokio::test]
    async fn test_no_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cmpl-1"})))
            .mount(&server)
            .await;

        let result = tool_for(&server, Some("ik-test"))
            .execute(json!({"query": "anything"}))
            .await
            .unwrap();

        assert_eq!(result.is_error, None);
        assert_eq!(result.text_content(), "No results found");
    }

    #[tokio::test]
    async fn test_missing_docs_key() {
        let server = MockServer::start().await;

        let result = tool_for(&server, None)
            .execute(json!({"query": "anything"}))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.text_content(),
            "Failed to search docs: INKEEP_API_KEY is required"
        );
    }
}
