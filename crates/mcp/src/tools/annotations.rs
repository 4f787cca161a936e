// Annotation creation tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_integer, json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use posthog_sdk::{CreatedAnnotation, PosthogClient};
use serde::Deserialize;

/// Tool to create an annotation on a project
pub struct CreateAnnotationTool {
    client: PosthogClient,
}

impl CreateAnnotationTool {
    pub fn new(client: PosthogClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct CreateAnnotationArgs {
    project_id: i64,
    content: String,
    #[serde(default)]
    date_marker: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CreateAnnotationTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "create_posthog_annotation".to_string(),
            description: "Create a PostHog annotation.".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "project_id": json_schema_integer("The ID of the project as an integer (e.g. 99423)"),
                    "content": json_schema_string("The content/text of the annotation"),
                    "date_marker": json_schema_string("Optional ISO-8601 timestamp for the annotation (e.g. 2024-03-20T14:15:22Z)")
                }),
                vec!["project_id", "content"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CreateAnnotationArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for create_posthog_annotation")?;

        match self
            .client
            .annotations()
            .create(args.project_id, &args.content, args.date_marker.as_deref())
            .await
        {
            Ok(annotation) => Ok(CallToolResult::text(format_annotation(&annotation))),
            Err(e) => Ok(CallToolResult::failure(format!(
                "Failed to create annotation: {}",
                e
            ))),
        }
    }
}

fn format_annotation(annotation: &CreatedAnnotation) -> String {
    format!(
        "Successfully created annotation:\nID: {}\nContent: {}\nDate: {}\nCreated by: {}",
        annotation.id,
        annotation.content,
        annotation.date_marker.as_deref().unwrap_or("Now"),
        annotation.creator_email().unwrap_or("Unknown"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_for(server: &MockServer) -> CreateAnnotationTool {
        CreateAnnotationTool::new(
            PosthogClient::builder()
                .base_url(server.uri())
                .api_key("phx-test")
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_deploy_annotation_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/projects/99423/annotations/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 1,
                "content": "Deploy v2",
                "created_by": {"email": "a@b.com"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let before = Utc::now();
        let result = tool_for(&server)
            .execute(json!({"project_id": 99423, "content": "Deploy v2"}))
            .await
            .unwrap();
        let after = Utc::now();

        assert_eq!(
            result.text_content(),
            "Successfully created annotation:\nID: 1\nContent: Deploy v2\nDate: Now\nCreated by: a@b.com"
        );

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["content"], "Deploy v2");
        let marker = DateTime::parse_from_rfc3339(body["date_marker"].as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc);
        assert!(marker >= before - chrono::Duration::milliseconds(1));
        assert!(marker <= after);
    }

    #[tokio::test]
    async fn test_annotation_date_echoed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/projects/5/annotations/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 9,
                "content": "Launch",
                "date_marker": "2024-03-20T14:15:22Z",
                "created_by": {"email": "ops@example.com"}
            })))
            .mount(&server)
            .await;

        let result = tool_for(&server)
            .execute(json!({
                "project_id": 5,
                "content": "Launch",
                "date_marker": "2024-03-20T14:15:22Z"
            }))
            .await
            .unwrap();

        assert!(result.text_content().contains("\nDate: 2024-03-20T14:15:22Z\n"));
    }

    #[tokio::test]
    async fn test_annotation_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/projects/5/annotations/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "This field is required.",
                "attr": "content"
            })))
            .mount(&server)
            .await;

        let result = tool_for(&server)
            .execute(json!({"project_id": 5, "content": ""}))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.text_content(),
            "Failed to create annotation: API error (status 400): This field is required."
        );
    }

    #[tokio::test]
    async fn test_annotation_requires_project_id() {
        let tool = CreateAnnotationTool::new(PosthogClient::builder().build().unwrap());
        assert!(tool.execute(json!({"content": "x"})).await.is_err());
    }
}
