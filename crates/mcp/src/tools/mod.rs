pub mod annotations;
pub mod docs;
pub mod insights;
pub mod projects;
pub mod queries;
mod registry;

pub use annotations::CreateAnnotationTool;
pub use docs::SearchDocsTool;
pub use insights::{InsightDetailsTool, ListInsightsTool, SearchInsightsTool};
pub use projects::ListProjectsTool;
pub use queries::{GetQueryTool, RunHogqlQueryTool};
pub use registry::{json_schema_integer, json_schema_object, json_schema_string, Tool, ToolRegistry};

use posthog_sdk::{DocsClient, PosthogClient};
use std::sync::Arc;

/// Build a registry holding every PostHog tool.
pub fn posthog_registry(client: PosthogClient, docs: DocsClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Projects and annotations
    registry.register(Arc::new(ListProjectsTool::new(client.clone())));
    registry.register(Arc::new(CreateAnnotationTool::new(client.clone())));

    // Insights
    registry.register(Arc::new(ListInsightsTool::new(client.clone())));
    registry.register(Arc::new(SearchInsightsTool::new(client.clone())));
    registry.register(Arc::new(InsightDetailsTool::new(client.clone())));

    // Queries
    registry.register(Arc::new(GetQueryTool::new(client.clone())));
    registry.register(Arc::new(RunHogqlQueryTool::new(client)));

    // Documentation
    registry.register(Arc::new(SearchDocsTool::new(docs)));

    registry
}
