// MCP tool trait, registry and dispatch

use crate::protocol::{CallToolResult, ToolContent, ToolSchema};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments.
    ///
    /// Expected failures (API errors, missing credentials) should come back as
    /// `CallToolResult::failure`; an `Err` is reserved for bad arguments and is
    /// rendered by the registry.
    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, sorted by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name. Always produces a result: unknown tools,
    /// argument errors and panics inside the tool become error text.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> CallToolResult {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = name, "Unknown tool requested");
            return CallToolResult {
                content: vec![ToolContent::error(format!("Unknown tool: {}", name))],
                is_error: Some(true),
            };
        };

        let arguments = match arguments {
            serde_json::Value::Null => serde_json::json!({}),
            other => other,
        };

        // Run on its own task so a panic is contained to this call.
        let handle = tokio::spawn(async move { tool.execute(arguments).await });

        match handle.await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(tool = name, error = %e, "Tool call failed");
                CallToolResult {
                    content: vec![ToolContent::error(format!("{:#}", e))],
                    is_error: Some(true),
                }
            }
            Err(e) => {
                tracing::error!(tool = name, error = %e, "Tool task aborted");
                CallToolResult {
                    content: vec![ToolContent::error(format!(
                        "Tool {} failed unexpectedly: {}",
                        name, e
                    ))],
                    is_error: Some(true),
                }
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": description
    })
}
