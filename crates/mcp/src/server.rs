// MCP server: JSON-RPC 2.0 over newline-delimited stdio

use crate::codec::{InputLine, RequestLineCodec};
use crate::protocol::{
    CallToolParams, InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo, ToolsCapability,
    PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

/// MCP server dispatching JSON-RPC requests to a tool registry.
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            info: ServerInfo {
                name: "posthog".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve over the process's stdin/stdout until stdin closes.
    pub async fn start(&self) -> Result<()> {
        tracing::info!("MCP server ready, listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read line by line from `reader`, writing one response
    /// line per request to `writer`.
    ///
    /// Requests are handled concurrently, so responses may be written out of
    /// order. On EOF, in-flight requests are awaited before returning.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, RequestLineCodec::new());
        let mut sink = FramedWrite::new(writer, LinesCodec::new());
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        loop {
            tokio::select! {
                line = lines.next() => match line {
                    Some(Ok(InputLine::Text(line))) => self.dispatch_line(&line, &tx),
                    Some(Ok(InputLine::Invalid(reason))) => {
                        tracing::warn!(reason = %reason, "Unreadable request line");
                        let _ = tx.send(JsonRpcResponse::error(
                            serde_json::Value::Null,
                            JsonRpcError::parse_error(reason),
                        ));
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Failed to read from input");
                        break;
                    }
                    None => break,
                },
                Some(response) = rx.recv() => write_response(&mut sink, &response).await?,
            }
        }

        // Every spawned request holds a sender; the channel closes once all finish.
        drop(tx);
        while let Some(response) = rx.recv().await {
            write_response(&mut sink, &response).await?;
        }

        tracing::info!("Input closed, MCP server stopping");
        Ok(())
    }

    fn dispatch_line(&self, line: &str, tx: &mpsc::UnboundedSender<JsonRpcResponse>) {
        if line.trim().is_empty() {
            return;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Unparsable request");
                let _ = tx.send(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(e),
                ));
                return;
            }
        };

        let server = self.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_request(request).await {
                let _ = tx.send(response);
            }
        });
    }

    /// Handle one request. Notifications produce no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize(request.params)),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn handle_initialize(&self, params: Option<serde_json::Value>) -> serde_json::Value {
        if let Some(params) =
            params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
        {
            tracing::info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol = %params.protocol_version,
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
            instructions: Some(
                "Tools for PostHog: list projects, create annotations, browse insights, run HogQL queries and search the docs."
                    .to_string(),
            ),
        };
        to_json(&result)
    }

    fn handle_tools_list(&self) -> serde_json::Value {
        to_json(&ListToolsResult {
            tools: self.registry.list_schemas(),
        })
    }

    async fn handle_tools_call(
        &self,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("Missing params for tools/call"))
            .and_then(|p| {
                serde_json::from_value(p)
                    .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
            })?;

        tracing::info!(tool = %params.name, "Tool call");
        let result = self.registry.call(&params.name, params.arguments).await;
        Ok(to_json(&result))
    }
}

async fn write_response<W>(
    sink: &mut FramedWrite<W, LinesCodec>,
    response: &JsonRpcResponse,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = serde_json::to_string(response).context("Failed to serialize response")?;
    sink.send(line).await.context("Failed to write response")?;
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
    // Protocol structs contain only strings, bools and JSON values.
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize protocol message");
        serde_json::Value::Null
    })
}
