//! Line-delimited JSON-RPC 2.0 tool server.
//!
//! One request per line on the input, one response per line on the output.
//! Notifications are consumed silently. Tool failures (an unsupported
//! ecosystem) are tool results with `isError: true`; malformed messages and
//! bad tool arguments are JSON-RPC errors.

use std::sync::Arc;

use modscout_core::EcosystemRegistry;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::protocol::{INTERNAL_ERROR, JSONRPC_VERSION, RpcError, RpcRequest, RpcResponse};
use crate::tools::{ToolCall, tool_definitions};

/// Protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const SERVER_NAME: &str = "modscout";

#[derive(Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

pub struct ToolServer {
    registry: Arc<EcosystemRegistry>,
}

impl ToolServer {
    pub fn new(registry: Arc<EcosystemRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EcosystemRegistry {
        &self.registry
    }

    /// Reads requests from `reader` until end of input, writing each
    /// response to `writer` as one line.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        tracing::info!("input closed, shutting down");
        Ok(())
    }

    /// Handles one input line, returning the serialized response if the
    /// line warrants one.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await?,
            Err(e) => {
                tracing::warn!("malformed message: {}", e);
                RpcResponse::failure(Value::Null, RpcError::parse_error(e))
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("failed to serialize response: {}", e);
                let fallback = json!({
                    "jsonrpc": JSONRPC_VERSION,
                    "id": response.id,
                    "error": { "code": INTERNAL_ERROR, "message": "Internal error" }
                });
                Some(fallback.to_string())
            }
        }
    }

    pub async fn handle_message(&self, message: Value) -> Option<RpcResponse> {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: RpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => return Some(RpcResponse::failure(id, RpcError::invalid_request(e))),
        };

        if request
            .jsonrpc
            .as_deref()
            .is_some_and(|version| version != JSONRPC_VERSION)
        {
            return Some(RpcResponse::failure(
                id,
                RpcError::invalid_request("jsonrpc must be \"2.0\""),
            ));
        }

        let Some(id) = request.id else {
            tracing::debug!("notification: {}", request.method);
            return None;
        };

        tracing::debug!("request {}: {}", id, request.method);
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => RpcResponse::success(id, result),
            Err(error) => RpcResponse::failure(id, error),
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(params).await,
            other => Err(RpcError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, params: Value) -> Result<Value, RpcError> {
        let params: CallParams = serde_json::from_value(params).map_err(RpcError::invalid_params)?;
        let call =
            ToolCall::parse(&params.name, params.arguments).map_err(RpcError::invalid_params)?;

        let result = match call.execute(&self.registry).await {
            Ok(value) => tool_result(&value.to_string(), false),
            Err(e) => {
                tracing::debug!("{} failed: {}", params.name, e);
                tool_result(&e.to_string(), true)
            }
        };
        Ok(result)
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        },
        "capabilities": {
            "tools": { "listChanged": false }
        }
    })
}

fn tool_result(text: &str, is_error: bool) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }],
        "isError": is_error
    })
}
