//! Retrieval service over stdio.
//!
//! Speaks newline-delimited JSON-RPC 2.0 on stdin/stdout. All logging goes
//! to stderr so stdout stays a clean protocol channel.

pub mod handler;

pub use handler::RetrievalHandler;

use crate::mcp::types::{
    InitializeResult, JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, ServerInfo,
    ToolCallParams, ToolsListResult, PROTOCOL_VERSION,
};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Serves the handler over stdin/stdout until EOF.
pub async fn serve_stdio(handler: RetrievalHandler) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    info!("retrieval service listening on stdio");

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcMessage>(line) {
            Ok(JsonRpcMessage::Request(request)) => dispatch(&handler, request).await,
            Ok(JsonRpcMessage::Response(_)) => {
                debug!("ignoring stray response frame");
                None
            }
            Err(e) => {
                warn!(error = %e, "unparseable frame");
                Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(Some(json!(e.to_string()))),
                ))
            }
        };

        if let Some(response) = response {
            let json = serde_json::to_string(&response).context("failed to serialize response")?;
            stdout
                .write_all(json.as_bytes())
                .await
                .context("failed to write stdout")?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

async fn dispatch(handler: &RetrievalHandler, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    let (id, method, params) = match request {
        JsonRpcRequest::Request {
            id, method, params, ..
        } => (id, method, params),
        JsonRpcRequest::Notification { method, .. } => {
            debug!(method, "notification received");
            return None;
        }
    };

    debug!(%id, method, "request");

    let response = match method.as_str() {
        "initialize" => {
            let result = InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: json!({"tools": {}}),
                server_info: ServerInfo {
                    name: "artigo-retrieval".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            };
            match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error(Some(json!(e.to_string()))),
                ),
            }
        }
        "tools/list" => {
            let result = ToolsListResult {
                tools: handler.tools(),
            };
            match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error(Some(json!(e.to_string()))),
                ),
            }
        }
        "tools/call" => {
            let params: ToolCallParams =
                match serde_json::from_value(params.unwrap_or(Value::Null)) {
                    Ok(params) => params,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            id,
                            JsonRpcError::invalid_params(Some(json!(e.to_string()))),
                        ))
                    }
                };

            let result = handler.call(&params.name, &params.arguments).await;
            match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(
                    id,
                    JsonRpcError::internal_error(Some(json!(e.to_string()))),
                ),
            }
        }
        other => {
            warn!(method = other, "unknown method");
            JsonRpcResponse::error(id, JsonRpcError::method_not_found(Some(json!(other))))
        }
    };

    Some(response)
}
