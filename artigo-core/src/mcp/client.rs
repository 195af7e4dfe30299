//! Client for the retrieval service.
//!
//! One `RetrievalClient` is connected at the start of a pipeline run and
//! reused for every tool call until `disconnect`; there is no per-call
//! session setup.

use super::transport::StdioTransport;
use super::types::{
    JsonRpcMessage, JsonRpcRequest, ResultOrError, ToolCallResult, JSONRPC_VERSION,
    PROTOCOL_VERSION,
};
use crate::config::ServerConfig;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::info;

pub struct RetrievalClient {
    transport: StdioTransport,
    next_id: u64,
}

impl RetrievalClient {
    /// Spawns the configured server process and performs the initialize
    /// handshake. The returned client stays connected until
    /// [`disconnect`](Self::disconnect) or drop.
    pub async fn connect(server: &ServerConfig) -> Result<Self> {
        let transport = StdioTransport::spawn(&server.command, &server.args)?;
        let mut client = Self {
            transport,
            next_id: 1,
        };

        client
            .request(
                "initialize",
                Some(json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "clientInfo": {"name": "artigo", "version": env!("CARGO_PKG_VERSION")},
                    "capabilities": {},
                })),
            )
            .await
            .context("initialize handshake failed")?;

        client.notify("notifications/initialized", None).await?;
        info!(command = %server.command, "retrieval service connected");

        Ok(client)
    }

    /// Calls a tool and returns its text content.
    ///
    /// Tool-level failures come back as inline error text, not as `Err`;
    /// the calling agent is expected to read and react to them.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<String> {
        let result = self
            .request(
                "tools/call",
                Some(json!({"name": name, "arguments": arguments})),
            )
            .await?;

        let call_result: ToolCallResult =
            serde_json::from_value(result).context("malformed tools/call result")?;

        Ok(call_result
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Similarity search over the article index.
    pub async fn search_articles(&mut self, query: &str) -> Result<String> {
        self.call_tool("search_articles", json!({"query": query}))
            .await
    }

    /// Full chunk content by exact id.
    pub async fn get_article_content(&mut self, id: &str) -> Result<String> {
        self.call_tool("get_article_content", json!({"id": id}))
            .await
    }

    /// Whether the server process is still running.
    pub fn is_alive(&mut self) -> bool {
        self.transport.is_alive()
    }

    /// Tears the connection down, killing the server process.
    pub async fn disconnect(self) {
        info!("retrieval service disconnected");
        // Dropping the transport kills the child process.
        drop(self.transport);
    }

    async fn request(&mut self, method: impl Into<String>, params: Option<Value>) -> Result<Value> {
        let id = Value::Number(serde_json::Number::from(self.next_id));
        self.next_id += 1;

        let request = JsonRpcRequest::new(id.clone(), method, params);
        self.transport
            .send(&JsonRpcMessage::Request(request))
            .await?;

        // Wait for the response matching our id; anything else on the wire
        // (server-initiated requests, stale responses) is skipped.
        loop {
            match self.transport.receive().await? {
                JsonRpcMessage::Response(response) if response.id == id => {
                    match response.result_or_error {
                        ResultOrError::Success { result } => return Ok(result),
                        ResultOrError::Error { error } => {
                            anyhow::bail!(
                                "JSON-RPC error: {} (code: {})",
                                error.message,
                                error.code
                            )
                        }
                    }
                }
                _ => continue,
            }
        }
    }

    /// Sends a notification (no response expected).
    async fn notify(&mut self, method: impl Into<String>, params: Option<Value>) -> Result<()> {
        let notification = JsonRpcRequest::Notification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        };
        self.transport
            .send(&JsonRpcMessage::Request(notification))
            .await
    }
}
