//! MCP-style protocol plumbing for the retrieval service.
//!
//! JSON-RPC 2.0 over newline-delimited stdio: the client spawns the server
//! process, performs the initialize handshake, and calls tools through
//! `tools/call`. The transport carries no state of its own; tool behavior
//! is identical locally and over the wire.

pub mod client;
pub mod transport;
pub mod types;

pub use client::RetrievalClient;
pub use types::{
    InitializeResult, JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, ServerInfo,
    ToolCallParams, ToolCallResult, ToolContent, ToolDescriptor, ToolsListResult,
};
