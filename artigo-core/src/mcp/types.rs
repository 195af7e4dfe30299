//! Wire types for the retrieval service protocol.
//!
//! JSON-RPC 2.0 messages, newline-delimited, plus the MCP-flavored tool
//! envelopes (`tools/list`, `tools/call`) both sides exchange.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request or notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcRequest {
    /// Request with an id (expects a response).
    Request {
        jsonrpc: String,
        id: Value,
        method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<Value>,
    },
    /// Notification without an id (no response expected).
    Notification {
        jsonrpc: String,
        method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<Value>,
    },
}

impl JsonRpcRequest {
    pub fn new(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        JsonRpcRequest::Request {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        JsonRpcRequest::Notification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            JsonRpcRequest::Request { method, .. } => method,
            JsonRpcRequest::Notification { method, .. } => method,
        }
    }

    pub fn params(&self) -> Option<&Value> {
        match self {
            JsonRpcRequest::Request { params, .. } => params.as_ref(),
            JsonRpcRequest::Notification { params, .. } => params.as_ref(),
        }
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub result_or_error: ResultOrError,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result_or_error: ResultOrError::Success { result },
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result_or_error: ResultOrError::Error { error },
        }
    }
}

/// JSON-RPC 2.0 result or error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultOrError {
    Success { result: Value },
    Error { error: JsonRpcError },
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn parse_error(data: Option<Value>) -> Self {
        Self {
            code: -32700,
            message: "Parse error".to_string(),
            data,
        }
    }

    pub fn method_not_found(data: Option<Value>) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data,
        }
    }

    pub fn invalid_params(data: Option<Value>) -> Self {
        Self {
            code: -32602,
            message: "Invalid params".to_string(),
            data,
        }
    }

    pub fn internal_error(data: Option<Value>) -> Self {
        Self {
            code: -32603,
            message: "Internal error".to_string(),
            data,
        }
    }
}

/// Any message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
}

/// A tool advertised by the retrieval service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Result payload of `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDescriptor>,
}

/// Params of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Result payload of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }
}

/// A single content block in a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result payload of `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: Value,
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new(json!(1), "tools/call", Some(json!({"name": "x"})));
        let wire = serde_json::to_string(&request).unwrap();
        assert!(wire.contains("\"jsonrpc\":\"2.0\""));
        assert!(wire.contains("\"id\":1"));
        assert!(wire.contains("\"method\":\"tools/call\""));
    }

    #[test]
    fn test_notification_has_no_id() {
        let notification = JsonRpcRequest::notification("notifications/initialized", None);
        let wire = serde_json::to_string(&notification).unwrap();
        assert!(!wire.contains("\"id\""));
        assert!(!wire.contains("\"params\""));
    }

    #[test]
    fn test_message_round_trip_distinguishes_response() {
        let response = JsonRpcResponse::success(json!(7), json!({"ok": true}));
        let wire = serde_json::to_string(&JsonRpcMessage::Response(response)).unwrap();
        let parsed: JsonRpcMessage = serde_json::from_str(&wire).unwrap();
        match parsed {
            JsonRpcMessage::Response(r) => {
                assert_eq!(r.id, json!(7));
                assert!(matches!(r.result_or_error, ResultOrError::Success { .. }));
            }
            JsonRpcMessage::Request(_) => panic!("expected a response"),
        }
    }

    #[test]
    fn test_error_response_round_trip() {
        let response = JsonRpcResponse::error(json!(2), JsonRpcError::method_not_found(None));
        let wire = serde_json::to_string(&response).unwrap();
        let parsed: JsonRpcResponse = serde_json::from_str(&wire).unwrap();
        match parsed.result_or_error {
            ResultOrError::Error { error } => assert_eq!(error.code, -32601),
            ResultOrError::Success { .. } => panic!("expected an error"),
        }
    }

    #[test]
    fn test_tool_call_result_envelope() {
        let result = ToolCallResult::text("No results found.");
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["content"][0]["type"], "text");
        assert_eq!(wire["content"][0]["text"], "No results found.");
        assert_eq!(wire["isError"], false);
    }
}
