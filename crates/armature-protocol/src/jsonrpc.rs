//! JSON-RPC 2.0 envelope types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version string carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Reserved JSON-RPC error codes
pub mod error_codes {
    /// Invalid JSON was received
    pub const PARSE_ERROR: i32 = -32700;
    /// The method (or tool) does not exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameters
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error, including handler failures and timeouts
    pub const INTERNAL_ERROR: i32 = -32603;
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// JSON-RPC request
///
/// `id` absent or `null` marks a notification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (expected "2.0")
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    /// Request ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Create a request with the given id
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Create a notification (a request without an id)
    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            id: None,
            method: method.into(),
            params,
        }
    }

    /// Whether the sender expects no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Error detail structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Optional structured detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Create an error without data
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach structured detail
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// JSON-RPC response
///
/// Exactly one of `result` and `error` is set. `id` is always serialized and
/// is `null` when the request id could not be determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    pub id: Value,
    /// Result data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl JsonRpcResponse {
    /// Create a new success response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create a new error response
    pub fn failure(id: Value, error: ErrorObject) -> Self {
        Self {
            jsonrpc: default_version(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Whether this response carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
