//! Error types for dispatch and tool execution.

use armature_protocol::{error_codes, ErrorObject};
use serde_json::json;
use thiserror::Error;

/// Protocol-facing dispatch errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// Malformed JSON on the wire
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unknown top-level method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Unknown tool name under `tools/call`
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Missing or malformed arguments; the message is complete
    #[error("{0}")]
    InvalidParams(String),

    /// Handler failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// The handler did not settle before the request timer fired
    #[error("Request processing timed out")]
    Timeout {
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },
}

impl DispatchError {
    /// Convert to JSON-RPC error code
    ///
    /// Timeouts keep the internal-error code on the wire.
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::Parse(_) => error_codes::PARSE_ERROR,
            DispatchError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            DispatchError::ToolNotFound(_) => error_codes::METHOD_NOT_FOUND,
            DispatchError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            DispatchError::Internal(_) => error_codes::INTERNAL_ERROR,
            DispatchError::Timeout { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Build the wire error object
    pub fn to_error_object(&self) -> ErrorObject {
        match self {
            DispatchError::Parse(detail) => {
                ErrorObject::new(self.code(), "Parse error").with_data(json!(detail))
            }
            DispatchError::Timeout { timeout_ms } => ErrorObject::new(self.code(), self.to_string())
                .with_data(json!({ "timeoutMs": timeout_ms })),
            _ => ErrorObject::new(self.code(), self.to_string()),
        }
    }

    /// Whether the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DispatchError::Parse(_)
                | DispatchError::MethodNotFound(_)
                | DispatchError::ToolNotFound(_)
                | DispatchError::InvalidParams(_)
        )
    }
}

/// Errors raised by tool handlers
#[derive(Error, Debug)]
pub enum ToolError {
    /// Filesystem or process error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Arguments passed schema validation but are still unusable
    #[error("{0}")]
    Invalid(String),

    /// The request timed out before the handler committed its work
    #[error("Operation cancelled after the request timed out")]
    Cancelled,

    /// Any other failure
    #[error("{0}")]
    Failed(String),
}

impl From<ToolError> for DispatchError {
    fn from(e: ToolError) -> Self {
        DispatchError::Internal(e.to_string())
    }
}
