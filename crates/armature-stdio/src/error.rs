//! Error types for the stdio transport.

use thiserror::Error;

/// Stdio transport error
#[derive(Error, Debug)]
pub enum StdioError {
    /// Reading input or writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A protocol message could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
