//! Error types for the binary.

use crate::config::ConfigError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Startup and run errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized
    #[error("Logging error: {0}")]
    Logging(String),

    /// Tool set could not be prepared
    #[error("Tool setup error: {0}")]
    Setup(#[from] armature_tools::SetupError),

    /// Stdio transport failed
    #[error("Stdio error: {0}")]
    Stdio(#[from] armature_stdio::StdioError),

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] armature_http::HttpError),
}
