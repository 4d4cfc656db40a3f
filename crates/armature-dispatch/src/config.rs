//! Dispatcher configuration

use armature_protocol::ServerInfo;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the method router and timeout wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Per-request timeout in milliseconds
    /// Default: 30000
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Name reported by `initialize` and the stdio handshake
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Version reported by `initialize` and the stdio handshake
    #[serde(default = "default_server_version")]
    pub server_version: String,

    /// MCP protocol revision reported by `initialize`
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_server_name() -> String {
    "spine-animation-server".to_string()
}

fn default_server_version() -> String {
    "1.0.0".to_string()
}

fn default_protocol_version() -> String {
    "2024-11-05".to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            server_name: default_server_name(),
            server_version: default_server_version(),
            protocol_version: default_protocol_version(),
        }
    }
}

impl DispatchConfig {
    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Server identity
    pub fn server_info(&self) -> ServerInfo {
        ServerInfo {
            name: self.server_name.clone(),
            version: self.server_version.clone(),
        }
    }

    /// Same settings with another timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
