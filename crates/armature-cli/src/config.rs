//! Configuration file parsing.
//!
//! Every section is optional; a missing file means all defaults.

use crate::cli::Cli;
use armature_dispatch::DispatchConfig;
use armature_http::config::HttpConfig;
use armature_tools::ToolsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter used when `RUST_LOG` is unset
    /// Default: info
    #[serde(default = "default_level")]
    pub level: String,

    /// Append logs to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Dispatcher settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// HTTP listener
    #[serde(default)]
    pub http: HttpConfig,

    /// Tool set selection and directories
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.http.bind_port = port;
        }
        if let Some(set) = cli.tools {
            self.tools.set = set;
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
    }
}
