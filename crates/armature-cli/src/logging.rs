//! Tracing subscriber setup.
//!
//! Logs never go to stdout: in stdio mode it carries the protocol.

use crate::config::LoggingConfig;
use crate::error::{CliError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Build the log filter: `RUST_LOG` wins over the configured level
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| CliError::Logging(format!("invalid log level '{}': {}", config.level, e)))
}

/// Install the global subscriber
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::Logging(format!("{}: {}", path.display(), e)))?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| CliError::Logging(e.to_string()))
}
