//! Armature CLI library.
//!
//! Argument parsing, TOML configuration, logging setup and HTTP status
//! wiring for the `armature` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod status;

pub use cli::Cli;
pub use config::{LoggingConfig, ServerConfig};
pub use error::{CliError, Result};
