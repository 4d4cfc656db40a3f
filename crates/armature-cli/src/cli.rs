//! Command-line arguments.

use armature_tools::ToolSet;
use clap::Parser;
use std::path::PathBuf;

/// Armature - JSON-RPC tool server for MCP clients.
#[derive(Debug, Parser)]
#[command(name = "armature")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ARMATURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve newline-delimited JSON-RPC on stdin/stdout instead of HTTP
    #[arg(long)]
    pub stdio: bool,

    /// HTTP port (overrides the config file)
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Tool set to expose: spine or games
    #[arg(short, long)]
    pub tools: Option<ToolSet>,

    /// Log filter, e.g. "debug" or "armature_dispatch=trace"
    #[arg(long)]
    pub log_level: Option<String>,
}
