//! Armature Stdio
//!
//! Newline-delimited JSON-RPC over standard input and output, the framing
//! MCP clients such as Claude Desktop use when they launch a tool server as
//! a child process.
//!
//! # Example
//!
//! ```no_run
//! use armature_dispatch::{DispatchConfig, Dispatcher, ToolRegistry};
//! use armature_stdio::StdioServer;
//!
//! # async fn demo() -> Result<(), armature_stdio::StdioError> {
//! let dispatcher = Dispatcher::new(ToolRegistry::new(), DispatchConfig::default());
//! StdioServer::new(dispatcher).run_stdio().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod server;

pub use error::StdioError;
pub use server::StdioServer;
