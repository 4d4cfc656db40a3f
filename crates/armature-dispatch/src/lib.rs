//! Armature Dispatch
//!
//! The core of Armature: a JSON-RPC 2.0 method router that executes
//! registered tools under a per-request timeout.
//!
//! ## Key Concepts
//!
//! - **Tool**: a named async operation with a JSON Schema for its arguments
//! - **Registry**: tool table built at startup, read-only afterwards
//! - **Dispatch context**: one pending entry per in-flight request, so
//!   overlapping requests never share a timer
//! - **Cancellation**: a timed-out request's token is cancelled; the handler
//!   keeps running but its result is discarded
//!
//! # Example
//!
//! ```no_run
//! use armature_dispatch::{DispatchConfig, Dispatcher, ToolRegistry};
//!
//! # async fn demo() {
//! let dispatcher = Dispatcher::new(ToolRegistry::new(), DispatchConfig::default());
//! let response = dispatcher
//!     .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
//!     .await;
//! assert!(response.is_some());
//! # }
//! ```

#![warn(missing_docs)]

mod cancel;
mod config;
mod context;
mod dispatcher;
mod error;
mod registry;
mod schema;
mod tool;

pub use cancel::CancellationToken;
pub use config::DispatchConfig;
pub use context::{CommitHandle, DispatchContext, InFlight, Ticket};
pub use dispatcher::{Dispatcher, Outcome};
pub use error::{DispatchError, ToolError};
pub use registry::{RegisteredTool, RegistryError, ToolRegistry};
pub use schema::ParamSchema;
pub use tool::{Tool, ToolContext};
