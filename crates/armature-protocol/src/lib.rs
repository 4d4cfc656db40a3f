//! Armature Protocol
//!
//! Wire types shared by every Armature transport: the JSON-RPC 2.0 envelope
//! (requests, success and error responses, reserved error codes) and the MCP
//! result payloads returned by the built-in methods.
//!
//! This crate holds no behavior beyond constructors and serde attributes, so
//! both the dispatcher and the transports can depend on it without pulling in
//! a runtime.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod jsonrpc;
pub mod mcp;

// Re-exports for convenience
pub use jsonrpc::{error_codes, ErrorObject, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
pub use mcp::{
    Capabilities, Content, Handshake, InitializeResult, PromptsListResult, ResourcesListResult,
    ServerInfo, ToolDefinition, ToolResult, ToolsCapability, ToolsListResult,
};
