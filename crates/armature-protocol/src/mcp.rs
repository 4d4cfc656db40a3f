//! MCP result payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool definition, as listed by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input schema (JSON Schema)
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// `tools/list` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    /// Available tools, in registration order
    pub tools: Vec<ToolDefinition>,
}

/// `resources/list` result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesListResult {
    /// Always empty
    pub resources: Vec<Value>,
}

/// `prompts/list` result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsListResult {
    /// Always empty
    pub prompts: Vec<Value>,
}

/// A single content item of a tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
}

impl Content {
    /// Create a text item
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }
}

/// Result of a `tools/call`
///
/// Tools may attach extra top-level fields next to `content`
/// (e.g. `filePath` for a generated file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content items
    pub content: Vec<Content>,
    /// Extra fields, flattened into the result object
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolResult {
    /// A result with one text item
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            extra: Map::new(),
        }
    }

    /// Attach an extra top-level field
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Concatenated text of all items
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                Content::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// MCP server info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Tools capability marker (serialized as `{}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsCapability {}

/// Server capabilities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Tools capability
    pub tools: ToolsCapability,
}

/// `initialize` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    /// Protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Capabilities
    pub capabilities: Capabilities,
    /// Server info
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Unsolicited readiness notice written once before the first request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handshake {
    /// Always "ready"
    pub status: String,
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

impl Handshake {
    /// Readiness notice for the given server
    pub fn ready(info: &ServerInfo) -> Self {
        Self {
            status: "ready".to_string(),
            name: info.name.clone(),
            version: info.version.clone(),
        }
    }
}
