//! Tool registry
//!
//! Built once at startup and handed to the dispatcher, which shares it
//! read-only for the rest of the process lifetime.

use crate::schema::ParamSchema;
use crate::tool::Tool;
use armature_protocol::ToolDefinition;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Registry error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

/// A registered tool with its compiled argument rules
#[derive(Clone)]
pub struct RegisteredTool {
    /// Definition reported by `tools/list`
    pub definition: ToolDefinition,
    /// Validation rules compiled from the input schema
    pub schema: ParamSchema,
    /// The handler
    pub handler: Arc<dyn Tool>,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.definition.name)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Name → tool table, in registration order
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register an already shared tool
    pub fn register_arc(&mut self, handler: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let definition = handler.definition();
        if self.index.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateTool(definition.name));
        }

        let schema = ParamSchema::from_input_schema(&definition.input_schema);
        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            schema,
            handler,
        });
        Ok(())
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Definitions for `tools/list`, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.definition.name.as_str()).collect()
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tool is registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::tool::ToolContext;
    use armature_protocol::ToolResult;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.0.to_string(),
                description: format!("{} tool", self.0),
                input_schema: json!({"type": "object", "required": ["x"]}),
            }
        }

        async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::text(self.0))
        }
    }

    #[test]
    fn test_new_registry() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_register_preserves_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Named("b")).unwrap();
        registry.register(Named("a")).unwrap();
        registry.register(Named("c")).unwrap();
        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        assert_eq!(registry.definitions()[1].description, "a tool");
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Named("echo")).unwrap();
        let err = registry.register(Named("echo")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("echo".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_schema_compiled_on_register() {
        let mut registry = ToolRegistry::new();
        registry.register(Named("t")).unwrap();
        let tool = registry.get("t").unwrap();
        assert_eq!(tool.schema.required_fields().collect::<Vec<_>>(), vec!["x"]);
    }
}
