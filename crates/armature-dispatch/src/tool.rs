//! Tool handler trait

use crate::cancel::CancellationToken;
use crate::context::CommitHandle;
use crate::error::ToolError;
use armature_protocol::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde_json::Value;

/// Per-call context handed to a tool
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Id of the request that triggered the call (`null` for HTTP and notifications)
    pub request_id: Value,
    /// Cancelled when the request times out
    pub cancel: CancellationToken,
    commit: Option<CommitHandle>,
}

impl ToolContext {
    /// Context for a direct invocation outside the dispatcher
    pub fn detached() -> Self {
        Self {
            request_id: Value::Null,
            cancel: CancellationToken::new(),
            commit: None,
        }
    }

    pub(crate) fn dispatched(
        request_id: Value,
        cancel: CancellationToken,
        commit: CommitHandle,
    ) -> Self {
        Self {
            request_id,
            cancel,
            commit: Some(commit),
        }
    }

    /// Fail with [`ToolError::Cancelled`] if the request already timed out
    ///
    /// Long-running handlers poll this; writes go through [`commit`](Self::commit).
    pub fn ensure_active(&self) -> Result<(), ToolError> {
        if self.cancel.is_cancelled() {
            Err(ToolError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Take ownership of the response before an externally visible write
    ///
    /// After this succeeds the request can no longer time out, so the write
    /// and the reply describing it always go together. Fails with
    /// [`ToolError::Cancelled`] if the timer already answered the request.
    pub fn commit(&self) -> Result<(), ToolError> {
        self.ensure_active()?;
        match &self.commit {
            Some(handle) if !handle.claim() => Err(ToolError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// A named, schema-described async operation
///
/// The dispatcher validates `args` against `definition().input_schema`
/// before `call` runs, so required fields are present and typed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool
    async fn call(&self, args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError>;
}
