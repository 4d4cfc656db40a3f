//! Method router and timeout wrapper

use crate::config::DispatchConfig;
use crate::context::DispatchContext;
use crate::error::DispatchError;
use crate::registry::ToolRegistry;
use crate::tool::ToolContext;
use armature_protocol::{
    Capabilities, InitializeResult, JsonRpcRequest, JsonRpcResponse, PromptsListResult,
    ResourcesListResult, ServerInfo, ToolsListResult,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Prefix of methods that are consumed without a response
const NOTIFICATION_PREFIX: &str = "notifications/";

/// Result of executing one method
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The method produced a result
    Reply(Value),
    /// A `notifications/*` method; nothing is sent back
    Silent,
}

struct Inner {
    registry: Arc<ToolRegistry>,
    config: DispatchConfig,
    context: DispatchContext,
}

/// JSON-RPC dispatcher
///
/// Cheap to clone; clones share the registry and the in-flight table.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Create a dispatcher over a finished registry
    pub fn new(registry: ToolRegistry, config: DispatchConfig) -> Self {
        info!(
            "Dispatcher ready: {} tools, timeout {} ms",
            registry.len(),
            config.timeout_ms
        );
        Self {
            inner: Arc::new(Inner {
                registry: Arc::new(registry),
                config,
                context: DispatchContext::new(),
            }),
        }
    }

    /// Registered tools
    pub fn registry(&self) -> &ToolRegistry {
        &self.inner.registry
    }

    /// In-flight request table
    pub fn context(&self) -> &DispatchContext {
        &self.inner.context
    }

    /// Configuration in use
    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    /// Server identity
    pub fn server_info(&self) -> ServerInfo {
        self.inner.config.server_info()
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.inner.config.timeout()
    }

    /// Handle one line of the stdio framing
    ///
    /// Blank lines yield nothing. Malformed JSON yields a parse error with a
    /// `null` id.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                Some(JsonRpcResponse::failure(
                    Value::Null,
                    DispatchError::Parse(e.to_string()).to_error_object(),
                ))
            }
        }
    }

    /// Handle a parsed request, returning the response to write (if any)
    ///
    /// Requests without an id are executed but never answered.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        debug!("Received request: {} (id {:?})", method, id);

        let outcome = self
            .execute(id.clone().unwrap_or(Value::Null), &method, params)
            .await;

        let Some(id) = id else {
            debug!("No response for notification {}", method);
            return None;
        };

        match outcome {
            Ok(Outcome::Reply(result)) => Some(JsonRpcResponse::success(id, result)),
            Ok(Outcome::Silent) => None,
            Err(e) => {
                warn!("Request {} ({}) failed: {}", id, method, e);
                Some(JsonRpcResponse::failure(id, e.to_error_object()))
            }
        }
    }

    /// Execute a method under the request timeout
    ///
    /// The routed work runs on its own task. If the timer fires first the
    /// request's token is cancelled and a timeout error is returned; the task
    /// is left to finish and its result is discarded. A handler that committed
    /// its work before the timer fired is awaited instead. Dropping the
    /// returned future cancels the request.
    pub async fn execute(
        &self,
        id: Value,
        method: &str,
        params: Value,
    ) -> Result<Outcome, DispatchError> {
        if method.starts_with(NOTIFICATION_PREFIX) {
            debug!("Received notification: {}", method);
            return Ok(Outcome::Silent);
        }

        let entry = self.inner.context.begin(id.clone(), method);
        let tool_ctx = ToolContext::dispatched(id, entry.token().clone(), entry.commit_handle());

        let worker = self.clone();
        let routed_method = method.to_string();
        let mut task =
            tokio::spawn(async move { worker.route(&routed_method, params, tool_ctx).await });

        let timeout = self.timeout();
        let joined = match tokio::time::timeout(timeout, &mut task).await {
            Ok(joined) => {
                if let Some(elapsed) = entry.complete() {
                    debug!("{} settled in {:?}", method, elapsed);
                }
                joined
            }
            Err(_) if entry.abandon() => {
                warn!("Request processing timeout: {} after {:?}", method, timeout);
                return Err(DispatchError::Timeout {
                    timeout_ms: self.inner.config.timeout_ms,
                });
            }
            Err(_) => {
                debug!("{} committed before the timer fired", method);
                task.await
            }
        };
        settle(joined)
    }

    /// Flat method table
    async fn route(
        &self,
        method: &str,
        params: Value,
        ctx: ToolContext,
    ) -> Result<Value, DispatchError> {
        match method {
            "initialize" => to_result(InitializeResult {
                protocol_version: self.inner.config.protocol_version.clone(),
                capabilities: Capabilities::default(),
                server_info: self.server_info(),
            }),
            "tools/list" => to_result(ToolsListResult {
                tools: self.inner.registry.definitions(),
            }),
            "tools/call" => self.call_tool(params, ctx).await,
            "resources/list" => to_result(ResourcesListResult::default()),
            "prompts/list" => to_result(PromptsListResult::default()),
            "ping" => Ok(json!({})),
            _ => Err(DispatchError::MethodNotFound(method.to_string())),
        }
    }

    /// Handle tools/call
    async fn call_tool(&self, params: Value, ctx: ToolContext) -> Result<Value, DispatchError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                DispatchError::InvalidParams("Invalid params: name is required".to_string())
            })?;

        let args = match params.get("params").or_else(|| params.get("arguments")) {
            None | Some(Value::Null) => json!({}),
            Some(args) => args.clone(),
        };

        let tool = self
            .inner
            .registry
            .get(name)
            .ok_or_else(|| DispatchError::ToolNotFound(name.to_string()))?;

        tool.schema
            .validate(&args)
            .map_err(DispatchError::InvalidParams)?;

        debug!("Calling tool: {} with params: {}", name, args);
        let result = tool.handler.call(args, ctx).await.map_err(|e| {
            warn!("Error executing tool {}: {}", name, e);
            DispatchError::from(e)
        })?;
        debug!("Tool {} execution successful", name);

        to_result(result)
    }
}

fn settle(
    joined: Result<Result<Value, DispatchError>, JoinError>,
) -> Result<Outcome, DispatchError> {
    match joined {
        Ok(result) => result.map(Outcome::Reply),
        Err(e) if e.is_panic() => Err(DispatchError::Internal(
            "tool handler panicked".to_string(),
        )),
        Err(e) => Err(DispatchError::Internal(e.to_string())),
    }
}

fn to_result<T: Serialize>(value: T) -> Result<Value, DispatchError> {
    serde_json::to_value(value).map_err(|e| DispatchError::Internal(e.to_string()))
}
