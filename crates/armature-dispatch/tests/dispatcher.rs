//! Integration tests for the dispatcher
//!
//! Exercise the full line → response path with small in-test tools.

use armature_dispatch::{
    DispatchConfig, Dispatcher, Tool, ToolContext, ToolError, ToolRegistry,
};
use armature_protocol::{JsonRpcRequest, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Echoes `text` back
struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "echo".to_string(),
            description: "Echo the given text".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            }),
        }
    }

    async fn call(&self, args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let text = args["text"].as_str().unwrap_or_default();
        Ok(ToolResult::text(text))
    }
}

/// Counts invocations; requires `name`
struct SpyTool {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for SpyTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "generate-spine-animation".to_string(),
            description: "Spy".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "description": {"type": "string"}
                },
                "required": ["name"]
            }),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ToolResult::text("generated"))
    }
}

/// Never settles
struct HangTool;

#[async_trait]
impl Tool for HangTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "hang".to_string(),
            description: "Never returns".to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        std::future::pending::<Result<ToolResult, ToolError>>().await
    }
}

/// Settles late and records whether it saw the cancellation
struct SlowTool {
    saw_cancel: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

#[async_trait]
impl Tool for SlowTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "slow".to_string(),
            description: "Sleeps past the timeout".to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        tokio::time::sleep(Duration::from_millis(150)).await;
        self.saw_cancel.store(ctx.cancel.is_cancelled(), Ordering::SeqCst);
        self.finished.store(true, Ordering::SeqCst);
        Ok(ToolResult::text("too late"))
    }
}

/// Waits for its token, then reports the cancellation
struct WatchTool {
    cancelled: Arc<AtomicBool>,
}

#[async_trait]
impl Tool for WatchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "watch".to_string(),
            description: "Waits for cancellation".to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        ctx.cancel.cancelled().await;
        self.cancelled.store(true, Ordering::SeqCst);
        Err(ToolError::Cancelled)
    }
}

/// Commits early, then keeps working past the timeout
struct CommittingTool {
    wrote: Arc<AtomicBool>,
}

#[async_trait]
impl Tool for CommittingTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "commit".to_string(),
            description: "Commits then writes slowly".to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        ctx.commit()?;
        tokio::time::sleep(Duration::from_millis(120)).await;
        self.wrote.store(true, Ordering::SeqCst);
        Ok(ToolResult::text("written"))
    }
}

struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "fail".to_string(),
            description: "Always fails".to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        Err(ToolError::Failed("disk on fire".to_string()))
    }
}

struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "panic".to_string(),
            description: "Panics".to_string(),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        panic!("boom");
    }
}

fn dispatcher_with(registry: ToolRegistry, timeout_ms: u64) -> Dispatcher {
    Dispatcher::new(
        registry,
        DispatchConfig::default().with_timeout_ms(timeout_ms),
    )
}

fn echo_dispatcher() -> Dispatcher {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool).unwrap();
    dispatcher_with(registry, 1_000)
}

#[tokio::test]
async fn test_echo_scenario_exact_response() {
    let d = echo_dispatcher();
    let line = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"echo","params":{"text":"hi"}}}"#;

    let response = d.handle_line(line).await.expect("response");
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"hi"}]}}"#
    );
}

#[tokio::test]
async fn test_arguments_key_accepted() {
    let d = echo_dispatcher();
    let request = JsonRpcRequest::new(
        "abc",
        "tools/call",
        json!({"name": "echo", "arguments": {"text": "mcp"}}),
    );
    let response = d.handle(request).await.unwrap();
    assert_eq!(response.id, json!("abc"));
    assert_eq!(response.result.unwrap()["content"][0]["text"], "mcp");
}

#[tokio::test]
async fn test_malformed_line_yields_parse_error() {
    let d = echo_dispatcher();
    let response = d.handle_line("{not json").await.expect("response");
    assert_eq!(response.id, Value::Null);
    let error = response.error.unwrap();
    assert_eq!(error.code, -32700);
    assert_eq!(error.message, "Parse error");
    assert!(error.data.is_some());
}

#[tokio::test]
async fn test_blank_line_ignored() {
    assert!(echo_dispatcher().handle_line("   ").await.is_none());
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let d = echo_dispatcher();
    let request = JsonRpcRequest::new(5, "tools/call", json!({"name": "nope", "params": {}}));
    let error = d.handle(request).await.unwrap().error.unwrap();
    assert_eq!(error.code, -32601);
    assert_eq!(error.message, "Tool not found: nope");
}

#[tokio::test]
async fn test_missing_required_field_never_invokes_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();
    registry
        .register(SpyTool {
            calls: calls.clone(),
        })
        .unwrap();
    let d = dispatcher_with(registry, 1_000);

    let request = JsonRpcRequest::new(
        9,
        "tools/call",
        json!({"name": "generate-spine-animation", "params": {"description": "no name"}}),
    );
    let response = d.handle(request).await.unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.message, "Invalid params: name is required");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let request = JsonRpcRequest::new(
        10,
        "tools/call",
        json!({"name": "generate-spine-animation", "params": {"name": "hero"}}),
    );
    assert!(d.handle(request).await.unwrap().result.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_notifications_produce_no_response_even_with_id() {
    let d = echo_dispatcher();
    let with_id = JsonRpcRequest::new(3, "notifications/initialized", Value::Null);
    assert!(d.handle(with_id).await.is_none());

    let without_id = JsonRpcRequest::notification("notifications/cancelled", json!({}));
    assert!(d.handle(without_id).await.is_none());
}

#[tokio::test]
async fn test_request_without_id_is_executed_silently() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();
    registry
        .register(SpyTool {
            calls: calls.clone(),
        })
        .unwrap();
    let d = dispatcher_with(registry, 1_000);

    let request = JsonRpcRequest::notification(
        "tools/call",
        json!({"name": "generate-spine-animation", "params": {"name": "hero"}}),
    );
    assert!(d.handle(request).await.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tools_list_contains_tool_once_and_is_stable() {
    let mut registry = ToolRegistry::new();
    registry.register(EchoTool).unwrap();
    registry.register(FailingTool).unwrap();
    let d = dispatcher_with(registry, 1_000);

    let first = d
        .handle(JsonRpcRequest::new(1, "tools/list", Value::Null))
        .await
        .unwrap();
    let second = d
        .handle(JsonRpcRequest::new(1, "tools/list", Value::Null))
        .await
        .unwrap();

    let tools = first.result.as_ref().unwrap()["tools"].as_array().unwrap().clone();
    let echoes: Vec<&Value> = tools.iter().filter(|t| t["name"] == "echo").collect();
    assert_eq!(echoes.len(), 1);
    assert_eq!(echoes[0]["description"], "Echo the given text");
    assert_eq!(tools[0]["name"], "echo");
    assert_eq!(tools[1]["name"], "fail");

    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
}

#[tokio::test]
async fn test_handler_error_becomes_internal_error() {
    let mut registry = ToolRegistry::new();
    registry.register(FailingTool).unwrap();
    let d = dispatcher_with(registry, 1_000);

    let request = JsonRpcRequest::new(4, "tools/call", json!({"name": "fail"}));
    let error = d.handle(request).await.unwrap().error.unwrap();
    assert_eq!(error.code, -32603);
    assert_eq!(error.message, "Internal error: disk on fire");
}

#[tokio::test]
async fn test_handler_panic_becomes_internal_error() {
    let mut registry = ToolRegistry::new();
    registry.register(PanickingTool).unwrap();
    let d = dispatcher_with(registry, 1_000);

    let request = JsonRpcRequest::new(4, "tools/call", json!({"name": "panic"}));
    let error = d.handle(request).await.unwrap().error.unwrap();
    assert_eq!(error.code, -32603);
    assert!(error.message.contains("panicked"));
}

#[tokio::test]
async fn test_hanging_handler_times_out() {
    let mut registry = ToolRegistry::new();
    registry.register(HangTool).unwrap();
    let d = dispatcher_with(registry, 100);

    let started = Instant::now();
    let request = JsonRpcRequest::new(11, "tools/call", json!({"name": "hang"}));
    let response = d.handle(request).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(response.id, json!(11));
    let error = response.error.unwrap();
    assert_eq!(error.code, -32603);
    assert_eq!(error.message, "Request processing timed out");
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(1_000), "took {:?}", elapsed);
    assert_eq!(d.context().in_flight(), 0);
}

#[tokio::test]
async fn test_late_handler_sees_cancellation_and_result_is_discarded() {
    let saw_cancel = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let mut registry = ToolRegistry::new();
    registry
        .register(SlowTool {
            saw_cancel: saw_cancel.clone(),
            finished: finished.clone(),
        })
        .unwrap();
    let d = dispatcher_with(registry, 30);

    let request = JsonRpcRequest::new(12, "tools/call", json!({"name": "slow"}));
    let response = d.handle(request).await.unwrap();
    assert!(response.is_error());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(finished.load(Ordering::SeqCst), "handler should run to completion");
    assert!(saw_cancel.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_overlapping_requests_have_independent_timers() {
    let mut registry = ToolRegistry::new();
    registry.register(HangTool).unwrap();
    registry.register(EchoTool).unwrap();
    let d = dispatcher_with(registry, 150);

    let hanging = {
        let d = d.clone();
        tokio::spawn(async move {
            d.handle(JsonRpcRequest::new(1, "tools/call", json!({"name": "hang"})))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let echo = d
        .handle(JsonRpcRequest::new(
            2,
            "tools/call",
            json!({"name": "echo", "params": {"text": "fast"}}),
        ))
        .await
        .unwrap();
    assert_eq!(echo.id, json!(2));
    assert!(echo.result.is_some());

    let timed_out = hanging.await.unwrap().unwrap();
    assert_eq!(timed_out.id, json!(1));
    assert_eq!(timed_out.error.unwrap().code, -32603);
}

#[tokio::test]
async fn test_abandoned_call_releases_entry_and_cancels_handler() {
    let cancelled = Arc::new(AtomicBool::new(false));
    let mut registry = ToolRegistry::new();
    registry
        .register(WatchTool {
            cancelled: cancelled.clone(),
        })
        .unwrap();
    let d = dispatcher_with(registry, 100);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(10),
        d.execute(json!(null), "tools/call", json!({"name": "watch"})),
    )
    .await;
    assert!(abandoned.is_err());
    assert_eq!(d.context().in_flight(), 0);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(cancelled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_committed_handler_outlives_timer() {
    let wrote = Arc::new(AtomicBool::new(false));
    let mut registry = ToolRegistry::new();
    registry
        .register(CommittingTool {
            wrote: wrote.clone(),
        })
        .unwrap();
    let d = dispatcher_with(registry, 30);

    let request = JsonRpcRequest::new(21, "tools/call", json!({"name": "commit"}));
    let response = d.handle(request).await.unwrap();

    assert!(wrote.load(Ordering::SeqCst));
    assert_eq!(response.result.unwrap()["content"][0]["text"], "written");
    assert_eq!(d.context().in_flight(), 0);
}
