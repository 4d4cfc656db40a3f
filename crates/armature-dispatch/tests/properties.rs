//! Property tests for dispatcher invariants

use armature_dispatch::{
    DispatchConfig, Dispatcher, Tool, ToolContext, ToolError, ToolRegistry,
};
use armature_protocol::{JsonRpcRequest, ToolDefinition, ToolResult};
use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CountingTool {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Tool for CountingTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "spine-project-details".to_string(),
            description: "Counts calls".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {"projectName": {"type": "string"}},
                "required": ["projectName"]
            }),
        }
    }

    async fn call(&self, _args: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ToolResult::text("details"))
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn setup() -> (Dispatcher, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = ToolRegistry::new();
    registry
        .register(CountingTool {
            calls: calls.clone(),
        })
        .unwrap();
    (
        Dispatcher::new(registry, DispatchConfig::default().with_timeout_ms(2_000)),
        calls,
    )
}

fn request_id() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z0-9-]{1,16}".prop_map(|s| json!(s)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a known method answers exactly once with the request's id
    #[test]
    fn test_response_id_matches_request(id in request_id(), method in prop::sample::select(vec![
        "initialize", "tools/list", "resources/list", "prompts/list", "ping",
    ])) {
        let (dispatcher, _) = setup();
        let response = runtime().block_on(dispatcher.handle(JsonRpcRequest::new(id.clone(), method, json!({}))));
        let response = response.expect("one response");
        prop_assert_eq!(response.id, id);
        prop_assert!(response.result.is_some());
    }

    /// Property: notifications/* never produce a response
    #[test]
    fn test_notifications_are_silent(suffix in "[a-z/]{0,20}", id in proptest::option::of(request_id())) {
        let (dispatcher, _) = setup();
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id,
            method: format!("notifications/{}", suffix),
            params: Value::Null,
        };
        prop_assert!(runtime().block_on(dispatcher.handle(request)).is_none());
    }

    /// Property: unregistered tool names are method-not-found
    #[test]
    fn test_unknown_tools_are_method_not_found(name in "[a-z_]{1,24}") {
        prop_assume!(name != "spine-project-details");
        let (dispatcher, calls) = setup();
        let request = JsonRpcRequest::new(1, "tools/call", json!({"name": name, "params": {}}));
        let response = runtime().block_on(dispatcher.handle(request)).unwrap();
        prop_assert_eq!(response.error.map(|e| e.code), Some(-32601));
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    /// Property: missing required field is invalid-params and the handler is never invoked
    #[test]
    fn test_missing_required_never_invokes(other_key in "[a-zA-Z]{1,12}", other_val in any::<i32>()) {
        prop_assume!(other_key != "projectName");
        let (dispatcher, calls) = setup();
        let mut args = serde_json::Map::new();
        args.insert(other_key, json!(other_val));
        let request = JsonRpcRequest::new(
            2,
            "tools/call",
            json!({"name": "spine-project-details", "params": args}),
        );
        let response = runtime().block_on(dispatcher.handle(request)).unwrap();
        prop_assert_eq!(response.error.map(|e| e.code), Some(-32602));
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
