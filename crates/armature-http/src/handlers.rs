//! HTTP request handlers.
//!
//! `POST /mcp/execute` runs one method through the dispatcher; `GET /`
//! reports server status.

use armature_dispatch::{DispatchError, Dispatcher, Outcome};
use armature_protocol::ErrorObject;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// Response header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reports whether the external editor the tools launch is installed
#[async_trait]
pub trait EditorCheck: Send + Sync {
    /// `true` if an editor executable was found
    async fn editor_found(&self) -> bool;
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher shared with every request
    pub dispatcher: Dispatcher,
    /// Editor lookup for the status route; absent for tool sets without one
    pub editor: Option<Arc<dyn EditorCheck>>,
}

impl AppState {
    /// State without an editor check
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            editor: None,
        }
    }

    /// Report editor availability on `GET /`
    pub fn with_editor_check(mut self, check: Arc<dyn EditorCheck>) -> Self {
        self.editor = Some(check);
        self
    }
}

/// Body of `POST /mcp/execute`
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Value,
}

/// Successful execute response
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    /// Method result
    pub result: Value,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// JSON-RPC error object
    pub error: ErrorObject,
}

/// Status response for `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
    /// Always "ok"
    pub status: String,
    /// Number of registered tools
    pub tools: usize,
    /// Whether the tool set's editor executable was found
    #[serde(
        rename = "editorFound",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub editor_found: Option<bool>,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(pub DispatchError);

impl AppError {
    /// HTTP status for the error kind
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DispatchError::Parse(_) | DispatchError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            DispatchError::MethodNotFound(_) | DispatchError::ToolNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DispatchError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.0.to_error_object(),
        });
        (status, body).into_response()
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        AppError(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError(DispatchError::Parse(e.body_text()))
    }
}

/// POST /mcp/execute - Run one method
async fn execute(
    State(state): State<AppState>,
    body: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = body?;
    debug!("HTTP execute: {}", request.method);

    let outcome = state
        .dispatcher
        .execute(Value::Null, &request.method, request.params)
        .await
        .inspect_err(|e| {
            if e.is_client_error() {
                debug!("HTTP {} rejected: {}", request.method, e);
            } else {
                warn!("HTTP {} failed: {}", request.method, e);
            }
        })?;

    match outcome {
        Outcome::Reply(result) => Ok(Json(ExecuteResponse { result }).into_response()),
        Outcome::Silent => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// GET / - Server status
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let info = state.dispatcher.server_info();
    let editor_found = match &state.editor {
        Some(check) => Some(check.editor_found().await),
        None => None,
    };
    Json(StatusResponse {
        name: info.name,
        version: info.version,
        status: "ok".to_string(),
        tools: state.dispatcher.registry().len(),
        editor_found,
    })
}

/// Tag each request with a UUIDv7, in its log span and response header
async fn request_id(request: Request, next: Next) -> Response {
    let id = Uuid::now_v7().to_string();
    let span = info_span!("http", request_id = %id, method = %request.method(), path = %request.uri().path());

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/mcp/execute", post(execute))
        .with_state(state)
        .layer(middleware::from_fn(request_id))
        .layer(CorsLayer::permissive())
}
