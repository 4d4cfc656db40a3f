//! Armature HTTP
//!
//! JSON-over-HTTP binding of the dispatcher, for browser and scripting
//! clients. Each `POST /mcp/execute` call is an independent request with its
//! own timer.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::HttpConfig;
use handlers::{create_router, AppState};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// HTTP server error
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Server binding error
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that could not be bound
        addr: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server and run until Ctrl+C
pub async fn start_server(config: &HttpConfig, state: AppState) -> Result<(), HttpError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| HttpError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("HTTP server listening on {}", addr);

    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), HttpError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| HttpError::Server(e.to_string()))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
