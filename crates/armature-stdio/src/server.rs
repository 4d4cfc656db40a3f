//! Stdio server loop

use crate::error::StdioError;
use armature_dispatch::{DispatchError, Dispatcher};
use armature_protocol::{Handshake, JsonRpcResponse};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Written when a response cannot be serialized
const SERIALIZE_FAILURE_LINE: &str = r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error: failed to serialize response"}}"#;

/// MCP server over a line-delimited byte stream
///
/// Each input line is dispatched on its own task, so a slow tool does not
/// hold up the requests behind it. Responses go through a single writer
/// task and may leave in a different order than their requests arrived.
pub struct StdioServer {
    dispatcher: Dispatcher,
}

impl StdioServer {
    /// Create a server over a dispatcher
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Serve the process's stdin and stdout
    pub async fn run_stdio(&self) -> Result<(), StdioError> {
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve `reader` and `writer` until the input closes
    ///
    /// The handshake line is written before the first request is read. On
    /// input close, in-flight requests are cancelled and abandoned; responses
    /// already produced are flushed before this returns. A line that is not
    /// UTF-8 gets a parse error and reading continues.
    pub async fn run<R, W>(&self, mut reader: R, writer: W) -> Result<(), StdioError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!("MCP server started");

        let (tx, rx) = mpsc::unbounded_channel::<String>();
        let writer_task = tokio::spawn(write_lines(writer, rx));

        let handshake = JsonRpcResponse::success(
            json!("handshake"),
            serde_json::to_value(Handshake::ready(&self.dispatcher.server_info()))?,
        );
        let _ = tx.send(serde_json::to_string(&handshake)?);

        let mut requests = JoinSet::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            while requests.try_join_next().is_some() {}

            let line = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Discarding line that is not UTF-8: {}", e);
                    let _ = tx.send(encode(&parse_failure(e.utf8_error().to_string())));
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            debug!("Received request: {}", line.trim_end());

            let dispatcher = self.dispatcher.clone();
            let tx = tx.clone();
            requests.spawn(async move {
                if let Some(response) = dispatcher.handle_line(&line).await {
                    let _ = tx.send(encode(&response));
                }
            });
        }

        let cancelled = self.dispatcher.context().cancel_all();
        requests.abort_all();
        info!("Input closed, {} pending requests cancelled", cancelled);

        drop(tx);
        while requests.join_next().await.is_some() {}
        writer_task
            .await
            .map_err(|e| StdioError::Io(std::io::Error::other(e)))??;

        info!("MCP server stopped");
        Ok(())
    }
}

fn parse_failure(detail: String) -> JsonRpcResponse {
    JsonRpcResponse::failure(Value::Null, DispatchError::Parse(detail).to_error_object())
}

fn encode(response: &JsonRpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        error!("Failed to serialize response: {}", e);
        SERIALIZE_FAILURE_LINE.to_string()
    })
}

async fn write_lines<W>(mut writer: W, mut rx: UnboundedReceiver<String>) -> Result<(), StdioError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        debug!("Sent response: {}", line);
    }
    writer.shutdown().await?;
    Ok(())
}
