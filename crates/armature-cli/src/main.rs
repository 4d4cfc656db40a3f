//! Armature - serves a tool set over stdio or HTTP.

use armature_cli::{logging, status, Cli, Result, ServerConfig};
use armature_dispatch::Dispatcher;
use armature_stdio::StdioServer;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    logging::init(&config.logging)?;

    info!(
        "Starting {} {} ({} tools)",
        config.dispatch.server_name, config.dispatch.server_version, config.tools.set
    );

    let registry = armature_tools::build_registry(&config.tools).await?;
    let dispatcher = Dispatcher::new(registry, config.dispatch.clone());

    if cli.stdio {
        StdioServer::new(dispatcher).run_stdio().await?;
    } else {
        let state = status::http_state(dispatcher, &config.tools);
        armature_http::start_server(&config.http, state).await?;
    }

    Ok(())
}
