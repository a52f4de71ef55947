//! InstructLab UI gateway - headless server
//!
//! A Rust HTTP server that:
//! - Proxies the browser's /api/* calls to the fine-tuning API server, the
//!   document collections server and the checkpoint service
//! - Lists the local taxonomy tree
//! - Optionally serves the built UI bundle with an SPA fallback
//!
//! Access via: http://localhost:3000

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod config_commands;
mod gpu_watch;
mod router;
mod server_utils;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands, ConfigCommands};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match cli.command {
        None | Some(Commands::Serve) => run_server(&cli.host, cli.port).await,
        Some(Commands::GpuWatch { url, interval }) => gpu_watch::run(&url, interval).await,
        Some(Commands::Config(ConfigCommands::Show { json })) => config_commands::show_config(json),
    }
}

async fn run_server(host: &str, port: u16) -> Result<()> {
    info!("🚀 InstructLab UI gateway v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ilab_core::GatewayConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    info!("🔀 API server:  {}", config.api_server_url);
    info!("🔀 Collections: {}", config.collections_url);
    info!("🔀 Checkpoints: {}", config.checkpoints_url);
    info!("🌳 Taxonomy:    {}", config.taxonomy_dir().display());

    let state = AppState::new(config)?;
    info!("✅ Application state initialized");

    let app = router::build_router(state);
    let listener = server_utils::create_listener(host, port)?;
    let addr = listener.local_addr()?;

    info!("🌐 Server listening on http://{}", addr);
    info!("🔌 API available at http://{}/api/", addr);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    info!("👋 Server shut down gracefully");
    Ok(())
}
