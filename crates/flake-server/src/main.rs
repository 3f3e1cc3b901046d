use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use flake::LockFlakeGenerator;
use flake_server::clock::Clock;
use flake_server::config::{CliArgs, ServerConfig};
use flake_server::routes::router;
use flake_server::shutdown::shutdown_signal;
use flake_server::telemetry::init_telemetry;
use tokio::net::TcpListener;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry()?;

    let generator = LockFlakeGenerator::new(config.worker_id, Clock::from(config.clock))
        .context("failed to create the ID generator")?;
    let app = router(Arc::new(generator));

    let listener = TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?;
    log_startup_info(&config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shut down successfully");
    Ok(())
}

fn log_startup_info(config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting ID service on {} with full config: {:#?}",
            config.server_addr,
            config
        );
    } else {
        tracing::info!(
            "Starting ID service on {} as worker {}",
            config.server_addr,
            config.worker_id
        );
    }
}
