use anyhow::Context;
use clap::Parser;
use flake::BasicFlakeGenerator;
use flake_server::clock::Clock;
use flake_server::config::{LoopArgs, LoopConfig};
use flake_server::runner::run_loop;
use flake_server::shutdown::shutdown_signal;
use flake_server::telemetry::init_telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = LoopArgs::parse();
    let config = LoopConfig::try_from(args)?;

    init_telemetry()?;

    let generator = BasicFlakeGenerator::new(config.worker_id, Clock::from(config.clock))
        .context("failed to create the ID generator")?;

    tracing::info!(
        worker_id = config.worker_id,
        interval_ms = config.interval.as_millis() as u64,
        "Starting ID loop"
    );

    let mut stdout = std::io::stdout().lock();
    let stats = run_loop(&generator, &config, &mut stdout, shutdown_signal()).await?;

    tracing::info!(
        generated = stats.generated_ids,
        errors = stats.errors,
        "ID loop finished"
    );
    Ok(())
}
