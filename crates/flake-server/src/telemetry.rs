//! Log output for both binaries.
//!
//! Events go through `tracing` and are printed by a `tracing_subscriber::fmt`
//! layer on stderr, leaving stdout to the IDs printed by `flake-loop`. The
//! level is controlled by `RUST_LOG` and defaults to `info`.
//!
//! ```bash
//! RUST_LOG=flake=trace,tower_http=debug flake-server
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
