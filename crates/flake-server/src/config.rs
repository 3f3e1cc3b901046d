use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use flake::FlakeId;

use crate::clock::ClockKind;

/// Runtime configuration for the `flake-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flake-server",
    version,
    about = "An HTTP service handing out Snowflake-style IDs"
)]
pub struct CliArgs {
    /// Worker id embedded in every ID, in `[0, 1023]`.
    ///
    /// Must be unique across every instance sharing an ID namespace. Nothing
    /// here checks that; assign it externally.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Time source backing the generator.
    ///
    /// Environment variable: `CLOCK`
    #[arg(long, env = "CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub worker_id: u64,
    pub server_addr: String,
    pub clock: ClockKind,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        validate_worker_id(args.worker_id)?;

        if args.server_addr.trim().is_empty() {
            bail!("SERVER_ADDR must not be empty");
        }

        Ok(Self {
            worker_id: args.worker_id,
            server_addr: args.server_addr,
            clock: args.clock,
        })
    }
}

/// Runtime configuration for the `flake-loop` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flake-loop",
    version,
    about = "Prints one Snowflake-style ID per interval"
)]
pub struct LoopArgs {
    /// Worker id embedded in every ID, in `[0, 1023]`.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Milliseconds between two generated IDs.
    ///
    /// Environment variable: `INTERVAL_MS`
    #[arg(long, env = "INTERVAL_MS", default_value_t = 1_000)]
    pub interval_ms: u64,

    /// Stop after this many attempts. Runs until interrupted if unset.
    ///
    /// Environment variable: `COUNT`
    #[arg(long, env = "COUNT")]
    pub count: Option<u64>,

    /// Time source backing the generator.
    ///
    /// Environment variable: `CLOCK`
    #[arg(long, env = "CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub worker_id: u64,
    pub interval: Duration,
    pub count: Option<u64>,
    pub clock: ClockKind,
}

impl TryFrom<LoopArgs> for LoopConfig {
    type Error = anyhow::Error;

    fn try_from(args: LoopArgs) -> Result<Self, Self::Error> {
        validate_worker_id(args.worker_id)?;

        if args.interval_ms == 0 {
            bail!("INTERVAL_MS must be greater than 0");
        }

        Ok(Self {
            worker_id: args.worker_id,
            interval: Duration::from_millis(args.interval_ms),
            count: args.count,
            clock: args.clock,
        })
    }
}

fn validate_worker_id(worker_id: u64) -> anyhow::Result<()> {
    if worker_id > FlakeId::MAX_WORKER_ID {
        bail!(
            "WORKER_ID ({}) exceeds the worker id space (max = {})",
            worker_id,
            FlakeId::MAX_WORKER_ID
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let args = CliArgs::try_parse_from(["flake-server"]).unwrap();
        let config = ServerConfig::try_from(args).unwrap();
        assert_eq!(config.worker_id, 0);
        assert_eq!(config.server_addr, "0.0.0.0:8080");
        assert_eq!(config.clock, ClockKind::System);
    }

    #[test]
    fn server_accepts_largest_worker_id() {
        let args = CliArgs::try_parse_from([
            "flake-server",
            "--worker-id",
            "1023",
            "--clock",
            "monotonic",
        ])
        .unwrap();
        let config = ServerConfig::try_from(args).unwrap();
        assert_eq!(config.worker_id, 1023);
        assert_eq!(config.clock, ClockKind::Monotonic);
    }

    #[test]
    fn server_rejects_worker_id_out_of_range() {
        let args = CliArgs::try_parse_from(["flake-server", "--worker-id", "1024"]).unwrap();
        let err = ServerConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("WORKER_ID (1024)"));
    }

    #[test]
    fn server_rejects_empty_address() {
        let args = CliArgs::try_parse_from(["flake-server", "--server-addr", " "]).unwrap();
        assert!(ServerConfig::try_from(args).is_err());
    }

    #[test]
    fn loop_defaults() {
        let args = LoopArgs::try_parse_from(["flake-loop"]).unwrap();
        let config = LoopConfig::try_from(args).unwrap();
        assert_eq!(config.worker_id, 0);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.count, None);
    }

    #[test]
    fn loop_rejects_zero_interval() {
        let args = LoopArgs::try_parse_from(["flake-loop", "--interval-ms", "0"]).unwrap();
        let err = LoopConfig::try_from(args).unwrap_err();
        assert!(err.to_string().contains("INTERVAL_MS"));
    }

    #[test]
    fn loop_parses_count() {
        let args = LoopArgs::try_parse_from(["flake-loop", "--count", "3"]).unwrap();
        assert_eq!(LoopConfig::try_from(args).unwrap().count, Some(3));
    }
}
