//! HTTP service and standalone loop serving flake IDs.
//!
//! Both binaries are thin transports over one generator from the `flake`
//! crate:
//!
//! - `flake-server` shares a [`LockFlakeGenerator`] between all requests and
//!   serves `GET /` (a new ID) and `GET /stats` (generator counters).
//! - `flake-loop` owns a [`BasicFlakeGenerator`] and prints one ID per
//!   interval.
//!
//! [`LockFlakeGenerator`]: flake::LockFlakeGenerator
//! [`BasicFlakeGenerator`]: flake::BasicFlakeGenerator

pub mod clock;
pub mod config;
pub mod error;
pub mod routes;
pub mod runner;
pub mod shutdown;
pub mod telemetry;
