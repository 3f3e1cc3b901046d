//! # flake
//!
//! Snowflake-style 64-bit identifiers. Every [`FlakeId`] packs three fields
//! into a single `u64`:
//!
//! ```text
//!  Bit Index:  63           63 62            22 21            12 11             0
//!              +--------------+----------------+----------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
//!              +--------------+----------------+----------------+---------------+
//! ```
//!
//! IDs from one generator are strictly increasing: they sort by time first,
//! then by worker, then by sequence.
//!
//! ```
//! use flake::{FlakeGenerator, LockFlakeGenerator, SystemClock};
//!
//! let generator = LockFlakeGenerator::new(7, SystemClock).unwrap();
//! let id = generator.generate_or_yield(std::thread::yield_now).unwrap();
//! assert_eq!(id.worker_id(), 7);
//! ```
//!
//! ## Features
//!
//! - `parking-lot`: use `parking_lot::Mutex` in [`LockFlakeGenerator`]. The
//!   lock cannot be poisoned, so [`Error::LockPoisoned`] disappears.
//! - `serde`: (de)serialize [`FlakeId`] as its native integer and [`Stats`]
//!   with the field names the HTTP service exposes.
//! - `tracing`: instrument generation with `tracing` spans and events.

mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
