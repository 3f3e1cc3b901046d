/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flake` can emit.
///
/// The first two variants are the per-call failures of
/// [`FlakeGenerator::generate`]. Their `Display` output is the exact message
/// the HTTP service returns to clients.
///
/// [`FlakeGenerator::generate`]: crate::FlakeGenerator::generate
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reported a time earlier than the last accepted timestamp,
    /// usually after an NTP correction.
    ///
    /// The generator state is left untouched. Calls keep failing until the
    /// clock catches up with `last`.
    #[error("The clock went backwards!")]
    ClockRegression {
        /// The clock reading that was rejected (ms since the Unix epoch).
        now: u64,
        /// The last accepted timestamp (ms since the Unix epoch).
        last: u64,
    },

    /// All sequence values of the current millisecond have been handed out.
    ///
    /// Resolves on its own once the clock moves to the next millisecond.
    #[error("Sequence Overflow!")]
    SequenceOverflow {
        /// The exhausted millisecond (ms since the Unix epoch).
        timestamp: u64,
    },

    /// The time elapsed since the epoch no longer fits in the 41-bit
    /// timestamp field.
    #[error("Timestamp overflow: {elapsed} ms since the epoch exceeds the timestamp field")]
    TimestampOverflow {
        /// Milliseconds elapsed since the generator's epoch.
        elapsed: u64,
    },

    /// The worker id does not fit in the 10-bit worker field.
    #[error("Invalid worker id {worker_id}: must be at most {max}", max = crate::FlakeId::MAX_WORKER_ID)]
    InvalidWorkerId {
        /// The rejected worker id.
        worker_id: u64,
    },

    /// The clock reads earlier than the configured epoch, so no timestamp
    /// offset can be computed.
    #[error("Clock ({now} ms) is before the epoch ({epoch} ms)")]
    ClockBeforeEpoch {
        /// The clock reading (ms since the Unix epoch).
        now: u64,
        /// The configured epoch (ms since the Unix epoch).
        epoch: u64,
    },

    /// The operation failed because the generator lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg(not(feature = "parking-lot"))]
    #[error("Generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` if the condition resolves once the clock advances, so
    /// the caller may retry later.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ClockRegression { .. } | Self::SequenceOverflow { .. }
        )
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_http_bodies() {
        let regression = Error::ClockRegression { now: 1, last: 2 };
        let overflow = Error::SequenceOverflow { timestamp: 2 };
        assert_eq!(regression.to_string(), "The clock went backwards!");
        assert_eq!(overflow.to_string(), "Sequence Overflow!");
    }

    #[test]
    fn transient_errors() {
        assert!(Error::ClockRegression { now: 1, last: 2 }.is_transient());
        assert!(Error::SequenceOverflow { timestamp: 2 }.is_transient());
        assert!(!Error::InvalidWorkerId { worker_id: 5000 }.is_transient());
        assert!(!Error::TimestampOverflow { elapsed: u64::MAX }.is_transient());
    }

    #[test]
    fn invalid_worker_id_message_names_the_limit() {
        let err = Error::InvalidWorkerId { worker_id: 2048 };
        assert_eq!(
            err.to_string(),
            "Invalid worker id 2048: must be at most 1023"
        );
    }
}
