use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    FLAKE_EPOCH, FlakeGenerator, FlakeId, Result, Stats, TimeSource,
    generator::{FlakeState, Mutex, validate},
};

/// A lock-based flake generator suitable for multi-threaded environments.
///
/// One mutex covers the whole read-check-increment-compose sequence,
/// including the clock read and the stats counters. Concurrent callers queue
/// on the lock, which is what makes every ID from one instance unique and
/// strictly increasing in call order.
///
/// Share it across threads or tasks with an [`Arc`].
///
/// ## Recommended When
/// - Several threads or async tasks generate IDs from one worker id
///
/// ## See Also
/// - [`BasicFlakeGenerator`]
///
/// [`Arc`]: std::sync::Arc
/// [`BasicFlakeGenerator`]: crate::BasicFlakeGenerator
pub struct LockFlakeGenerator<T>
where
    T: TimeSource,
{
    state: Mutex<FlakeState>,
    worker_id: u64,
    epoch: u64,
    time: T,
}

impl<T> LockFlakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `worker_id`, measuring time from
    /// [`FLAKE_EPOCH`].
    ///
    /// The current clock reading becomes the initial last timestamp.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::new`].
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use flake::{LockFlakeGenerator, SystemClock};
    ///
    /// let generator = Arc::new(LockFlakeGenerator::new(0, SystemClock).unwrap());
    ///
    /// let handles: Vec<_> = (0..4)
    ///     .map(|_| {
    ///         let generator = Arc::clone(&generator);
    ///         std::thread::spawn(move || generator.generate())
    ///     })
    ///     .collect();
    ///
    /// for handle in handles {
    ///     if let Ok(id) = handle.join().unwrap() {
    ///         assert_eq!(id.worker_id(), 0);
    ///     }
    /// }
    /// ```
    pub fn new(worker_id: u64, time: T) -> Result<Self> {
        Self::with_epoch(worker_id, FLAKE_EPOCH, time)
    }

    /// Creates a generator measuring time from a custom `epoch`, given as a
    /// [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::new`].
    pub fn with_epoch(worker_id: u64, epoch: Duration, time: T) -> Result<Self> {
        let now = time.current_millis();
        Self::from_components(now, worker_id, 0, epoch, time)
    }

    /// Creates a generator from explicit state.
    ///
    /// This constructor is primarily useful for tests or for controlling the
    /// starting point of the generator manually. `last_timestamp` is in
    /// milliseconds since the Unix epoch; `sequence` is clamped to
    /// [`FlakeId::MAX_SEQUENCE`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWorkerId`] if `worker_id` exceeds
    ///   [`FlakeId::MAX_WORKER_ID`]
    /// - [`Error::ClockBeforeEpoch`] if `last_timestamp` is before `epoch`
    ///
    /// [`Error::InvalidWorkerId`]: crate::Error::InvalidWorkerId
    /// [`Error::ClockBeforeEpoch`]: crate::Error::ClockBeforeEpoch
    pub fn from_components(
        last_timestamp: u64,
        worker_id: u64,
        sequence: u64,
        epoch: Duration,
        time: T,
    ) -> Result<Self> {
        let epoch = epoch.as_millis() as u64;
        validate(worker_id, epoch, last_timestamp)?;
        let sequence = sequence.min(FlakeId::MAX_SEQUENCE);
        Ok(Self {
            state: Mutex::new(FlakeState::new(last_timestamp, sequence)),
            worker_id,
            epoch,
            time,
        })
    }

    /// Generates the next ID.
    ///
    /// The clock is read while the lock is held, so callers observe clock
    /// readings in lock order.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<FlakeId> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = self.time.current_millis();
        state.advance(now, self.epoch, self.worker_id)
    }

    /// Returns a snapshot of the generator's counters, taken under the lock.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::stats`].
    pub fn stats(&self) -> Result<Stats> {
        let state = {
            #[cfg(feature = "parking-lot")]
            {
                *self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                *self.state.lock()?
            }
        };

        let now = self.time.current_millis();
        Ok(state.snapshot(now, self.worker_id))
    }
}

impl<T> FlakeGenerator<T> for LockFlakeGenerator<T>
where
    T: TimeSource,
{
    fn new(worker_id: u64, time: T) -> Result<Self> {
        Self::new(worker_id, time)
    }

    fn worker_id(&self) -> u64 {
        self.worker_id
    }

    fn epoch(&self) -> u64 {
        self.epoch
    }

    fn generate(&self) -> Result<FlakeId> {
        self.generate()
    }

    fn stats(&self) -> Result<Stats> {
        self.stats()
    }
}
