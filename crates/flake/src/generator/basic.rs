use core::{cell::Cell, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    FLAKE_EPOCH, FlakeGenerator, FlakeId, Result, Stats, TimeSource,
    generator::{FlakeState, validate},
};

/// A non-concurrent flake generator suitable for single-threaded use.
///
/// This generator is lightweight and fast, but **not thread-safe**: its state
/// lives in a [`Cell`], so it is neither `Sync` nor usable behind an `Arc`
/// from several threads.
///
/// ## Recommended When
/// - One thread owns the generator, such as a CLI loop
///
/// ## See Also
/// - [`LockFlakeGenerator`]
///
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
pub struct BasicFlakeGenerator<T>
where
    T: TimeSource,
{
    state: Cell<FlakeState>,
    worker_id: u64,
    epoch: u64,
    time: T,
}

impl<T> BasicFlakeGenerator<T>
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
    /// use flake::{BasicFlakeGenerator, SystemClock};
    ///
    /// let generator = BasicFlakeGenerator::new(1, SystemClock).unwrap();
    /// match generator.generate() {
    ///     Ok(id) => assert_eq!(id.worker_id(), 1),
    ///     Err(e) => println!("try again later: {e}"),
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
    /// `last_timestamp` is in milliseconds since the Unix epoch. `sequence`
    /// is the last value handed out for that millisecond and is clamped to
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
            state: Cell::new(FlakeState::new(last_timestamp, sequence)),
            worker_id,
            epoch,
            time,
        })
    }

    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<FlakeId> {
        let now = self.time.current_millis();
        let mut state = self.state.get();
        let outcome = state.advance(now, self.epoch, self.worker_id);
        self.state.set(state);
        outcome
    }

    /// Returns a snapshot of the generator's counters.
    pub fn stats(&self) -> Stats {
        let now = self.time.current_millis();
        self.state.get().snapshot(now, self.worker_id)
    }
}

impl<T> FlakeGenerator<T> for BasicFlakeGenerator<T>
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
        Ok(self.stats())
    }
}
