use crate::{Error, FlakeId, Result, Stats, TimeSource};

/// A minimal interface for generating flake IDs.
pub trait FlakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator for `worker_id` measuring time from
    /// [`FLAKE_EPOCH`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWorkerId`] if `worker_id` exceeds
    ///   [`FlakeId::MAX_WORKER_ID`]
    /// - [`Error::ClockBeforeEpoch`] if `time` reads earlier than the epoch
    ///
    /// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
    fn new(worker_id: u64, time: T) -> Result<Self>
    where
        Self: Sized;

    /// The worker id embedded in every generated ID.
    fn worker_id(&self) -> u64;

    /// The epoch timestamps are measured from, in ms since the Unix epoch.
    fn epoch(&self) -> u64;

    /// Generates the next ID, failing fast when uniqueness cannot be
    /// guaranteed.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   accepted timestamp. The generator state is left untouched.
    /// - [`Error::SequenceOverflow`] if every sequence value of the current
    ///   millisecond is used up.
    /// - [`Error::TimestampOverflow`] once the 41-bit timestamp range is
    ///   exhausted.
    /// - [`Error::LockPoisoned`] if the generator uses a std mutex and another
    ///   thread panicked while holding it.
    fn generate(&self) -> Result<FlakeId>;

    /// Returns a snapshot of the generator's counters.
    ///
    /// # Errors
    ///
    /// Only fails with [`Error::LockPoisoned`].
    fn stats(&self) -> Result<Stats>;

    /// Generates the next ID, calling `f` and retrying whenever the current
    /// millisecond is exhausted.
    ///
    /// Only [`Error::SequenceOverflow`] is retried; every other error is
    /// returned as is. Each failed attempt still counts as an error in
    /// [`FlakeGenerator::stats`].
    ///
    /// # Errors
    ///
    /// Same as [`FlakeGenerator::generate`], minus
    /// [`Error::SequenceOverflow`].
    fn generate_or_yield(&self, mut f: impl FnMut()) -> Result<FlakeId> {
        loop {
            match self.generate() {
                Err(Error::SequenceOverflow { .. }) => f(),
                outcome => return outcome,
            }
        }
    }
}
