#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::{Error, FlakeId, Result, Stats};

/// The mutable part of a generator.
///
/// Every generator wraps one of these behind its own synchronization and
/// feeds it one clock reading per call, so the algorithm lives here once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FlakeState {
    /// Last accepted clock reading, in ms since the Unix epoch.
    pub(crate) last_timestamp: u64,
    /// Last sequence value handed out for `last_timestamp`.
    pub(crate) sequence: u64,
    pub(crate) generated_ids: u64,
    pub(crate) errors: u64,
}

impl FlakeState {
    pub(crate) const fn new(last_timestamp: u64, sequence: u64) -> Self {
        Self {
            last_timestamp,
            sequence,
            generated_ids: 0,
            errors: 0,
        }
    }

    /// Runs one generation step against the clock reading `now` and records
    /// the outcome in the counters.
    pub(crate) fn advance(&mut self, now: u64, epoch: u64, worker_id: u64) -> Result<FlakeId> {
        let outcome = self.step(now, epoch, worker_id);
        match outcome {
            Ok(_) => self.generated_ids += 1,
            Err(_) => self.errors += 1,
        }
        outcome
    }

    fn step(&mut self, now: u64, epoch: u64, worker_id: u64) -> Result<FlakeId> {
        if now < self.last_timestamp {
            return Err(Self::cold_clock_behind(now, self.last_timestamp));
        }

        let elapsed = now
            .checked_sub(epoch)
            .ok_or(Error::ClockBeforeEpoch { now, epoch })?;
        if elapsed > FlakeId::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { elapsed });
        }

        if now > self.last_timestamp {
            self.last_timestamp = now;
            self.sequence = 0;
        } else if self.sequence >= FlakeId::MAX_SEQUENCE {
            return Err(Self::cold_sequence_exhausted(now));
        }

        self.sequence += 1;
        Ok(FlakeId::from_components(elapsed, worker_id, self.sequence))
    }

    pub(crate) const fn snapshot(&self, now: u64, worker_id: u64) -> Stats {
        Stats {
            timestamp: now,
            generated_ids: self.generated_ids,
            errors: self.errors,
            max_time: self.last_timestamp,
            worker_id,
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, last: u64) -> Error {
        #[cfg(feature = "tracing")]
        warn!(now, last, behind_ms = last - now, "clock moved backwards");
        Error::ClockRegression { now, last }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(timestamp: u64) -> Error {
        #[cfg(feature = "tracing")]
        debug!(timestamp, "sequence exhausted for this millisecond");
        Error::SequenceOverflow { timestamp }
    }
}

/// Checks the construction parameters shared by every generator.
pub(crate) fn validate(worker_id: u64, epoch: u64, last_timestamp: u64) -> Result<()> {
    if worker_id > FlakeId::MAX_WORKER_ID {
        return Err(Error::InvalidWorkerId { worker_id });
    }
    if last_timestamp < epoch {
        return Err(Error::ClockBeforeEpoch {
            now: last_timestamp,
            epoch,
        });
    }
    Ok(())
}
