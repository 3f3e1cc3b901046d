use crate::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// The host wall clock, read on every call.
///
/// Unlike [`MonotonicClock`], this clock follows every adjustment made to the
/// system time, including NTP steps backwards. Generators built on it detect
/// such steps and report [`Error::ClockRegression`].
///
/// [`MonotonicClock`]: crate::MonotonicClock
/// [`Error::ClockRegression`]: crate::Error::ClockRegression
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A host clock set before 1970 reads as zero, which every generator
        // rejects as being before its epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}
