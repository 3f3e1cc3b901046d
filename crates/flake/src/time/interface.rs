use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Sunday, October 20, 2013 00:00:00 UTC
///
/// All timestamps embedded in IDs are offsets from this instant. It must not
/// change for a fleet of generators once IDs have been issued.
pub const FLAKE_EPOCH: Duration = Duration::from_millis(1_382_227_200_000);

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// This abstraction allows you to plug in the system clock, a monotonic
/// ticker, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use flake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
