use clap::ValueEnum;
use flake::{MonotonicClock, SystemClock, TimeSource};

/// Which time source backs the generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ClockKind {
    /// Host wall clock. Clock regressions surface as errors.
    #[default]
    System,
    /// Wall clock sampled once at startup, then advanced by a monotonic
    /// timer. Never regresses, but drifts from the host clock over time.
    Monotonic,
}

/// The time source selected at startup.
#[derive(Clone, Debug)]
pub enum Clock {
    System(SystemClock),
    Monotonic(MonotonicClock),
}

impl From<ClockKind> for Clock {
    fn from(kind: ClockKind) -> Self {
        match kind {
            ClockKind::System => Self::System(SystemClock),
            ClockKind::Monotonic => Self::Monotonic(MonotonicClock::new()),
        }
    }
}

impl TimeSource for Clock {
    fn current_millis(&self) -> u64 {
        match self {
            Self::System(clock) => clock.current_millis(),
            Self::Monotonic(clock) => clock.current_millis(),
        }
    }
}
