use std::{future::Future, io::Write};

use flake::{FlakeGenerator, Stats, TimeSource};
use tokio::time::{MissedTickBehavior, interval};

use crate::config::LoopConfig;

/// Calls `generate` once per configured interval and writes each ID (or
/// error message) as one line to `out`.
///
/// Generation errors are reported and the loop carries on. The loop stops
/// after `config.count` attempts, or when `shutdown` resolves.
///
/// # Errors
///
/// Fails if writing to `out` fails or reading the final stats fails.
pub async fn run_loop<G, T, W>(
    generator: &G,
    config: &LoopConfig,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<Stats>
where
    G: FlakeGenerator<T>,
    T: TimeSource,
    W: Write,
{
    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut attempts = 0u64;
    while config.count.is_none_or(|count| attempts < count) {
        tokio::select! {
            biased;
            () = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        match generator.generate() {
            Ok(id) => writeln!(out, "{id}")?,
            Err(err) => {
                tracing::warn!(error = ?err, "ID generation failed");
                writeln!(out, "{err}")?;
            }
        }
        out.flush()?;
        attempts += 1;
    }

    Ok(generator.stats()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockKind;
    use flake::{BasicFlakeGenerator, FLAKE_EPOCH, FlakeId};
    use std::cell::Cell;
    use std::time::Duration;

    const T0: u64 = FLAKE_EPOCH.as_millis() as u64 + 10;

    /// Steps through a fixed list of readings, repeating the last one.
    struct ScriptedTime {
        readings: Vec<u64>,
        index: Cell<usize>,
    }

    impl TimeSource for ScriptedTime {
        fn current_millis(&self) -> u64 {
            let i = self.index.get();
            self.index.set((i + 1).min(self.readings.len() - 1));
            self.readings[i]
        }
    }

    fn config(count: Option<u64>) -> LoopConfig {
        LoopConfig {
            worker_id: 2,
            interval: Duration::from_millis(1),
            count,
            clock: ClockKind::System,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn prints_ids_and_errors_then_stops() {
        // Construction, then one reading per attempt.
        let time = ScriptedTime {
            readings: vec![T0, T0 + 1, T0, T0 + 2],
            index: Cell::new(0),
        };
        let generator = BasicFlakeGenerator::new(2, time).unwrap();
        let mut out = Vec::new();

        let stats = run_loop(&generator, &config(Some(3)), &mut out, std::future::pending())
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);

        let first = FlakeId::from_raw(lines[0].parse().unwrap());
        assert_eq!(first.worker_id(), 2);
        assert_eq!(first.timestamp(), 11);
        assert_eq!(lines[1], "The clock went backwards!");
        let third = FlakeId::from_raw(lines[2].parse().unwrap());
        assert!(third > first);

        assert_eq!(stats.generated_ids, 2);
        assert_eq!(stats.errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown() {
        let time = ScriptedTime {
            readings: vec![T0],
            index: Cell::new(0),
        };
        let generator = BasicFlakeGenerator::new(0, time).unwrap();
        let mut out = Vec::new();

        let stats = run_loop(&generator, &config(None), &mut out, async {})
            .await
            .unwrap();

        assert!(out.is_empty());
        assert_eq!(stats.generated_ids, 0);
    }
}
