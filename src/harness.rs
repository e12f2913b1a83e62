use std::time::{Duration, Instant};

use crate::error::BenchError;
use crate::record::UserRecordSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    pub fn batch_size(&self) -> usize {
        match self {
            Profile::Quick => 100,
            Profile::Full => 1_000,
        }
    }

    pub fn iterations(&self) -> usize {
        match self {
            Profile::Quick => 5,
            Profile::Full => 10,
        }
    }
}

/// Inclusive bounds on run parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_batch_size: usize,
    pub max_iterations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_batch_size: 100_000,
            max_iterations: 20,
        }
    }
}

impl Limits {
    /// Reject zero or out-of-bounds parameters before any work starts.
    pub fn check(&self, batch_size: usize, iterations: usize) -> Result<(), BenchError> {
        if batch_size == 0 || batch_size > self.max_batch_size {
            return Err(BenchError::InvalidArgument(format!(
                "batch_size must be in 1..={}, got {batch_size}",
                self.max_batch_size
            )));
        }
        if iterations == 0 || iterations > self.max_iterations {
            return Err(BenchError::InvalidArgument(format!(
                "iterations must be in 1..={}, got {iterations}",
                self.max_iterations
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub seed: u64,
    pub limits: Limits,
}

impl BenchConfig {
    pub fn record_source(&self) -> UserRecordSource {
        UserRecordSource::new(self.seed)
    }
}

/// Clock used to time benchmark phases.
///
/// Object safe so a single timer can be shared by every strategy unit; use
/// `<dyn PhaseTimer>::time` to measure a closure.
pub trait PhaseTimer: Send + Sync {
    /// Opaque start mark.
    fn mark(&self) -> Duration;

    /// Time elapsed since `mark` was taken.
    fn elapsed_since(&self, mark: Duration) -> Duration;
}

impl dyn PhaseTimer + '_ {
    /// Run `op` and return its result with the elapsed seconds.
    ///
    /// Only two clock reads bracket the closure, so the overhead is the same
    /// for every phase.
    pub fn time<T>(&self, op: impl FnOnce() -> T) -> (T, f64) {
        let mark = self.mark();
        let out = op();
        let elapsed = self.elapsed_since(mark);
        (out, elapsed.as_secs_f64())
    }
}

/// Monotonic timer backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct MonotonicTimer {
    origin: Instant,
}

impl MonotonicTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTimer for MonotonicTimer {
    fn mark(&self) -> Duration {
        self.origin.elapsed()
    }

    fn elapsed_since(&self, mark: Duration) -> Duration {
        self.origin.elapsed().saturating_sub(mark)
    }
}

/// Reports the same duration for every operation. Used to make timing ties
/// deterministic.
#[derive(Clone, Copy, Debug)]
pub struct FixedTimer(pub Duration);

impl PhaseTimer for FixedTimer {
    fn mark(&self) -> Duration {
        Duration::ZERO
    }

    fn elapsed_since(&self, _mark: Duration) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_bounds() {
        let limits = Limits::default();
        assert!(limits.check(1, 1).is_ok());
        assert!(limits.check(100_000, 20).is_ok());
        assert!(matches!(
            limits.check(0, 1),
            Err(BenchError::InvalidArgument(_))
        ));
        assert!(limits.check(100_001, 1).is_err());
        assert!(limits.check(10, 0).is_err());
        assert!(limits.check(10, 21).is_err());
    }

    #[test]
    fn test_monotonic_timer_returns_result_and_nonnegative_time() {
        let timer = MonotonicTimer::new();
        let timer: &dyn PhaseTimer = &timer;
        let (sum, secs) = timer.time(|| (0..1_000u64).sum::<u64>());
        assert_eq!(sum, 499_500);
        assert!(secs >= 0.0);
    }

    #[test]
    fn test_monotonic_timer_covers_sleep() {
        let timer = MonotonicTimer::new();
        let timer: &dyn PhaseTimer = &timer;
        let ((), secs) = timer.time(|| std::thread::sleep(Duration::from_millis(5)));
        assert!(secs >= 0.005);
    }

    #[test]
    fn test_fixed_timer() {
        let timer = FixedTimer(Duration::from_millis(250));
        let timer: &dyn PhaseTimer = &timer;
        let (v, secs) = timer.time(|| "x");
        assert_eq!(v, "x");
        assert_eq!(secs, 0.25);
    }

    #[test]
    fn test_profile_defaults() {
        assert_eq!(Profile::Quick.batch_size(), 100);
        assert_eq!(Profile::Quick.iterations(), 5);
        assert_eq!(Profile::Full.as_str(), "full");
    }
}
