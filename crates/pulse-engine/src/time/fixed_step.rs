use std::time::Duration;

/// Accumulator for fixed-rate simulation steps.
///
/// Invariant after draining: `accumulator < interval`. Each consumed step
/// removes exactly `interval` from the accumulator.
///
/// A zero interval never drains: `consume` keeps returning `true`. The loop
/// does not guard against it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedStep {
    interval: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the interval; the accumulated time is kept.
    #[inline]
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Time carried over that has not been consumed by a step yet.
    #[inline]
    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    #[inline]
    pub fn accumulate(&mut self, dt: Duration) {
        self.accumulator += dt;
    }

    /// Consumes one interval if enough time has accumulated.
    #[inline]
    pub fn consume(&mut self) -> bool {
        if self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            true
        } else {
            false
        }
    }

    /// Runs `step` once per whole interval in the accumulator, passing the
    /// nominal interval each time. Returns the number of steps taken.
    pub fn drain(&mut self, mut step: impl FnMut(Duration)) -> u32 {
        let mut steps = 0;
        while self.consume() {
            step(self.interval);
            steps += 1;
        }
        steps
    }
}
