//! Frame pacing for the tick loop.

use std::time::Duration;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

/// Timing of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Time since the clock started.
    pub now: Duration,
    /// Time since the previous tick; zero on the first tick.
    pub dt: Duration,
}

/// Paces ticks at a target rate and measures the real elapsed time.
///
/// A tick that overruns its budget delays the schedule instead of bursting
/// to catch up, and the next [`Frame::dt`] reports the full elapsed time.
/// `dt` is never capped.
pub struct FrameClock {
    interval: Interval,
    start: Instant,
    last: Instant,
}

impl FrameClock {
    /// Creates a clock ticking at `tick_rate_hz` (minimum 1).
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(tick_rate_hz: u32) -> Self {
        let period = Duration::from_secs(1) / tick_rate_hz.max(1);
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let start = Instant::now();

        Self {
            interval,
            start,
            last: start,
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Waits for the next tick. The first tick completes immediately.
    pub async fn tick(&mut self) -> Frame {
        self.interval.tick().await;
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;

        Frame {
            now: now.saturating_duration_since(self.start),
            dt,
        }
    }
}
