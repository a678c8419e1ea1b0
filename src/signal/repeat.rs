//! # Key Repeat State Machine
//!
//! Per-binding press/repeat timing, modeled on keyboard auto-repeat.
//!
//! ```text
//!            active / fire
//!   Idle ───────────────────▶ Pressed ──┐ active, delay and interval met / fire
//!    ▲                          │  ▲    │
//!    └──────── inactive ────────┘  └────┘
//! ```
//!
//! - Pressing fires immediately.
//! - While held, a binding with a repeat interval fires again once the
//!   initial delay has passed since the press *and* the interval has passed
//!   since the last fire. An interval of zero fires on every tick after the
//!   delay.
//! - A binding without a repeat interval fires once per press.
//! - Releasing resets all timing to zero, so the next press behaves like the
//!   first one.
//!
//! Timestamps are [`Duration`]s measured from an arbitrary fixed epoch (the
//! pipeline start).
//!
//! ## Usage
//!
//! ```
//! use padmouse::signal::repeat::RepeatTimer;
//! use std::time::Duration;
//!
//! let ms = Duration::from_millis;
//! let mut timer = RepeatTimer::new(Some(ms(50)), ms(300));
//!
//! assert!(timer.evaluate(true, ms(0)));    // press
//! assert!(!timer.evaluate(true, ms(299))); // still in initial delay
//! assert!(timer.evaluate(true, ms(300)));  // first repeat
//! assert!(!timer.evaluate(true, ms(340)));
//! assert!(timer.evaluate(true, ms(350)));
//! ```

use std::time::Duration;

/// Timing state for one binding.
///
/// `pressed == false` always comes with both timestamps at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyRepeatState {
    pub pressed: bool,
    pub press_time: Duration,
    pub last_action_time: Duration,
}

/// Debounced press/repeat state machine for one binding.
#[derive(Debug, Clone)]
pub struct RepeatTimer {
    repeat_interval: Option<Duration>,
    initial_delay: Duration,
    state: KeyRepeatState,
}

impl RepeatTimer {
    /// # Arguments
    ///
    /// * `repeat_interval` - `None` for no repeat
    /// * `initial_delay` - Hold time before the first repeat
    #[must_use]
    pub fn new(repeat_interval: Option<Duration>, initial_delay: Duration) -> Self {
        Self {
            repeat_interval,
            initial_delay,
            state: KeyRepeatState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &KeyRepeatState {
        &self.state
    }

    #[must_use]
    pub fn repeat_interval(&self) -> Option<Duration> {
        self.repeat_interval
    }

    /// Advances the state machine by one tick.
    ///
    /// # Arguments
    ///
    /// * `is_active` - Whether the binding's source is currently held
    /// * `now` - Current timestamp
    ///
    /// # Returns
    ///
    /// `true` when the bound action should fire on this tick.
    pub fn evaluate(&mut self, is_active: bool, now: Duration) -> bool {
        if !is_active {
            if self.state.pressed {
                self.state = KeyRepeatState::default();
            }
            return false;
        }

        if !self.state.pressed {
            self.state = KeyRepeatState {
                pressed: true,
                press_time: now,
                last_action_time: now,
            };
            return true;
        }

        let Some(interval) = self.repeat_interval else {
            return false;
        };

        let since_press = now.saturating_sub(self.state.press_time);
        let since_last_action = now.saturating_sub(self.state.last_action_time);

        let initial_delay_met = self.initial_delay.is_zero() || since_press >= self.initial_delay;
        let interval_met = interval.is_zero() || since_last_action >= interval;

        if initial_delay_met && interval_met {
            self.state.last_action_time = now;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Holds the binding from `start` to `end` (inclusive) in `step` ticks
    /// and returns the timestamps at which it fired.
    fn hold(timer: &mut RepeatTimer, start: u64, end: u64, step: u64) -> Vec<u64> {
        (start..=end)
            .step_by(step as usize)
            .filter(|&t| timer.evaluate(true, ms(t)))
            .collect()
    }

    // ==================== Press Tests ====================

    #[test]
    fn test_press_fires_immediately() {
        let mut timer = RepeatTimer::new(None, ms(300));
        assert!(timer.evaluate(true, ms(1234)));
        assert_eq!(
            *timer.state(),
            KeyRepeatState {
                pressed: true,
                press_time: ms(1234),
                last_action_time: ms(1234),
            }
        );
    }

    #[test]
    fn test_idle_inactive_never_fires() {
        let mut timer = RepeatTimer::new(Some(ms(50)), ms(300));
        for t in 0..100 {
            assert!(!timer.evaluate(false, ms(t)));
        }
        assert_eq!(*timer.state(), KeyRepeatState::default());
    }

    // ==================== No-Repeat Tests ====================

    #[test]
    fn test_no_repeat_fires_once_per_press() {
        let mut timer = RepeatTimer::new(None, ms(300));
        assert_eq!(hold(&mut timer, 0, 5_000, 1), vec![0]);
    }

    #[test]
    fn test_no_repeat_fires_again_after_release() {
        let mut timer = RepeatTimer::new(None, ms(300));
        assert!(timer.evaluate(true, ms(0)));
        assert!(!timer.evaluate(true, ms(10)));
        assert!(!timer.evaluate(false, ms(20)));
        assert!(timer.evaluate(true, ms(30)));
    }

    // ==================== Repeat Tests ====================

    #[test]
    fn test_hold_one_second_fires_sixteen_times() {
        // Press at 0, then repeats at 300, 350, ..., 1000
        let mut timer = RepeatTimer::new(Some(ms(50)), ms(300));
        let fires = hold(&mut timer, 0, 1_000, 10);
        assert_eq!(fires.len(), 16);
        assert_eq!(fires[0], 0);
        assert_eq!(fires[1], 300);
        assert_eq!(fires[2], 350);
        assert_eq!(*fires.last().unwrap(), 1_000);
    }

    #[test]
    fn test_repeat_count_formula() {
        // Repeats during a hold of length T > d: 1 + floor((T - d) / r)
        for (interval, delay, length) in [(50, 300, 1_000), (20, 60, 500), (7, 100, 1_234), (100, 250, 251)] {
            let mut timer = RepeatTimer::new(Some(ms(interval)), ms(delay));
            let fires = hold(&mut timer, 0, length, 1);
            let repeats = fires.len() - 1;
            let expected = 1 + ((length - delay) / interval) as usize;
            assert_eq!(
                repeats, expected,
                "interval {} delay {} length {}", interval, delay, length
            );
        }
    }

    #[test]
    fn test_press_time_unchanged_by_repeats() {
        let mut timer = RepeatTimer::new(Some(ms(50)), ms(300));
        hold(&mut timer, 100, 600, 10);
        assert_eq!(timer.state().press_time, ms(100));
        assert_eq!(timer.state().last_action_time, ms(600));
    }

    #[test]
    fn test_zero_interval_fires_every_tick_after_delay() {
        let mut timer = RepeatTimer::new(Some(Duration::ZERO), ms(300));
        let fires = hold(&mut timer, 0, 400, 20);
        let expected: Vec<u64> = std::iter::once(0).chain((300..=400).step_by(20)).collect();
        assert_eq!(fires, expected);
    }

    #[test]
    fn test_zero_interval_same_timestamp_fires() {
        // Zero interval is met unconditionally, even without time passing
        let mut timer = RepeatTimer::new(Some(Duration::ZERO), Duration::ZERO);
        assert!(timer.evaluate(true, ms(5)));
        assert!(timer.evaluate(true, ms(5)));
        assert!(timer.evaluate(true, ms(5)));
    }

    #[test]
    fn test_zero_delay_repeats_at_interval() {
        let mut timer = RepeatTimer::new(Some(ms(100)), Duration::ZERO);
        assert_eq!(hold(&mut timer, 0, 350, 50), vec![0, 100, 200, 300]);
    }

    #[test]
    fn test_slow_ticks_fire_at_most_once_per_tick() {
        // A late tick does not catch up on missed repeats
        let mut timer = RepeatTimer::new(Some(ms(50)), ms(300));
        assert!(timer.evaluate(true, ms(0)));
        assert!(timer.evaluate(true, ms(900)));
        assert!(!timer.evaluate(true, ms(920)));
        assert!(timer.evaluate(true, ms(950)));
    }

    // ==================== Release Tests ====================

    #[test]
    fn test_release_resets_to_zero_state() {
        let mut timer = RepeatTimer::new(Some(ms(50)), ms(300));
        hold(&mut timer, 200, 800, 10);
        assert!(!timer.evaluate(false, ms(810)));
        assert_eq!(*timer.state(), KeyRepeatState::default());
    }

    #[test]
    fn test_repress_behaves_like_first_press() {
        let mut fresh = RepeatTimer::new(Some(ms(50)), ms(300));
        let first = hold(&mut fresh, 0, 1_000, 10);

        let mut reused = RepeatTimer::new(Some(ms(50)), ms(300));
        hold(&mut reused, 0, 700, 10);
        reused.evaluate(false, ms(710));
        let second: Vec<u64> = hold(&mut reused, 2_000, 3_000, 10)
            .into_iter()
            .map(|t| t - 2_000)
            .collect();

        assert_eq!(first, second);
    }
}
