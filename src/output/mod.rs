//! # Output Module
//!
//! Keyboard and mouse injection.
//!
//! - [`OutputSink`]: what the tick pipeline drives
//! - [`uinput::UinputSink`]: virtual keyboard + mouse via `/dev/uinput`
//! - [`log_sink::LogSink`]: logs actions instead of injecting them
//! - [`hold`]: background key holds

pub mod hold;
pub mod log_sink;
pub mod uinput;

use std::time::Duration;

use crate::bindings::{Key, MouseButton};

/// Destination for synthesized keyboard and mouse events.
///
/// Implementations never fail the caller: injection errors are logged and
/// dropped so one bad event cannot stall the tick loop.
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink {
    /// Taps a key (down then up).
    fn press(&mut self, key: Key);

    fn mouse_down(&mut self, button: MouseButton);

    fn mouse_up(&mut self, button: MouseButton);

    /// Moves the pointer by `(dx, dy)` pixels; `+y` is down.
    fn move_relative(&mut self, dx: i32, dy: i32);

    /// Scrolls by `amount` high-resolution wheel units (120 per notch);
    /// positive scrolls up.
    fn scroll(&mut self, amount: i32);

    /// Holds `key` for `duration` without blocking the caller.
    fn hold_key_for(&mut self, key: Key, duration: Duration);
}

impl<T: OutputSink + ?Sized> OutputSink for Box<T> {
    fn press(&mut self, key: Key) {
        (**self).press(key)
    }

    fn mouse_down(&mut self, button: MouseButton) {
        (**self).mouse_down(button)
    }

    fn mouse_up(&mut self, button: MouseButton) {
        (**self).mouse_up(button)
    }

    fn move_relative(&mut self, dx: i32, dy: i32) {
        (**self).move_relative(dx, dy)
    }

    fn scroll(&mut self, amount: i32) {
        (**self).scroll(amount)
    }

    fn hold_key_for(&mut self, key: Key, duration: Duration) {
        (**self).hold_key_for(key, duration)
    }
}
