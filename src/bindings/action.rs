//! # Output Actions
//!
//! What a binding does when it fires.

use serde::Deserialize;
use std::time::Duration;

use super::de_seconds;
use crate::output::OutputSink;

/// Keyboard keys that bindings can emit.
///
/// Names in config files are snake_case (`"page_up"`, `"left_ctrl"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    #[serde(alias = "return")]
    Enter,
    Backspace,
    Space,
    Tab,
    #[serde(alias = "esc")]
    Escape,
    /// The key left of `1` (`` ` `` on ANSI, `§` on many ISO layouts).
    #[serde(alias = "§")]
    Grave,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    LeftShift,
    LeftCtrl,
    LeftAlt,
    LeftMeta,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Action bound to a key binding.
///
/// In TOML: `{ press = "enter" }`, `{ click = "middle" }` or
/// `{ hold = { key = "grave", duration = 0.5 } }`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Tap a key (down then up).
    Press(Key),
    /// Click a mouse button (down then up).
    Click(MouseButton),
    /// Hold a key for `duration` in the background.
    Hold {
        key: Key,
        #[serde(deserialize_with = "de_seconds")]
        duration: Duration,
    },
}

impl Action {
    /// Sends this action to `sink`.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::bindings::{Action, Key};
    /// use padmouse::output::log_sink::LogSink;
    ///
    /// let mut sink = LogSink::new();
    /// Action::Press(Key::Enter).perform(&mut sink);
    /// assert_eq!(sink.actions_logged(), 1);
    /// ```
    pub fn perform<O: OutputSink + ?Sized>(&self, sink: &mut O) {
        match *self {
            Action::Press(key) => sink.press(key),
            Action::Click(button) => {
                sink.mouse_down(button);
                sink.mouse_up(button);
            }
            Action::Hold { key, duration } => sink.hold_key_for(key, duration),
        }
    }
}
