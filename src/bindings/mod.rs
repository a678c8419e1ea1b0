//! # Binding Table
//!
//! Declarative mapping from controller elements to keyboard and mouse
//! actions, with an optional repeat interval per binding.
//!
//! ## Default Table
//!
//! | Name | Source | Repeat | Action |
//! |------|--------|--------|--------|
//! | dpad_up | Hat up | 50ms | Up arrow |
//! | dpad_down | Hat down | 50ms | Down arrow |
//! | dpad_left | Hat left | 50ms | Left arrow |
//! | dpad_right | Hat right | 50ms | Right arrow |
//! | button_a | Button 0 | - | Enter |
//! | button_b | Button 1 | - | Backspace |
//! | button_x | Button 2 | 50ms | Space |
//! | button_y | Button 3 | 50ms | Tab |
//! | left_bumper | Button 4 | - | Middle click |
//! | right_bumper | Button 5 | - | Hold grave for 500ms |

pub mod action;
pub mod source;

pub use action::{Action, Key, MouseButton};
pub use source::{HatDirection, PhysicalSource, StickDirection};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// One row of the binding table. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyBinding {
    pub name: String,
    pub source: PhysicalSource,
    /// `None` fires once per press; `Some(interval)` repeats after the
    /// initial delay.
    #[serde(default, deserialize_with = "de_opt_seconds")]
    pub repeat_interval: Option<Duration>,
    pub action: Action,
}

impl KeyBinding {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source: PhysicalSource,
        repeat_interval: Option<Duration>,
        action: Action,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            repeat_interval,
            action,
        }
    }
}

/// The built-in binding table.
///
/// # Examples
///
/// ```
/// use padmouse::bindings::default_bindings;
///
/// let table = default_bindings();
/// assert_eq!(table.len(), 10);
/// assert_eq!(table[0].name, "dpad_up");
/// ```
#[must_use]
pub fn default_bindings() -> Vec<KeyBinding> {
    let repeat = Some(Duration::from_millis(50));

    vec![
        KeyBinding::new("dpad_up", PhysicalSource::Hat(HatDirection::Up), repeat, Action::Press(Key::Up)),
        KeyBinding::new("dpad_down", PhysicalSource::Hat(HatDirection::Down), repeat, Action::Press(Key::Down)),
        KeyBinding::new("dpad_left", PhysicalSource::Hat(HatDirection::Left), repeat, Action::Press(Key::Left)),
        KeyBinding::new("dpad_right", PhysicalSource::Hat(HatDirection::Right), repeat, Action::Press(Key::Right)),
        KeyBinding::new("button_a", PhysicalSource::Button(0), None, Action::Press(Key::Enter)),
        KeyBinding::new("button_b", PhysicalSource::Button(1), None, Action::Press(Key::Backspace)),
        KeyBinding::new("button_x", PhysicalSource::Button(2), repeat, Action::Press(Key::Space)),
        KeyBinding::new("button_y", PhysicalSource::Button(3), repeat, Action::Press(Key::Tab)),
        KeyBinding::new("left_bumper", PhysicalSource::Button(4), None, Action::Click(MouseButton::Middle)),
        KeyBinding::new(
            "right_bumper",
            PhysicalSource::Button(5),
            None,
            Action::Hold {
                key: Key::Grave,
                duration: Duration::from_millis(500),
            },
        ),
    ]
}

/// Deserializes non-negative seconds (`0.05`, `1`) into a [`Duration`].
pub(crate) fn de_seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    seconds_to_duration(secs).map_err(D::Error::custom)
}

pub(crate) fn de_opt_seconds<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)?
        .map(seconds_to_duration)
        .transpose()
        .map_err(D::Error::custom)
}

/// Converts seconds to a [`Duration`], rounded to the nearest nanosecond.
pub(crate) fn seconds_to_duration(secs: f64) -> std::result::Result<Duration, String> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!(
            "duration must be a finite, non-negative number of seconds, got {}",
            secs
        ));
    }
    let nanos = (secs * 1e9).round();
    if nanos >= u64::MAX as f64 {
        return Err(format!("duration of {} seconds is too large", secs));
    }
    Ok(Duration::from_nanos(nanos as u64))
}
