//! # Controller Input Mapper Module
//!
//! This module handles parsing raw evdev events from a gamepad and converting
//! them into a [`PadState`] laid out in SDL order, so bindings and
//! axis indices read the same on every controller.
//!
//! ## Event Types
//!
//! - **EV_ABS (Absolute Axis)**: sticks, triggers and the d-pad hat
//! - **EV_KEY (Key/Button)**: digital buttons
//! - **EV_SYN**: end of a frame; the gamepad publishes state on `SYN_REPORT`
//!
//! ## Axis Indices
//!
//! | Index | evdev Code | Description |
//! |-------|------------|-------------|
//! | 0 | ABS_X | Left stick X (cursor X) |
//! | 1 | ABS_Y | Left stick Y (cursor Y) |
//! | 2 | ABS_RX | Right stick X |
//! | 3 | ABS_RY | Right stick Y (scroll) |
//! | 4 | ABS_Z | Left trigger (left click) |
//! | 5 | ABS_RZ | Right trigger (right click) |
//!
//! All axes are normalized to `-1.0..=1.0` using the range the device
//! reports; triggers rest at `-1.0`.
//!
//! ## Button Indices
//!
//! | Index | evdev Code | Xbox | PlayStation |
//! |-------|------------|------|-------------|
//! | 0 | BTN_SOUTH | A | Cross |
//! | 1 | BTN_EAST | B | Circle |
//! | 2 | BTN_NORTH | X | Square |
//! | 3 | BTN_WEST | Y | Triangle |
//! | 4 | BTN_TL | LB | L1 |
//! | 5 | BTN_TR | RB | R1 |
//! | 6 | BTN_SELECT | Back | Create |
//! | 7 | BTN_START | Start | Options |
//! | 8 | BTN_MODE | Guide | PS |
//! | 9 | BTN_THUMBL | LS | L3 |
//! | 10 | BTN_THUMBR | RS | R3 |
//!
//! The Linux xpad driver reports X as `BTN_NORTH` and Y as `BTN_WEST`.
//!
//! ## Hat
//!
//! `ABS_HAT0X`/`ABS_HAT0Y` form hat 0. evdev reports up as `-1`; the mapper
//! flips Y so up is `+1`.

use evdev::{AbsoluteAxisType, InputEvent, InputEventKind, Key, Synchronization};

use super::calibration::{normalize_abs, normalize_hat};

/// Number of axes exposed by [`PadState`].
pub const AXIS_COUNT: usize = 6;

/// Number of buttons exposed by [`PadState`].
pub const BUTTON_COUNT: usize = 11;

/// evdev axis for each axis index.
pub const AXIS_CODES: [AbsoluteAxisType; AXIS_COUNT] = [
    AbsoluteAxisType::ABS_X,
    AbsoluteAxisType::ABS_Y,
    AbsoluteAxisType::ABS_RX,
    AbsoluteAxisType::ABS_RY,
    AbsoluteAxisType::ABS_Z,
    AbsoluteAxisType::ABS_RZ,
];

/// evdev button for each button index.
pub const BUTTON_CODES: [Key; BUTTON_COUNT] = [
    Key::BTN_SOUTH,
    Key::BTN_EAST,
    Key::BTN_NORTH,
    Key::BTN_WEST,
    Key::BTN_TL,
    Key::BTN_TR,
    Key::BTN_SELECT,
    Key::BTN_START,
    Key::BTN_MODE,
    Key::BTN_THUMBL,
    Key::BTN_THUMBR,
];

/// Indices of the trigger axes, which rest at `-1.0`.
const TRIGGER_AXES: [usize; 2] = [4, 5];

/// Raw range reported by the device for one absolute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    /// Typical XInput stick range.
    pub const STICK: AxisRange = AxisRange {
        min: -32768,
        max: 32767,
    };

    /// Typical XInput trigger range.
    pub const TRIGGER: AxisRange = AxisRange { min: 0, max: 255 };
}

/// Complete gamepad state in index order.
///
/// # Examples
///
/// ```
/// use padmouse::controller::mapper::PadState;
///
/// let state = PadState::default();
/// assert_eq!(state.axes[0], 0.0);  // Sticks centered
/// assert_eq!(state.axes[4], -1.0); // Triggers released
/// assert!(!state.buttons[0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadState {
    /// Hat 0 as `(dx, dy)`, up is `+1`.
    pub hat: (i32, i32),
    pub buttons: [bool; BUTTON_COUNT],
    /// Normalized axes, `-1.0..=1.0`.
    pub axes: [f64; AXIS_COUNT],
}

impl Default for PadState {
    /// Sticks centered, triggers and buttons released.
    fn default() -> Self {
        let mut axes = [0.0; AXIS_COUNT];
        for index in TRIGGER_AXES {
            axes[index] = -1.0;
        }
        Self {
            hat: (0, 0),
            buttons: [false; BUTTON_COUNT],
            axes,
        }
    }
}

/// Parses raw evdev events and maintains gamepad state.
///
/// # Thread Safety
///
/// `EventMapper` is not thread-safe. Use from a single task/thread only.
///
/// # Examples
///
/// ```
/// use padmouse::controller::mapper::EventMapper;
/// use evdev::{AbsoluteAxisType, EventType, InputEvent};
///
/// let mut mapper = EventMapper::new();
/// mapper.process_event(&InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, 32767));
/// assert_eq!(mapper.state().axes[0], 1.0);
/// ```
#[derive(Debug)]
pub struct EventMapper {
    state: PadState,
    ranges: [AxisRange; AXIS_COUNT],
}

impl Default for EventMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMapper {
    /// Creates a mapper assuming XInput ranges.
    #[must_use]
    pub fn new() -> Self {
        let mut ranges = [AxisRange::STICK; AXIS_COUNT];
        for index in TRIGGER_AXES {
            ranges[index] = AxisRange::TRIGGER;
        }
        Self::with_ranges(ranges)
    }

    /// Creates a mapper using the ranges the device reported.
    #[must_use]
    pub fn with_ranges(ranges: [AxisRange; AXIS_COUNT]) -> Self {
        Self {
            state: PadState::default(),
            ranges,
        }
    }

    #[must_use]
    pub fn state(&self) -> &PadState {
        &self.state
    }

    #[must_use]
    pub fn ranges(&self) -> &[AxisRange; AXIS_COUNT] {
        &self.ranges
    }

    /// Sets an axis from a raw device value (used to seed initial state).
    pub fn set_raw_axis(&mut self, index: usize, raw: i32) {
        if let (Some(range), Some(slot)) = (self.ranges.get(index), self.state.axes.get_mut(index)) {
            *slot = normalize_abs(raw, range.min, range.max);
        }
    }

    /// Processes a single evdev input event and updates internal state.
    ///
    /// Returns `true` when the event ends a frame (`SYN_REPORT`) and the
    /// state is ready to publish.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
                false
            }
            InputEventKind::Key(key) => {
                self.process_key_event(key, event.value() != 0);
                false
            }
            InputEventKind::Synchronization(sync) => sync == Synchronization::SYN_REPORT,
            _ => false,
        }
    }

    /// Processes an absolute axis event.
    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        match axis {
            AbsoluteAxisType::ABS_HAT0X => self.state.hat.0 = normalize_hat(value),
            AbsoluteAxisType::ABS_HAT0Y => self.state.hat.1 = -normalize_hat(value),
            _ => {
                if let Some(index) = AXIS_CODES.iter().position(|&code| code == axis) {
                    self.set_raw_axis(index, value);
                }
                // Other axes (gyro, accelerometer, touchpad) are ignored
            }
        }
    }

    /// Processes a key/button event.
    fn process_key_event(&mut self, key: Key, pressed: bool) {
        if let Some(index) = BUTTON_CODES.iter().position(|&code| code == key) {
            self.state.buttons[index] = pressed;
        }
    }

    /// Resets all state to default (centered sticks, released buttons).
    pub fn reset(&mut self) {
        self.state = PadState::default();
    }
}
