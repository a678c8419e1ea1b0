//! # uinput Output
//!
//! Injects keyboard and mouse events through a virtual input device created
//! via `/dev/uinput`. Requires write access to `/dev/uinput` (typically the
//! `input` group or a udev rule).
//!
//! ## Device Capabilities
//!
//! - Keys: every [`Key`] plus `BTN_LEFT`, `BTN_RIGHT`, `BTN_MIDDLE`
//! - Relative axes: `REL_X`, `REL_Y`, `REL_WHEEL`, `REL_WHEEL_HI_RES`
//!
//! ## Scrolling
//!
//! Scroll amounts are in high-resolution wheel units. Each call emits the
//! amount on `REL_WHEEL_HI_RES` and, for consumers that only understand
//! notches, one `REL_WHEEL` step per 120 accumulated units.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key as KeyCode, RelativeAxisType};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};

use super::hold::{spawn_hold, KeyEmitter};
use super::OutputSink;
use crate::bindings::{Key, MouseButton};
use crate::error::{PadMouseError, Result};

/// Name the virtual device registers under.
pub const DEVICE_NAME: &str = "padmouse virtual input";

/// High-resolution wheel units per notch.
pub const WHEEL_UNITS_PER_NOTCH: i32 = 120;

const ALL_KEYS: [Key; 32] = [
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::Enter,
    Key::Backspace,
    Key::Space,
    Key::Tab,
    Key::Escape,
    Key::Grave,
    Key::Delete,
    Key::Insert,
    Key::Home,
    Key::End,
    Key::PageUp,
    Key::PageDown,
    Key::LeftShift,
    Key::LeftCtrl,
    Key::LeftAlt,
    Key::LeftMeta,
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
];

/// Linux key code for a keyboard key.
#[must_use]
pub fn key_code(key: Key) -> KeyCode {
    match key {
        Key::Up => KeyCode::KEY_UP,
        Key::Down => KeyCode::KEY_DOWN,
        Key::Left => KeyCode::KEY_LEFT,
        Key::Right => KeyCode::KEY_RIGHT,
        Key::Enter => KeyCode::KEY_ENTER,
        Key::Backspace => KeyCode::KEY_BACKSPACE,
        Key::Space => KeyCode::KEY_SPACE,
        Key::Tab => KeyCode::KEY_TAB,
        Key::Escape => KeyCode::KEY_ESC,
        Key::Grave => KeyCode::KEY_GRAVE,
        Key::Delete => KeyCode::KEY_DELETE,
        Key::Insert => KeyCode::KEY_INSERT,
        Key::Home => KeyCode::KEY_HOME,
        Key::End => KeyCode::KEY_END,
        Key::PageUp => KeyCode::KEY_PAGEUP,
        Key::PageDown => KeyCode::KEY_PAGEDOWN,
        Key::LeftShift => KeyCode::KEY_LEFTSHIFT,
        Key::LeftCtrl => KeyCode::KEY_LEFTCTRL,
        Key::LeftAlt => KeyCode::KEY_LEFTALT,
        Key::LeftMeta => KeyCode::KEY_LEFTMETA,
        Key::F1 => KeyCode::KEY_F1,
        Key::F2 => KeyCode::KEY_F2,
        Key::F3 => KeyCode::KEY_F3,
        Key::F4 => KeyCode::KEY_F4,
        Key::F5 => KeyCode::KEY_F5,
        Key::F6 => KeyCode::KEY_F6,
        Key::F7 => KeyCode::KEY_F7,
        Key::F8 => KeyCode::KEY_F8,
        Key::F9 => KeyCode::KEY_F9,
        Key::F10 => KeyCode::KEY_F10,
        Key::F11 => KeyCode::KEY_F11,
        Key::F12 => KeyCode::KEY_F12,
    }
}

/// Linux button code for a mouse button.
#[must_use]
pub fn button_code(button: MouseButton) -> KeyCode {
    match button {
        MouseButton::Left => KeyCode::BTN_LEFT,
        MouseButton::Right => KeyCode::BTN_RIGHT,
        MouseButton::Middle => KeyCode::BTN_MIDDLE,
    }
}

/// Converts a stream of high-resolution scroll amounts into whole notches.
///
/// # Examples
///
/// ```
/// use padmouse::output::uinput::WheelAccumulator;
///
/// let mut wheel = WheelAccumulator::default();
/// assert_eq!(wheel.add(100), 0);
/// assert_eq!(wheel.add(30), 1);  // 130 accumulated, 10 carried
/// assert_eq!(wheel.add(-20), 0); // -10 carried
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WheelAccumulator {
    remainder: i32,
}

impl WheelAccumulator {
    /// Adds `amount` units and returns the whole notches now complete.
    pub fn add(&mut self, amount: i32) -> i32 {
        self.remainder = self.remainder.saturating_add(amount);
        let notches = self.remainder / WHEEL_UNITS_PER_NOTCH;
        self.remainder -= notches * WHEEL_UNITS_PER_NOTCH;
        notches
    }

    #[must_use]
    pub fn remainder(&self) -> i32 {
        self.remainder
    }
}

/// The virtual device, shared with background hold tasks.
struct VirtualInput {
    device: Mutex<VirtualDevice>,
}

impl VirtualInput {
    fn emit(&self, events: &[InputEvent]) {
        let mut device = self.device.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = device.emit(events) {
            warn!("Failed to inject input events: {}", e);
        }
    }

    fn emit_key(&self, code: KeyCode, pressed: bool) {
        self.emit(&[InputEvent::new(EventType::KEY, code.code(), i32::from(pressed))]);
    }
}

impl KeyEmitter for VirtualInput {
    fn key_down(&self, key: Key) {
        self.emit_key(key_code(key), true);
    }

    fn key_up(&self, key: Key) {
        self.emit_key(key_code(key), false);
    }
}

/// Virtual keyboard + mouse backed by uinput.
pub struct UinputSink {
    input: Arc<VirtualInput>,
    runtime: Handle,
    wheel: WheelAccumulator,
}

impl UinputSink {
    /// Creates the virtual device.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Runtime that runs background key holds
    ///
    /// # Errors
    ///
    /// Returns `Output` if `/dev/uinput` cannot be opened or the device
    /// cannot be registered (usually a permissions problem).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padmouse::output::uinput::UinputSink;
    /// use padmouse::output::OutputSink;
    ///
    /// # async fn run() -> padmouse::error::Result<()> {
    /// let mut sink = UinputSink::create(tokio::runtime::Handle::current())?;
    /// sink.move_relative(10, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create(runtime: Handle) -> Result<Self> {
        let device = build_device()
            .map_err(|e| PadMouseError::Output(format!("Failed to create uinput device: {}", e)))?;
        info!("Created virtual input device: {}", DEVICE_NAME);

        Ok(Self {
            input: Arc::new(VirtualInput {
                device: Mutex::new(device),
            }),
            runtime,
            wheel: WheelAccumulator::default(),
        })
    }
}

fn build_device() -> std::io::Result<VirtualDevice> {
    let mut keys = AttributeSet::<KeyCode>::new();
    for key in ALL_KEYS {
        keys.insert(key_code(key));
    }
    for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
        keys.insert(button_code(button));
    }

    let mut axes = AttributeSet::<RelativeAxisType>::new();
    axes.insert(RelativeAxisType::REL_X);
    axes.insert(RelativeAxisType::REL_Y);
    axes.insert(RelativeAxisType::REL_WHEEL);
    axes.insert(RelativeAxisType::REL_WHEEL_HI_RES);

    VirtualDeviceBuilder::new()?
        .name(DEVICE_NAME)
        .with_keys(&keys)?
        .with_relative_axes(&axes)?
        .build()
}

impl OutputSink for UinputSink {
    fn press(&mut self, key: Key) {
        let code = key_code(key);
        self.input.emit_key(code, true);
        self.input.emit_key(code, false);
    }

    fn mouse_down(&mut self, button: MouseButton) {
        self.input.emit_key(button_code(button), true);
    }

    fn mouse_up(&mut self, button: MouseButton) {
        self.input.emit_key(button_code(button), false);
    }

    fn move_relative(&mut self, dx: i32, dy: i32) {
        let mut events = Vec::with_capacity(2);
        if dx != 0 {
            events.push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx));
        }
        if dy != 0 {
            events.push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, dy));
        }
        if !events.is_empty() {
            self.input.emit(&events);
        }
    }

    fn scroll(&mut self, amount: i32) {
        if amount == 0 {
            return;
        }
        let mut events = vec![InputEvent::new(
            EventType::RELATIVE,
            RelativeAxisType::REL_WHEEL_HI_RES.0,
            amount,
        )];
        let notches = self.wheel.add(amount);
        if notches != 0 {
            events.push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, notches));
        }
        self.input.emit(&events);
    }

    fn hold_key_for(&mut self, key: Key, duration: Duration) {
        // Fire-and-forget; the guard inside the task releases the key
        let _ = spawn_hold(&self.runtime, Arc::clone(&self.input), key, duration);
    }
}
