//! # Gamepad Module
//!
//! This module handles gamepad detection, connection, and input reading
//! using the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! When no device path is configured, the first `/dev/input/event*` device
//! (in path order) that reports a `BTN_SOUTH` button is used. This matches
//! Xbox, PlayStation and most generic pads handled by the kernel's gamepad
//! drivers.
//!
//! ## Reading
//!
//! The device is read by a background tokio task that feeds every event
//! through an [`EventMapper`] and publishes the resulting [`PadState`] on
//! each `SYN_REPORT`. [`InputSource::poll`] copies the most recent state, so
//! the tick loop never waits on the device.
//!
//! If the device disappears the reader logs a warning and stops; the last
//! published state stays in place.

use evdev::{Device, EventStream, Key};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::mapper::{AxisRange, EventMapper, PadState, AXIS_CODES, AXIS_COUNT, BUTTON_COUNT};
use super::InputSource;
use crate::error::{PadMouseError, Result};

/// Gamepad handle backed by an evdev event device.
pub struct EvdevGamepad {
    device_path: String,
    name: Option<String>,
    state: PadState,
    updates: watch::Receiver<PadState>,
    reader: JoinHandle<()>,
}

impl EvdevGamepad {
    /// Opens a gamepad and starts reading it in the background.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `device_path` - Specific `/dev/input/eventN` to open, or `None` to
    ///   pick the first gamepad
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No gamepad found on the system
    /// - `Controller`: The device could not be opened or read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padmouse::controller::gamepad::EvdevGamepad;
    ///
    /// # async fn run() -> padmouse::error::Result<()> {
    /// let gamepad = EvdevGamepad::open(None)?;
    /// println!("Connected to gamepad at: {}", gamepad.device_path());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(device_path: Option<&str>) -> Result<Self> {
        let (path, device) = match device_path {
            Some(path) => {
                let device = Device::open(path).map_err(|e| {
                    PadMouseError::Controller(format!("Failed to open {}: {}", path, e))
                })?;
                (PathBuf::from(path), device)
            }
            None => find_gamepad()?,
        };

        let device_path = path.to_string_lossy().to_string();
        let name = device.name().map(str::to_string);
        let mapper = seeded_mapper(&device);
        let initial = *mapper.state();

        info!(
            "Opened gamepad {} at: {}",
            name.as_deref().unwrap_or("(unnamed)"),
            device_path
        );

        let stream = device.into_event_stream().map_err(|e| {
            PadMouseError::Controller(format!("Failed to read {}: {}", device_path, e))
        })?;

        let (tx, updates) = watch::channel(initial);
        let reader = tokio::spawn(read_events(stream, mapper, tx, device_path.clone()));

        Ok(Self {
            device_path,
            name,
            state: initial,
            updates,
            reader,
        })
    }

    /// The `/dev/input/eventX` path that was used to open this gamepad.
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Human-readable device name, e.g. "Xbox Wireless Controller".
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the background reader is still running.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.reader.is_finished()
    }
}

impl Drop for EvdevGamepad {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl InputSource for EvdevGamepad {
    fn poll(&mut self) {
        self.state = *self.updates.borrow_and_update();
    }

    fn hat(&self, index: usize) -> (i32, i32) {
        if index == 0 {
            self.state.hat
        } else {
            (0, 0)
        }
    }

    fn button(&self, index: usize) -> bool {
        self.state.buttons.get(index).copied().unwrap_or(false)
    }

    fn num_buttons(&self) -> usize {
        BUTTON_COUNT
    }

    fn axis(&self, index: usize) -> f64 {
        self.state.axes.get(index).copied().unwrap_or(0.0)
    }
}

/// Whether the device looks like a gamepad.
fn is_gamepad(device: &Device) -> bool {
    device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH))
}

/// Scans `/dev/input` for the first gamepad.
fn find_gamepad() -> Result<(PathBuf, Device)> {
    let input_dir = Path::new("/dev/input");

    if !input_dir.exists() {
        return Err(PadMouseError::Controller(
            "/dev/input directory not found".to_string(),
        ));
    }

    let mut entries: Vec<_> = std::fs::read_dir(input_dir)
        .map_err(|e| PadMouseError::Controller(format!("Failed to read /dev/input: {}", e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PadMouseError::Controller(format!("Failed to read directory entry: {}", e)))?;

    // Deterministic choice when several pads are connected
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        let is_event_node = path
            .file_name()
            .map_or(false, |name| name.to_string_lossy().starts_with("event"));
        if !is_event_node {
            continue;
        }

        match Device::open(&path) {
            Ok(device) => {
                debug!(
                    "Found input device: {} ({})",
                    path.display(),
                    device.name().unwrap_or("unnamed")
                );
                if is_gamepad(&device) {
                    return Ok((path, device));
                }
            }
            Err(e) => {
                // Permission denied or other errors - skip device
                debug!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    Err(PadMouseError::ControllerNotFound)
}

/// Builds a mapper from the device's reported axis ranges and current values.
fn seeded_mapper(device: &Device) -> EventMapper {
    let supported = device.supported_absolute_axes();
    let abs_state = match device.get_abs_state() {
        Ok(state) => state,
        Err(e) => {
            warn!("Could not read axis ranges, assuming XInput ranges: {}", e);
            return EventMapper::new();
        }
    };

    let mut ranges = *EventMapper::new().ranges();
    let mut present = [false; AXIS_COUNT];
    for (index, axis) in AXIS_CODES.iter().enumerate() {
        if !supported.map_or(false, |axes| axes.contains(*axis)) {
            continue;
        }
        if let Some(info) = abs_state.get(axis.0 as usize) {
            ranges[index] = AxisRange {
                min: info.minimum,
                max: info.maximum,
            };
            present[index] = true;
            debug!("Axis {} range: {}..={}", index, info.minimum, info.maximum);
        }
    }

    let mut mapper = EventMapper::with_ranges(ranges);
    for (index, axis) in AXIS_CODES.iter().enumerate() {
        if present[index] {
            mapper.set_raw_axis(index, abs_state[axis.0 as usize].value);
        }
    }
    mapper
}

/// Reader task: maps events and publishes state at the end of each frame.
async fn read_events(
    mut stream: EventStream,
    mut mapper: EventMapper,
    tx: watch::Sender<PadState>,
    device_path: String,
) {
    loop {
        match stream.next_event().await {
            Ok(event) => {
                if mapper.process_event(&event) {
                    tx.send_replace(*mapper.state());
                }
            }
            Err(e) => {
                warn!("Gamepad at {} stopped reporting: {}", device_path, e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration test - only runs with real hardware
    #[tokio::test]
    #[ignore]
    async fn test_open_with_real_hardware() {
        // This test requires a connected gamepad
        let result = EvdevGamepad::open(None);
        assert!(result.is_ok(), "Should detect connected gamepad");

        let gamepad = result.unwrap();
        assert!(gamepad.device_path().starts_with("/dev/input/event"));
        assert!(gamepad.is_connected());
    }

    #[tokio::test]
    async fn test_open_missing_path_fails() {
        let result = EvdevGamepad::open(Some("/dev/input/does-not-exist"));
        match result {
            Err(PadMouseError::Controller(msg)) => assert!(msg.contains("does-not-exist")),
            Err(other) => panic!("Expected Controller error, got: {:?}", other),
            Ok(_) => panic!("Expected Controller error, got a gamepad"),
        }
    }

    // Integration test - only runs with real hardware
    #[tokio::test]
    #[ignore]
    async fn test_poll_with_real_hardware() {
        let mut gamepad = EvdevGamepad::open(None).expect("Gamepad not found");

        println!("Press a button within 5 seconds...");

        for _ in 0..100 {
            gamepad.poll();
            if (0..gamepad.num_buttons()).any(|i| gamepad.button(i)) {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        panic!("No button press received from gamepad");
    }
}
