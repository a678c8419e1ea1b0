//! # Controller Module
//!
//! Gamepad input handling.
//!
//! This module handles:
//! - The [`InputSource`] abstraction the tick pipeline reads from
//! - Per-tick [`ControllerSnapshot`]s of hat, buttons and axes
//! - Gamepad discovery and event reading via evdev ([`gamepad`])
//! - Translating evdev events into SDL-style indices ([`mapper`])
//! - Deadzones and axis normalization ([`calibration`])

pub mod calibration;
pub mod gamepad;
pub mod mapper;

/// Read side of a game controller.
///
/// Values are refreshed by [`poll`](InputSource::poll) and stay stable until
/// the next poll. Out-of-range indices read as released/centered.
#[cfg_attr(test, mockall::automock)]
pub trait InputSource {
    /// Refreshes the device state.
    fn poll(&mut self);

    /// Hat direction as `(dx, dy)`, each `-1`, `0` or `1`; up is `+1`.
    fn hat(&self, index: usize) -> (i32, i32);

    fn button(&self, index: usize) -> bool;

    fn num_buttons(&self) -> usize;

    /// Axis value in `-1.0..=1.0`.
    fn axis(&self, index: usize) -> f64;
}

/// Controller state captured once per tick.
///
/// # Examples
///
/// ```
/// use padmouse::controller::ControllerSnapshot;
///
/// let snapshot = ControllerSnapshot {
///     hat: (0, 0),
///     buttons: vec![false, true],
///     axes: vec![0.25],
/// };
/// assert!(snapshot.button(1));
/// assert!(!snapshot.button(7));
/// assert_eq!(snapshot.axis(0), 0.25);
/// assert_eq!(snapshot.axis(3), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSnapshot {
    pub hat: (i32, i32),
    pub buttons: Vec<bool>,
    pub axes: Vec<f64>,
}

impl ControllerSnapshot {
    /// Reads hat 0, every button and the first `axis_count` axes.
    #[must_use]
    pub fn capture<I: InputSource + ?Sized>(source: &I, axis_count: usize) -> Self {
        Self {
            hat: source.hat(0),
            buttons: (0..source.num_buttons()).map(|i| source.button(i)).collect(),
            axes: (0..axis_count).map(|i| source.axis(i)).collect(),
        }
    }

    /// Button state; `false` for indices the device does not have.
    #[must_use]
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Axis value; `0.0` for axes that were not captured.
    #[must_use]
    pub fn axis(&self, index: usize) -> f64 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn num_buttons(&self) -> usize {
        self.buttons.len()
    }
}
