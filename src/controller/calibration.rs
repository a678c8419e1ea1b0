//! # Calibration Module
//!
//! Normalizes raw device values and applies deadzones.
//!
//! ## Deadzone
//!
//! A deadzone eliminates small stick movements near center to prevent drift.
//! Values whose magnitude is at or below the deadzone become exactly `0.0`.
//! Values outside pass through unchanged; the response curve is applied
//! afterwards by [`MotionCurve`](crate::motion::curve::MotionCurve).
//!
//! ## Triggers
//!
//! Triggers are reported on the same `-1.0..=1.0` scale as sticks, resting at
//! `-1.0`. [`rescale_trigger`] maps them to `0.0..=1.0` before they are fed to
//! a [`TrendDetector`](crate::signal::trend::TrendDetector). No extra
//! deadzone is applied to triggers: resting noise is absorbed by the
//! detector's hysteresis.
//!
//! ## Usage
//!
//! ```
//! use padmouse::controller::calibration::{apply_deadzone, normalize_abs, rescale_trigger};
//!
//! assert_eq!(apply_deadzone(0.02, 0.05), 0.0);
//! assert_eq!(apply_deadzone(-0.5, 0.05), -0.5);
//! assert_eq!(rescale_trigger(-1.0), 0.0);
//! assert_eq!(normalize_abs(255, 0, 255), 1.0);
//! ```

/// Zeroes `value` when `|value| <= deadzone`.
///
/// # Examples
///
/// ```
/// use padmouse::controller::calibration::apply_deadzone;
///
/// assert_eq!(apply_deadzone(0.05, 0.05), 0.0);
/// assert_eq!(apply_deadzone(0.051, 0.05), 0.051);
/// ```
#[inline]
#[must_use]
pub fn apply_deadzone(value: f64, deadzone: f64) -> f64 {
    if value.abs() > deadzone {
        value
    } else {
        0.0
    }
}

/// Maps a trigger axis from `-1.0..=1.0` to `0.0..=1.0`.
#[inline]
#[must_use]
pub fn rescale_trigger(value: f64) -> f64 {
    (value + 1.0) / 2.0
}

/// Converts a raw absolute-axis value to `-1.0..=1.0` given the device's
/// reported range.
///
/// Returns `0.0` for a degenerate range (`max <= min`).
///
/// # Examples
///
/// ```
/// use padmouse::controller::calibration::normalize_abs;
///
/// assert_eq!(normalize_abs(-32768, -32768, 32767), -1.0);
/// assert!(normalize_abs(0, -32768, 32767).abs() < 0.001);
/// assert_eq!(normalize_abs(1023, 0, 1023), 1.0);
/// ```
#[must_use]
pub fn normalize_abs(raw: i32, min: i32, max: i32) -> f64 {
    if max <= min {
        return 0.0;
    }
    let span = f64::from(max) - f64::from(min);
    let offset = f64::from(raw.clamp(min, max)) - f64::from(min);
    (offset / span) * 2.0 - 1.0
}

/// Clamps a raw hat value to `-1`, `0` or `1`.
#[inline]
#[must_use]
pub fn normalize_hat(raw: i32) -> i32 {
    raw.signum()
}
