//! # Motion Curve Module
//!
//! Maps stick deflection to cursor and wheel movement.
//!
//! ## Cursor Curve
//!
//! Each axis is passed through its deadzone and then shaped by a mix of an
//! exponential and a linear term:
//!
//! `speed = sensitivity * (1 - linear_mix) * |v|^exponent + sensitivity * linear_mix * |v|`
//!
//! The sign of `v` is re-applied, the result is scaled by the elapsed time
//! and rounded to whole pixels (half to even), because relative pointer
//! motion only accepts integers.
//!
//! - `linear_mix = 0.0`: pure exponential, very slow near center
//! - `linear_mix = 1.0`: linear response
//! - `exponent > 1`: slow near center, fast at the edge
//!
//! ## Usage
//!
//! ```
//! use padmouse::motion::curve::MotionCurve;
//!
//! let curve = MotionCurve::new(1000.0, 0.05, 2.5, 0.2);
//!
//! // Sub-deadzone noise never moves the cursor
//! assert_eq!(curve.compute(0.04, -0.03, 0.5), (0, 0));
//!
//! // Full deflection for 10ms moves 10 pixels
//! assert_eq!(curve.compute(1.0, 0.0, 0.010), (10, 0));
//! ```

use super::vector::Vector2;
use crate::config::{MotionConfig, ScrollConfig};
use crate::controller::calibration::apply_deadzone;

/// Nonlinear stick-to-cursor response curve.
///
/// The exponential and linear factors are computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCurve {
    deadzone: f64,
    exponent: f64,
    exp_factor: f64,
    lin_factor: f64,
}

impl MotionCurve {
    /// Creates a curve from its four tuning parameters.
    ///
    /// # Arguments
    ///
    /// * `sensitivity` - Pixels per second at full deflection
    /// * `deadzone` - Per-axis deadzone (0.0 to <1.0)
    /// * `exponent` - Steepness of the exponential term (> 1 recommended)
    /// * `linear_mix` - Share of the linear term (0.0 to 1.0)
    #[must_use]
    pub fn new(sensitivity: f64, deadzone: f64, exponent: f64, linear_mix: f64) -> Self {
        Self {
            deadzone,
            exponent,
            exp_factor: sensitivity * (1.0 - linear_mix),
            lin_factor: sensitivity * linear_mix,
        }
    }

    /// Creates a curve from the `[motion]` config section.
    #[must_use]
    pub fn from_config(config: &MotionConfig) -> Self {
        Self::new(
            config.sensitivity,
            config.deadzone,
            config.exponent,
            config.linear_mix,
        )
    }

    /// Weight of the exponential term (`sensitivity * (1 - linear_mix)`).
    #[must_use]
    pub fn exp_factor(&self) -> f64 {
        self.exp_factor
    }

    /// Weight of the linear term (`sensitivity * linear_mix`).
    #[must_use]
    pub fn lin_factor(&self) -> f64 {
        self.lin_factor
    }

    /// Returns the unrounded cursor velocity (pixels per second) for a stick
    /// deflection, after the deadzone is applied per axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::motion::curve::MotionCurve;
    ///
    /// let curve = MotionCurve::new(1.0, 0.05, 2.5, 0.2);
    /// let v = curve.velocity(0.5, 0.0);
    /// assert!((v.x - 0.2414).abs() < 1e-4);
    /// assert_eq!(v.y, 0.0);
    /// ```
    #[must_use]
    pub fn velocity(&self, raw_x: f64, raw_y: f64) -> Vector2 {
        let deflection = Vector2::new(
            apply_deadzone(raw_x, self.deadzone),
            apply_deadzone(raw_y, self.deadzone),
        );

        if deflection.magnitude_squared() == 0.0 {
            return Vector2::ZERO;
        }

        Vector2::new(self.shape(deflection.x), self.shape(deflection.y))
    }

    /// Computes the integral pixel delta for one tick.
    ///
    /// # Arguments
    ///
    /// * `raw_x`, `raw_y` - Stick axes (-1.0 to 1.0)
    /// * `dt` - Seconds since the previous tick, never capped
    ///
    /// # Returns
    ///
    /// `(dx, dy)` in pixels. `(0, 0)` whenever both axes are inside the
    /// deadzone.
    #[must_use]
    pub fn compute(&self, raw_x: f64, raw_y: f64, dt: f64) -> (i32, i32) {
        let velocity = self.velocity(raw_x, raw_y);
        if velocity.magnitude_squared() == 0.0 {
            return (0, 0);
        }

        let step = velocity * dt;
        (round_to_pixels(step.x), round_to_pixels(step.y))
    }

    /// Signed combined speed for a single deadzoned axis.
    #[inline]
    fn shape(&self, value: f64) -> f64 {
        let magnitude = value.abs();
        let combined =
            self.exp_factor * magnitude.powf(self.exponent) + self.lin_factor * magnitude;
        combined.copysign(value)
    }
}

/// Stick-to-wheel mapping used for scrolling.
///
/// Pushing the stick up (negative axis) scrolls up (positive amount).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWheel {
    deadzone: f64,
    sensitivity: f64,
}

impl ScrollWheel {
    /// # Arguments
    ///
    /// * `deadzone` - Axis deadzone, shared with the cursor stick
    /// * `sensitivity` - Wheel units (120 per notch) per second at full deflection
    #[must_use]
    pub fn new(deadzone: f64, sensitivity: f64) -> Self {
        Self { deadzone, sensitivity }
    }

    #[must_use]
    pub fn from_config(motion: &MotionConfig, scroll: &ScrollConfig) -> Self {
        Self::new(motion.deadzone, scroll.sensitivity)
    }

    /// Wheel amount for one tick, `0` inside the deadzone.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::motion::curve::ScrollWheel;
    ///
    /// let wheel = ScrollWheel::new(0.05, 5000.0);
    /// assert_eq!(wheel.compute(-1.0, 0.001), 5);
    /// assert_eq!(wheel.compute(0.05, 1.0), 0);
    /// ```
    #[must_use]
    pub fn compute(&self, raw: f64, dt: f64) -> i32 {
        if raw.abs() <= self.deadzone {
            return 0;
        }
        round_to_pixels(-raw * dt * self.sensitivity)
    }
}

/// Rounds half to even and saturates into `i32`.
#[inline]
fn round_to_pixels(value: f64) -> i32 {
    value.round_ties_even() as i32
}
