//! # Rapid Trigger (Trend Detector)
//!
//! Converts a continuously varying trigger value into a press/release
//! signal based on direction reversal instead of a fixed actuation point.
//!
//! The detector tracks a reference extremum. While released it follows the
//! trough; once the value climbs more than `movement` above the trough the
//! trigger is pressed and the reference becomes a running peak. Falling more
//! than `movement` below that peak releases it again. The absolute position
//! of the trigger never matters, only how far it moved since the last
//! turning point.
//!
//! ```text
//! value   0.00  0.20  0.90  0.75  0.90
//! active  false true  true  false true      (movement = 0.1)
//! ```
//!
//! The first reading only initializes the detector and always reports
//! released, so a trigger first seen mid-travel has to rise by `movement`
//! before it is reported pressed.
//!
//! ## Usage
//!
//! ```
//! use padmouse::signal::trend::TrendDetector;
//!
//! let mut left = TrendDetector::new(0.1);
//! assert!(!left.update(0.75)); // first reading initializes
//! assert!(left.update(0.95));   // rose 0.2 from the trough
//! assert!(!left.update(0.80));  // fell 0.15 from the peak
//! ```

/// Mutable state of one [`TrendDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendState {
    /// `true` while tracking a falling trend (reported as released).
    pub is_decreasing: bool,
    /// Last value observed, `None` before the first update.
    pub last_value: Option<f64>,
    /// Current turning-point reference (trough or peak).
    pub reference_value: Option<f64>,
}

impl Default for TrendState {
    fn default() -> Self {
        Self {
            is_decreasing: true,
            last_value: None,
            reference_value: None,
        }
    }
}

/// Hysteresis edge detector for one analog axis.
#[derive(Debug, Clone)]
pub struct TrendDetector {
    movement: f64,
    state: TrendState,
}

impl TrendDetector {
    /// Creates an uninitialized detector.
    ///
    /// # Arguments
    ///
    /// * `movement` - Reversal distance required to flip (`>= 0`). `0.0`
    ///   flips on any strict reversal.
    #[must_use]
    pub fn new(movement: f64) -> Self {
        Self {
            movement,
            state: TrendState::default(),
        }
    }

    #[must_use]
    pub fn movement(&self) -> f64 {
        self.movement
    }

    #[must_use]
    pub fn state(&self) -> &TrendState {
        &self.state
    }

    /// Whether the detector currently reports the trigger as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.state.is_decreasing
    }

    /// Feeds one sample and returns the active state.
    pub fn update(&mut self, value: f64) -> bool {
        let (Some(_), Some(reference)) = (self.state.last_value, self.state.reference_value) else {
            self.state.last_value = Some(value);
            self.state.reference_value = Some(value);
            return false;
        };

        if self.state.is_decreasing {
            if value > reference + self.movement {
                self.state.is_decreasing = false;
                self.state.reference_value = Some(value);
            } else if value < reference {
                self.state.reference_value = Some(value);
            }
        } else if value < reference - self.movement {
            self.state.is_decreasing = true;
            self.state.reference_value = Some(value);
        } else if value > reference {
            self.state.reference_value = Some(value);
        }

        self.state.last_value = Some(value);
        self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut TrendDetector, values: &[f64]) -> Vec<bool> {
        values.iter().map(|&v| detector.update(v)).collect()
    }

    // ==================== Initialization Tests ====================

    #[test]
    fn test_first_update_initializes() {
        let mut detector = TrendDetector::new(0.1);
        assert_eq!(detector.state().last_value, None);

        assert!(!detector.update(0.4));
        assert_eq!(detector.state().last_value, Some(0.4));
        assert_eq!(detector.state().reference_value, Some(0.4));
        assert!(detector.state().is_decreasing);
    }

    #[test]
    fn test_first_update_inactive_even_at_full_press() {
        let mut detector = TrendDetector::new(0.1);
        assert!(!detector.update(1.0));
    }

    // ==================== Press/Release Tests ====================

    #[test]
    fn test_rescaled_axis_sequence() {
        // Axis readings 0.5, 0.9, 0.6 rescaled to 0..1
        let mut detector = TrendDetector::new(0.1);
        assert_eq!(feed(&mut detector, &[0.75, 0.95, 0.8]), vec![false, true, false]);
        assert_eq!(detector.state().reference_value, Some(0.8));
    }

    #[test]
    fn test_rise_past_movement_from_trough() {
        let mut detector = TrendDetector::new(0.1);
        let states = feed(&mut detector, &[0.5, 0.3, 0.2, 0.25, 0.31]);
        assert_eq!(states, vec![false, false, false, false, true]);
        assert_eq!(detector.state().reference_value, Some(0.31));
    }

    #[test]
    fn test_stays_active_while_rising() {
        let mut detector = TrendDetector::new(0.1);
        feed(&mut detector, &[0.0, 0.2]);
        assert!(detector.is_active());
        assert_eq!(feed(&mut detector, &[0.4, 0.6, 0.8, 1.0]), vec![true; 4]);
    }

    #[test]
    fn test_release_needs_fall_from_peak() {
        let mut detector = TrendDetector::new(0.1);
        feed(&mut detector, &[0.0, 0.2, 0.9]);
        // Small dips below the 0.9 peak keep it pressed
        assert_eq!(feed(&mut detector, &[0.85, 0.82, 0.81]), vec![true, true, true]);
        // Exceeding the movement releases
        assert!(!detector.update(0.75));
    }

    #[test]
    fn test_repress_without_full_release() {
        // Rapid trigger: re-press from anywhere in the travel
        let mut detector = TrendDetector::new(0.1);
        feed(&mut detector, &[0.0, 0.5, 1.0]);
        assert!(!detector.update(0.85));
        assert!(!detector.update(0.7));
        assert!(detector.update(0.81));
    }

    #[test]
    fn test_exact_movement_does_not_flip() {
        let mut detector = TrendDetector::new(0.25);
        feed(&mut detector, &[0.5]);
        assert!(!detector.update(0.75));
        assert!(detector.update(0.76));
    }

    // ==================== Stability Tests ====================

    #[test]
    fn test_repeated_value_never_flips() {
        let mut detector = TrendDetector::new(0.1);
        let mut previous = detector.update(0.3);
        for value in [0.3, 0.6, 0.6, 0.6, 0.45, 0.45, 0.45] {
            let active = detector.update(value);
            let again = detector.update(value);
            assert_eq!(active, again, "value {} flipped on repeat", value);
            previous = again;
        }
        assert!(!previous);
    }

    #[test]
    fn test_noise_inside_movement_is_ignored() {
        let mut detector = TrendDetector::new(0.1);
        let noise = [0.02, 0.05, 0.01, 0.07, 0.03, 0.0, 0.06];
        assert!(feed(&mut detector, &noise).iter().all(|&active| !active));
    }

    #[test]
    fn test_monotonic_rise_from_first_sample() {
        let mut detector = TrendDetector::new(0.1);
        let states = feed(&mut detector, &[0.0, 0.05, 0.1, 0.15]);
        assert_eq!(states, vec![false, false, false, true]);
    }

    // ==================== Zero Movement Tests ====================

    #[test]
    fn test_zero_movement_flips_on_any_reversal() {
        let mut detector = TrendDetector::new(0.0);
        let states = feed(&mut detector, &[0.5, 0.51, 0.509, 0.509, 0.51]);
        assert_eq!(states, vec![false, true, false, false, true]);
    }
}
