//! # Physical Sources
//!
//! Which controller element activates a binding.
//!
//! | Source | TOML | Active when |
//! |--------|------|-------------|
//! | Hat direction | `{ hat = "up" }` | hat 0 reads exactly that direction |
//! | Button | `{ button = 0 }` | the button is held (out-of-range indices are never active) |
//! | Stick direction | `{ stick = { x_axis = 2, y_axis = 3, direction = "left" } }` | the stick is pushed past `threshold` within 45° of the direction |

use serde::Deserialize;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::controller::ControllerSnapshot;
use crate::motion::vector::Vector2;

/// Cardinal directions, using the hat convention (up is `+y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    Up,
    Down,
    Left,
    Right,
}

impl HatDirection {
    /// Hat reading for this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::bindings::HatDirection;
    ///
    /// assert_eq!(HatDirection::Up.offset(), (0, 1));
    /// assert_eq!(HatDirection::Left.offset(), (-1, 0));
    /// ```
    #[must_use]
    pub fn offset(&self) -> (i32, i32) {
        match self {
            HatDirection::Up => (0, 1),
            HatDirection::Down => (0, -1),
            HatDirection::Left => (-1, 0),
            HatDirection::Right => (1, 0),
        }
    }

    #[must_use]
    pub fn unit(&self) -> Vector2 {
        let (x, y) = self.offset();
        Vector2::new(f64::from(x), f64::from(y))
    }
}

fn default_stick_threshold() -> f64 {
    0.5
}

/// Stick pushed in a cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StickDirection {
    pub x_axis: usize,
    /// Y axis index; device convention is down-positive, flipped before comparison.
    pub y_axis: usize,
    pub direction: HatDirection,
    /// Minimum deflection magnitude (0.0 to <1.0).
    #[serde(default = "default_stick_threshold")]
    pub threshold: f64,
}

impl StickDirection {
    fn is_active(&self, snapshot: &ControllerSnapshot) -> bool {
        let deflection = Vector2::new(snapshot.axis(self.x_axis), -snapshot.axis(self.y_axis));
        if deflection.magnitude() <= self.threshold {
            return false;
        }
        deflection.normalize().dot(self.direction.unit()) >= FRAC_1_SQRT_2
    }
}

/// Controller element a binding listens to.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalSource {
    Hat(HatDirection),
    Button(usize),
    Stick(StickDirection),
}

impl PhysicalSource {
    /// Evaluates the source against one tick's snapshot.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::bindings::{HatDirection, PhysicalSource};
    /// use padmouse::controller::ControllerSnapshot;
    ///
    /// let snapshot = ControllerSnapshot {
    ///     hat: (0, 1),
    ///     buttons: vec![true, false],
    ///     axes: vec![],
    /// };
    /// assert!(PhysicalSource::Hat(HatDirection::Up).is_active(&snapshot));
    /// assert!(PhysicalSource::Button(0).is_active(&snapshot));
    /// assert!(!PhysicalSource::Button(9).is_active(&snapshot));
    /// ```
    #[must_use]
    pub fn is_active(&self, snapshot: &ControllerSnapshot) -> bool {
        match self {
            PhysicalSource::Hat(direction) => snapshot.hat == direction.offset(),
            PhysicalSource::Button(index) => snapshot.button(*index),
            PhysicalSource::Stick(stick) => stick.is_active(snapshot),
        }
    }

    /// Highest axis index this source reads, if any.
    #[must_use]
    pub fn max_axis(&self) -> Option<usize> {
        match self {
            PhysicalSource::Stick(stick) => Some(stick.x_axis.max(stick.y_axis)),
            _ => None,
        }
    }
}
