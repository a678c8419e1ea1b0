//! # 2D Vector Primitive
//!
//! A small value type used for stick deflection math. Equality is
//! approximate: two vectors compare equal when each component is within a
//! relative tolerance of `1e-9` of the larger magnitude.
//!
//! Division by a zero scalar is reported as
//! [`PadMouseError::DivisionByZero`] instead of producing `inf`/`NaN`.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{PadMouseError, Result};

/// Relative tolerance used by [`Vector2::approx_eq`].
pub const REL_TOLERANCE: f64 = 1e-9;

/// Two-component vector of `f64`.
///
/// # Examples
///
/// ```
/// use padmouse::motion::vector::Vector2;
///
/// let v = Vector2::new(3.0, 4.0);
/// assert_eq!(v.magnitude(), 5.0);
/// assert_eq!(v + (1.0, 1.0), Vector2::new(4.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// The zero vector.
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns component `0` (x) or `1` (y), `None` for any other index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.x),
            1 => Some(self.y),
            _ => None,
        }
    }

    #[must_use]
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the unit vector in the same direction.
    ///
    /// The zero vector normalizes to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::motion::vector::Vector2;
    ///
    /// assert_eq!(Vector2::new(0.0, 2.0).normalize(), Vector2::new(0.0, 1.0));
    /// assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    /// ```
    #[must_use]
    pub fn normalize(&self) -> Vector2 {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Vector2::ZERO;
        }
        Vector2::new(self.x / mag, self.y / mag)
    }

    #[must_use]
    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Divides both components by `scalar`.
    ///
    /// # Errors
    ///
    /// Returns [`PadMouseError::DivisionByZero`] when `scalar` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::motion::vector::Vector2;
    ///
    /// let v = Vector2::new(2.0, -4.0);
    /// assert_eq!(v.checked_div(2.0).unwrap(), Vector2::new(1.0, -2.0));
    /// assert!(v.checked_div(0.0).is_err());
    /// ```
    pub fn checked_div(&self, scalar: f64) -> Result<Vector2> {
        if scalar == 0.0 {
            return Err(PadMouseError::DivisionByZero);
        }
        Ok(Vector2::new(self.x / scalar, self.y / scalar))
    }

    /// In-place variant of [`Vector2::checked_div`]. Leaves `self`
    /// untouched on error.
    pub fn checked_div_assign(&mut self, scalar: f64) -> Result<()> {
        *self = self.checked_div(scalar)?;
        Ok(())
    }

    /// Component-wise closeness check with [`REL_TOLERANCE`].
    #[must_use]
    pub fn approx_eq(&self, other: &Vector2) -> bool {
        is_close(self.x, other.x) && is_close(self.y, other.y)
    }
}

/// `|a - b| <= REL_TOLERANCE * max(|a|, |b|)`, exact match for infinities.
fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    (a - b).abs() <= REL_TOLERANCE * a.abs().max(b.abs())
}

impl PartialEq for Vector2 {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl PartialEq<(f64, f64)> for Vector2 {
    fn eq(&self, other: &(f64, f64)) -> bool {
        self.approx_eq(&Vector2::from(*other))
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Vector2> for (f64, f64) {
    fn from(v: Vector2) -> Self {
        (v.x, v.y)
    }
}

impl<T: Into<Vector2>> Add<T> for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: T) -> Vector2 {
        let rhs = rhs.into();
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Into<Vector2>> AddAssign<T> for Vector2 {
    fn add_assign(&mut self, rhs: T) {
        *self = *self + rhs;
    }
}

impl<T: Into<Vector2>> Sub<T> for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: T) -> Vector2 {
        let rhs = rhs.into();
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Into<Vector2>> SubAssign<T> for Vector2 {
    fn sub_assign(&mut self, rhs: T) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2> for f64 {
    type Output = Vector2;

    fn mul(self, v: Vector2) -> Vector2 {
        v * self
    }
}

impl MulAssign<f64> for Vector2 {
    fn mul_assign(&mut self, scalar: f64) {
        *self = *self * scalar;
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}
