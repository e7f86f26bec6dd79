//! A small 2D vector type for positions, velocities, forces and impulses.
//!
//! Space is laid out in screen coordinates: `x` grows to the right and `y` grows downward.
//! Angles are measured in degrees, with `0` pointing "up" (the screen vector `(0, -1)`) and
//! angles increasing clockwise. [`Vector2d::from_angle`] and [`Vector2d::angle`] use that
//! convention so a body can turn its heading into a direction and back.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// An immutable pair of real numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2d {
    x: f64,
    y: f64,
}

impl Vector2d {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct a vector from its components.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Construct the unit vector pointing at `degrees`, where `0` is up and angles grow
    /// clockwise.
    #[inline]
    pub fn from_angle(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { x: sin, y: -cos }
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// The z component of the 3D cross product of two vectors lying in the xy plane.
    #[inline]
    pub fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The unit vector with the same direction, or the zero vector when this vector has no
    /// magnitude. Callers needing a direction must check for the zero case themselves.
    #[inline]
    pub fn unit(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            Self::new(self.x / magnitude, self.y / magnitude)
        } else {
            Self::ZERO
        }
    }

    /// Rotate this vector clockwise by `degrees`.
    #[inline]
    pub fn rotated_by(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// The heading of this vector in degrees within `[0, 360)`. The zero vector reports `0`.
    #[inline]
    pub fn angle(self) -> f64 {
        let degrees = self.x.atan2(-self.y).to_degrees();
        if degrees < 0.0 { degrees + 360.0 } else { degrees }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Vector2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl Add for Vector2d {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2d {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2d {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2d {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vector2d {
    type Output = Self;

    #[inline]
    fn mul(self, scale: f64) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }
}

impl Mul<Vector2d> for f64 {
    type Output = Vector2d;

    #[inline]
    fn mul(self, vector: Vector2d) -> Vector2d {
        vector * self
    }
}

impl MulAssign<f64> for Vector2d {
    #[inline]
    fn mul_assign(&mut self, scale: f64) {
        self.x *= scale;
        self.y *= scale;
    }
}

impl Div<f64> for Vector2d {
    type Output = Self;

    #[inline]
    fn div(self, scale: f64) -> Self {
        Self::new(self.x / scale, self.y / scale)
    }
}

impl Neg for Vector2d {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: Vector2d, expected: Vector2d) {
        assert!(
            (actual - expected).magnitude() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn arithmetic() {
        let a = Vector2d::new(1.0, 2.0);
        let b = Vector2d::new(3.0, -4.0);

        assert_eq!(a + b, Vector2d::new(4.0, -2.0));
        assert_eq!(a - b, Vector2d::new(-2.0, 6.0));
        assert_eq!(a * 2.0, Vector2d::new(2.0, 4.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vector2d::new(1.5, -2.0));
        assert_eq!(-a, Vector2d::new(-1.0, -2.0));

        let mut c = a;
        c += b;
        c -= a;
        c *= 0.5;
        assert_eq!(c, Vector2d::new(1.5, -2.0));
    }

    #[test]
    fn dot_and_cross() {
        let right = Vector2d::new(1.0, 0.0);
        let down = Vector2d::new(0.0, 1.0);

        assert_eq!(right.dot(down), 0.0);
        assert_eq!(right.dot(right), 1.0);
        assert_eq!(right.cross(down), 1.0);
        assert_eq!(down.cross(right), -1.0);
        assert_eq!(Vector2d::new(3.0, 2.0).cross(Vector2d::new(6.0, 4.0)), 0.0);
    }

    #[test]
    fn magnitude_and_unit() {
        let v = Vector2d::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_close(v.unit(), Vector2d::new(0.6, 0.8));
    }

    #[test]
    fn unit_of_zero_is_zero() {
        assert_eq!(Vector2d::ZERO.unit(), Vector2d::ZERO);
    }

    #[test]
    fn angle_zero_points_up() {
        assert_close(Vector2d::from_angle(0.0), Vector2d::new(0.0, -1.0));
        assert_close(Vector2d::from_angle(90.0), Vector2d::new(1.0, 0.0));
        assert_close(Vector2d::from_angle(180.0), Vector2d::new(0.0, 1.0));
        assert_close(Vector2d::from_angle(270.0), Vector2d::new(-1.0, 0.0));
    }

    #[test]
    fn angle_round_trips_through_heading() {
        for degrees in [0.0, 30.0, 90.0, 135.0, 180.0, 225.0, 300.0, 359.0] {
            let angle = Vector2d::from_angle(degrees).angle();
            assert!((angle - degrees).abs() < 1e-6, "{degrees} -> {angle}");
        }
        assert_eq!(Vector2d::ZERO.angle(), 0.0);
    }

    #[test]
    fn rotation_is_clockwise() {
        let up = Vector2d::from_angle(0.0);
        assert_close(up.rotated_by(90.0), Vector2d::from_angle(90.0));
        assert_close(
            Vector2d::from_angle(45.0).rotated_by(60.0),
            Vector2d::from_angle(105.0),
        );
        assert!((Vector2d::new(3.0, 4.0).rotated_by(33.0).magnitude() - 5.0).abs() < EPSILON);
    }
}
