//! Points and displacement vectors
//!
//! Both are plain `glam::DVec2` values. The aliases only document intent; the
//! [`Vec2Ext`] trait adds the degree-based operations the geometry code leans on.

use glam::DVec2;

use crate::normalize_degrees;

/// A position on the board
pub type Point = DVec2;

/// A displacement between two positions
pub type Vector = DVec2;

/// Degree-based helpers for points and vectors
pub trait Vec2Ext {
    /// Direction of this vector in degrees, (-180, 180]
    fn angle(self) -> f64;

    /// Angle of this vector relative to `other`, normalized to (-180, 180]
    fn angle_from(self, other: Self) -> f64;

    /// Rotate by `degrees` (positive turns clockwise on screen)
    fn rotated(self, degrees: f64) -> Self;

    /// Unit-length perpendicular on the left of the direction of travel
    /// (the vector rotated by -90°)
    fn left_normal(self) -> Self;

    /// Vector from this point to `other`
    fn vector_to(self, other: Self) -> Self;

    /// This point displaced by `v`
    fn offset(self, v: Self) -> Self;
}

impl Vec2Ext for DVec2 {
    #[inline]
    fn angle(self) -> f64 {
        normalize_degrees(self.y.atan2(self.x).to_degrees())
    }

    #[inline]
    fn angle_from(self, other: Self) -> f64 {
        normalize_degrees(self.angle() - other.angle())
    }

    fn rotated(self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn left_normal(self) -> Self {
        DVec2::new(self.y, -self.x).normalize_or_zero()
    }

    #[inline]
    fn vector_to(self, other: Self) -> Self {
        other - self
    }

    #[inline]
    fn offset(self, v: Self) -> Self {
        self + v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_angle() {
        assert_eq!(DVec2::new(1.0, 0.0).angle(), 0.0);
        assert!((DVec2::new(0.0, 1.0).angle() - 90.0).abs() < 1e-12);
        assert!((DVec2::new(-1.0, 0.0).angle() - 180.0).abs() < 1e-12);
        assert!((DVec2::new(0.0, -1.0).angle() + 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_from_wraps() {
        let a = DVec2::new(-1.0, -0.01); // just under -180
        let b = DVec2::new(-1.0, 0.01); // just under 180
        let rel = b.angle_from(a);
        assert!(rel < 0.0 && rel > -2.0, "got {rel}");
        assert!((DVec2::new(1.0, 0.0).angle_from(DVec2::new(-1.0, 0.0)) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated() {
        let v = DVec2::new(2.0, 0.0);
        assert!(close(v.rotated(90.0), DVec2::new(0.0, 2.0)));
        assert!(close(v.rotated(-90.0), DVec2::new(0.0, -2.0)));
        assert!(close(v.rotated(30.0).rotated(-30.0), v));
    }

    #[test]
    fn test_left_normal() {
        // Walking right along the screen, "left" is up (negative y)
        assert!(close(DVec2::new(5.0, 0.0).left_normal(), DVec2::new(0.0, -1.0)));
        assert!(close(DVec2::new(0.0, 3.0).left_normal(), DVec2::new(1.0, 0.0)));
        assert_eq!(DVec2::ZERO.left_normal(), DVec2::ZERO);
    }

    #[test]
    fn test_vector_to_and_offset() {
        let a = DVec2::new(1.0, 2.0);
        let b = DVec2::new(4.0, 6.0);
        let v = a.vector_to(b);
        assert_eq!(v, DVec2::new(3.0, 4.0));
        assert_eq!(a.offset(v), b);
        assert_eq!(a.distance(b), 5.0);
    }
}
