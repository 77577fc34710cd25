//! Level-to-screen transforms
//!
//! A transform is a 3×3 affine matrix restricted to translation, uniform scale
//! and quarter-turn rotation. The accumulated scale and rotation are tracked
//! next to the matrix because sprites and text need them directly, and reading
//! them back out of the matrix entries is lossy.
//!
//! Every mutating call right-multiplies the matrix, so calls compose like nested
//! coordinate frames: the *last* call is applied to a point *first*.

use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::error::GeometryError;

/// A rotation restricted to multiples of 90° (clockwise on screen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuarterTurn {
    #[default]
    Upright,
    Right,
    UpsideDown,
    Left,
}

impl QuarterTurn {
    fn quarters(self) -> u8 {
        match self {
            QuarterTurn::Upright => 0,
            QuarterTurn::Right => 1,
            QuarterTurn::UpsideDown => 2,
            QuarterTurn::Left => 3,
        }
    }

    fn from_quarters(q: u8) -> Self {
        match q % 4 {
            0 => QuarterTurn::Upright,
            1 => QuarterTurn::Right,
            2 => QuarterTurn::UpsideDown,
            _ => QuarterTurn::Left,
        }
    }

    /// Rotation in degrees: 0, 90, 180 or 270
    pub fn degrees(self) -> f64 {
        f64::from(self.quarters()) * 90.0
    }

    /// Exact rotation matrix (no trigonometry, so entries stay 0/±1)
    fn matrix(self) -> DMat3 {
        let (x_axis, y_axis) = match self {
            QuarterTurn::Upright => return DMat3::IDENTITY,
            QuarterTurn::Right => (DVec3::new(0.0, 1.0, 0.0), DVec3::new(-1.0, 0.0, 0.0)),
            QuarterTurn::UpsideDown => (DVec3::new(-1.0, 0.0, 0.0), DVec3::new(0.0, -1.0, 0.0)),
            QuarterTurn::Left => (DVec3::new(0.0, -1.0, 0.0), DVec3::new(1.0, 0.0, 0.0)),
        };
        DMat3::from_cols(x_axis, y_axis, DVec3::Z)
    }
}

impl std::ops::Add for QuarterTurn {
    type Output = QuarterTurn;

    fn add(self, rhs: QuarterTurn) -> QuarterTurn {
        QuarterTurn::from_quarters(self.quarters() + rhs.quarters())
    }
}

impl std::ops::Neg for QuarterTurn {
    type Output = QuarterTurn;

    fn neg(self) -> QuarterTurn {
        QuarterTurn::from_quarters(4 - self.quarters())
    }
}

/// Translation, uniform scale and quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: DMat3,
    scale: f64,
    rotation: QuarterTurn,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: DMat3::IDENTITY,
            scale: 1.0,
            rotation: QuarterTurn::Upright,
        }
    }

    /// Build the level-to-screen transform for a level of `level` units shown on
    /// a `screen` of pixels.
    ///
    /// When the level and screen disagree on orientation (portrait vs
    /// landscape) the level is turned a quarter to the right. The level is
    /// scaled uniformly to fit and centred on the leftover axis.
    pub fn fit(level: DVec2, screen: DVec2) -> Self {
        let level_portrait = level.y > level.x;
        let screen_portrait = screen.y > screen.x;
        let turned = level_portrait != screen_portrait;

        let fitted = if turned {
            DVec2::new(level.y, level.x)
        } else {
            level
        };
        let scale = (screen.x / fitted.x).min(screen.y / fitted.y);
        let margin = (screen - fitted * scale) * 0.5;

        let mut transform = Self::identity();
        if turned {
            // Turning right swings the level into negative x; shift it back first
            transform
                .translate(margin.x + fitted.x * scale, margin.y)
                .rotate(QuarterTurn::Right);
        } else {
            transform.translate(margin.x, margin.y);
        }
        transform.scale(scale);
        transform
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.matrix *= DMat3::from_translation(DVec2::new(dx, dy));
        self
    }

    pub fn scale(&mut self, factor: f64) -> &mut Self {
        debug_assert!(factor.is_finite(), "scale factor must be finite");
        self.matrix *= DMat3::from_scale(DVec2::splat(factor));
        self.scale *= factor;
        self
    }

    pub fn rotate(&mut self, turn: QuarterTurn) -> &mut Self {
        self.matrix *= turn.matrix();
        self.rotation = self.rotation + turn;
        self
    }

    #[inline]
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        self.matrix.transform_point2(p)
    }

    /// Apply only the linear part (scale and rotation), for directions and velocities
    #[inline]
    pub fn transform_vector(&self, v: DVec2) -> DVec2 {
        self.matrix.transform_vector2(v)
    }

    /// Transform both corners and re-sort them. Only valid because rotation is
    /// restricted to quarter turns.
    pub fn transform_rect(&self, r: &Rect) -> Rect {
        Rect::from_corners(self.transform_point(r.min), self.transform_point(r.max))
    }

    /// Product of every scale factor applied so far
    #[inline]
    pub fn accumulated_scale(&self) -> f64 {
        self.scale
    }

    /// Sum of every rotation applied so far
    #[inline]
    pub fn accumulated_rotation(&self) -> QuarterTurn {
        self.rotation
    }

    /// The transform undoing this one, or `None` when it has collapsed to zero scale
    pub fn inverse(&self) -> Option<Transform> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        Some(Transform {
            matrix: self.matrix.inverse(),
            scale: 1.0 / self.scale,
            rotation: -self.rotation,
        })
    }

    /// Map a screen point back to level units
    pub fn inverse_point(&self, p: DVec2) -> Result<DVec2, GeometryError> {
        self.inverse()
            .map(|inv| inv.transform_point(p))
            .ok_or(GeometryError::NonInvertibleTransform)
    }

    pub fn matrix(&self) -> &DMat3 {
        &self.matrix
    }
}
