//! Directed line segments
//!
//! Segments are the unit of physical interaction: every wall and trigger on
//! the board is a run of segments derived from a boundary's effective outline.

use std::sync::Arc;

use super::rect::Rect;
use super::vector::{Point, Vec2Ext, Vector};
use crate::board::{Actions, BoundaryId, no_actions};

/// An immutable directed segment with precomputed direction data.
///
/// The only mutable state is the barrier flag, which force-field style
/// boundaries switch on and off during play.
#[derive(Debug, Clone)]
pub struct Segment {
    start: Point,
    end: Point,
    delta: Vector,
    unit: Vector,
    magnitude: f64,
    bbox: Rect,
    barrier_active: bool,
    /// Boundary this segment was derived from (barrier toggles address it)
    owner: Option<BoundaryId>,
    on_cross: Actions,
    on_bounce: Actions,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        let delta = end - start;
        let magnitude = delta.length();
        // Exactly zero for a degenerate segment, never NaN
        let unit = if magnitude > 0.0 {
            delta / magnitude
        } else {
            Vector::ZERO
        };
        Self {
            start,
            end,
            delta,
            unit,
            magnitude,
            bbox: Rect::from_corners(start, end),
            barrier_active: true,
            owner: None,
            on_cross: no_actions(),
            on_bounce: no_actions(),
        }
    }

    /// Attach the (shared) action lists of the boundary this segment belongs to
    pub fn with_actions(mut self, owner: BoundaryId, on_cross: Actions, on_bounce: Actions) -> Self {
        self.owner = Some(owner);
        self.on_cross = on_cross;
        self.on_bounce = on_bounce;
        self
    }

    fn rebuilt(&self, start: Point, end: Point) -> Self {
        let mut segment = Segment::new(start, end);
        segment.barrier_active = self.barrier_active;
        segment.owner = self.owner;
        segment.on_cross = Arc::clone(&self.on_cross);
        segment.on_bounce = Arc::clone(&self.on_bounce);
        segment
    }

    /// Both endpoints scaled about the origin; actions carry over
    pub fn scale(&self, factor: f64) -> Self {
        self.rebuilt(self.start * factor, self.end * factor)
    }

    /// The segment shifted `distance` to its left (walking start to end)
    pub fn offset_left(&self, distance: f64) -> Self {
        // unit rotated by -90°
        let shift = self.unit.left_normal() * distance;
        self.rebuilt(self.start + shift, self.end + shift)
    }

    /// Where the infinite lines through `a` and `b` meet.
    ///
    /// `None` when they are parallel or coincident; a `None` says nothing about
    /// which of the two it was.
    pub fn intersect_infinite(a: &Segment, b: &Segment) -> Option<Point> {
        let (t, _) = line_fractions(a.start, a.delta, b.start, b.delta)?;
        Some(a.start + a.delta * t)
    }

    /// Shortest distance from `p` to any point of this segment
    pub fn distance_to(&self, p: Point) -> f64 {
        if self.magnitude == 0.0 {
            return self.start.distance(p);
        }
        let t = ((p - self.start).dot(self.unit) / self.magnitude).clamp(0.0, 1.0);
        (self.start + self.delta * t).distance(p)
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    #[inline]
    pub fn delta(&self) -> Vector {
        self.delta
    }

    #[inline]
    pub fn unit(&self) -> Vector {
        self.unit
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    #[inline]
    pub fn bbox(&self) -> &Rect {
        &self.bbox
    }

    /// Direction of travel in degrees
    pub fn angle(&self) -> f64 {
        self.delta.angle()
    }

    #[inline]
    pub fn barrier_active(&self) -> bool {
        self.barrier_active
    }

    pub fn set_barrier_active(&mut self, active: bool) {
        self.barrier_active = active;
    }

    pub fn owner(&self) -> Option<BoundaryId> {
        self.owner
    }

    pub fn on_cross(&self) -> &Actions {
        &self.on_cross
    }

    pub fn on_bounce(&self) -> &Actions {
        &self.on_bounce
    }
}

/// Solve `p + t·r = q + u·s` for the fractions `(t, u)` along both lines.
///
/// Returns `None` when the directions are parallel (zero determinant). The
/// fractions are not range checked.
#[inline]
pub fn line_fractions(p: Point, r: Vector, q: Point, s: Vector) -> Option<(f64, f64)> {
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return None;
    }
    let qp = q - p;
    Some((qp.perp_dot(s) / denom, qp.perp_dot(r) / denom))
}
