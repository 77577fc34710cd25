//! Polygon boundaries and their ball-radius expansion
//!
//! A boundary is authored as a *visual* outline in level units. Because all
//! physics runs against the ball's centre point, collisions use an *effective*
//! outline instead: the visual outline pushed out by the ball radius, with the
//! convex corners rounded and the concave corners mitred.
//!
//! "Out" is the left-hand side when walking the outline, so an outline wound
//! clockwise on screen grows, and one wound anticlockwise (an enclosure the
//! ball rolls inside) shrinks.

use std::sync::Arc;

use glam::DVec2;

use super::action::{Action, BoundaryId, actions_to_screen};
use crate::consts::{CIRCLE_SEGMENTS, CORNER_SEG_DEG};
use crate::error::GeometryError;
use crate::geom::{Point, Rect, Segment, Transform, Vec2Ext};

/// Turns smaller than this (degrees) count as straight
const TURN_EPSILON: f64 = 1e-9;
/// Outline points closer than this collapse into one
const POINT_EPSILON: f64 = 1e-9;

/// Screen-space data derived by [`Boundary::finish`]
#[derive(Debug, Clone)]
struct Derived {
    outline: Vec<Point>,
    effective: Vec<Segment>,
    child_layouts: Vec<Rect>,
}

/// A closed polygon on the board: wall, trigger, or purely visual
#[derive(Debug, Clone)]
pub struct Boundary {
    id: BoundaryId,
    /// Outline as authored, in level units
    visual: Vec<Point>,
    /// Takes part in bounce search
    is_wall: bool,
    /// Has a rendered visual
    is_drawn: bool,
    on_cross: Vec<Action>,
    on_bounce: Vec<Action>,
    /// Layout rects of nested graphics/text, in level units
    children: Vec<Rect>,
    derived: Option<Derived>,
}

impl Boundary {
    /// An empty wall boundary; add points with [`Boundary::add_point`]
    pub fn new(id: BoundaryId) -> Self {
        Self {
            id,
            visual: Vec::new(),
            is_wall: true,
            is_drawn: true,
            on_cross: Vec::new(),
            on_bounce: Vec::new(),
            children: Vec::new(),
            derived: None,
        }
    }

    pub fn from_points(id: BoundaryId, points: impl IntoIterator<Item = Point>) -> Self {
        let mut boundary = Self::new(id);
        boundary.visual.extend(points);
        boundary
    }

    /// Rectangle wound clockwise on screen (grows outward)
    pub fn rect(id: BoundaryId, rect: Rect) -> Self {
        Self::from_points(id, rect.corners())
    }

    /// Regular `segments`-gon approximating a circle, wound clockwise on screen
    pub fn circle(id: BoundaryId, centre: Point, radius: f64, segments: usize) -> Self {
        let step = 360.0 / segments.max(1) as f64;
        Self::from_points(
            id,
            (0..segments).map(|i| centre + DVec2::new(radius, 0.0).rotated(step * i as f64)),
        )
    }

    /// Circle with the default chord count
    pub fn disc(id: BoundaryId, centre: Point, radius: f64) -> Self {
        Self::circle(id, centre, radius, CIRCLE_SEGMENTS)
    }

    pub fn wall(mut self, is_wall: bool) -> Self {
        self.is_wall = is_wall;
        self
    }

    pub fn drawn(mut self, is_drawn: bool) -> Self {
        self.is_drawn = is_drawn;
        self
    }

    pub fn on_cross(mut self, actions: Vec<Action>) -> Self {
        self.on_cross = actions;
        self
    }

    pub fn on_bounce(mut self, actions: Vec<Action>) -> Self {
        self.on_bounce = actions;
        self
    }

    /// Flip the winding, so the effective outline shrinks instead of grows.
    /// Used for enclosures the ball rolls inside.
    pub fn reverse_winding(mut self) -> Self {
        self.visual.reverse();
        self.derived = None;
        self
    }

    /// Append an outline point while the level is being parsed
    pub fn add_point(&mut self, p: Point) {
        self.visual.push(p);
        self.derived = None;
    }

    /// Register a nested element's layout rectangle (level units)
    pub fn add_child(&mut self, layout: Rect) {
        self.children.push(layout);
    }

    /// Derive the screen-space outline and the effective outline.
    ///
    /// `ball_radius` is in level units; it is scaled along with the level.
    pub fn finish(&mut self, transform: &Transform, ball_radius: f64) -> Result<(), GeometryError> {
        if self.visual.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                boundary: self.id,
                count: self.visual.len(),
            });
        }

        let outline: Vec<Point> = self
            .visual
            .iter()
            .map(|p| transform.transform_point(*p))
            .collect();
        let n = outline.len();

        // base[i] ends at outline[i]
        let base: Vec<Segment> = (0..n)
            .map(|i| Segment::new(outline[(i + n - 1) % n], outline[i]))
            .collect();
        if let Some(index) = base.iter().position(|s| s.magnitude() == 0.0) {
            return Err(GeometryError::ZeroLengthEdge {
                boundary: self.id,
                index,
            });
        }

        let distance = ball_radius * transform.accumulated_scale();
        let grown: Vec<Segment> = base.iter().map(|s| s.offset_left(distance)).collect();
        let points = dedup_ring(corner_points(&base, &grown));

        let on_cross = actions_to_screen(&self.on_cross, transform);
        let on_bounce = actions_to_screen(&self.on_bounce, transform);
        let m = points.len();
        let effective = (0..m)
            .map(|k| {
                Segment::new(points[k], points[(k + 1) % m]).with_actions(
                    self.id,
                    Arc::clone(&on_cross),
                    Arc::clone(&on_bounce),
                )
            })
            .collect();

        let child_layouts = self
            .children
            .iter()
            .map(|r| transform.transform_rect(r))
            .collect();

        self.derived = Some(Derived {
            outline,
            effective,
            child_layouts,
        });
        Ok(())
    }

    pub fn id(&self) -> BoundaryId {
        self.id
    }

    pub fn is_wall(&self) -> bool {
        self.is_wall
    }

    pub fn is_drawn(&self) -> bool {
        self.is_drawn
    }

    /// Fires actions when crossed, without blocking motion
    pub fn is_trigger(&self) -> bool {
        !self.on_cross.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.derived.is_some()
    }

    /// Outline as authored, in level units
    pub fn visual_outline(&self) -> &[Point] {
        &self.visual
    }

    /// Visual outline in screen space (empty until finished)
    pub fn screen_outline(&self) -> &[Point] {
        self.derived.as_ref().map_or(&[], |d| d.outline.as_slice())
    }

    /// Ball-radius-expanded outline in screen space (empty until finished)
    pub fn effective_outline(&self) -> &[Segment] {
        self.derived.as_ref().map_or(&[], |d| d.effective.as_slice())
    }

    /// Nested layout rectangles in screen space (empty until finished)
    pub fn child_layouts(&self) -> &[Rect] {
        self.derived.as_ref().map_or(&[], |d| d.child_layouts.as_slice())
    }
}

/// Walk every corner between consecutive grown edges and emit the points of
/// the effective outline.
///
/// Corner `i` sits at `base[i].end()`, between `grown[i]` and `grown[i + 1]`.
fn corner_points(base: &[Segment], grown: &[Segment]) -> Vec<Point> {
    let n = grown.len();
    let mut points = Vec::with_capacity(n * 2);

    for i in 0..n {
        let next = (i + 1) % n;
        let centre = base[i].end();
        let from = centre.vector_to(grown[i].end());
        let to = centre.vector_to(grown[next].start());
        let turn = to.angle_from(from);

        if turn.abs() < TURN_EPSILON {
            points.push(grown[i].end());
        } else if turn < 0.0 {
            // Concave: the grown edges overlap, trim both to where they cross
            match Segment::intersect_infinite(&grown[i], &grown[next]) {
                Some(p) => points.push(p),
                None => {
                    points.push(grown[i].end());
                    points.push(grown[next].start());
                }
            }
        } else {
            round_corner(centre, from, turn, &mut points);
        }
    }

    points
}

/// Fan of points closing the gap of a convex corner.
///
/// The fan advances in `CORNER_SEG_DEG` steps from `from` towards
/// `from.rotated(turn)`. Each point sits where the tangents to the ball-radius
/// circle at two consecutive steps meet, so every chord of the fan stays at
/// least one radius away from `centre`. A turn of one step or less yields a
/// single point: the plain mitre of the two grown edges. Points placed on the
/// circle itself would leave chords inside the ball radius.
fn round_corner(centre: Point, from: DVec2, turn: f64, points: &mut Vec<Point>) {
    let mut reached = 0.0;
    loop {
        let mut step_end = reached + CORNER_SEG_DEG;
        if step_end > turn - TURN_EPSILON {
            step_end = turn;
        }
        let half = (step_end - reached) / 2.0;
        points.push(centre + from.rotated(reached + half) / half.to_radians().cos());
        if step_end >= turn {
            break;
        }
        reached = step_end;
    }
}

/// Drop points that coincide with their predecessor (wrapping round the ring)
fn dedup_ring(points: Vec<Point>) -> Vec<Point> {
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last().is_none_or(|last| last.distance(p) > POINT_EPSILON) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && ring[0].distance(ring[ring.len() - 1]) <= POINT_EPSILON {
        ring.pop();
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::QuarterTurn;
    use proptest::prelude::*;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    fn signed_area(points: &[Point]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| points[i].perp_dot(points[(i + 1) % n]))
            .sum::<f64>()
            / 2.0
    }

    fn effective_points(b: &Boundary) -> Vec<Point> {
        b.effective_outline().iter().map(|s| s.start()).collect()
    }

    fn min_distance(b: &Boundary, p: Point) -> f64 {
        b.effective_outline()
            .iter()
            .map(|s| s.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    fn max_turn(b: &Boundary) -> f64 {
        let segs = b.effective_outline();
        let n = segs.len();
        (0..n)
            .map(|i| segs[(i + 1) % n].delta().angle_from(segs[i].delta()).abs())
            .fold(0.0, f64::max)
    }

    fn finished(mut b: Boundary, radius: f64) -> Boundary {
        b.finish(&Transform::identity(), radius).expect("valid geometry");
        b
    }

    fn square() -> Boundary {
        Boundary::from_points(
            BoundaryId(1),
            [
                DVec2::new(0.0, 0.0),
                DVec2::new(10.0, 0.0),
                DVec2::new(10.0, 10.0),
                DVec2::new(0.0, 10.0),
            ],
        )
    }

    #[test]
    fn test_square_grows_with_rounded_corners() {
        let b = finished(square(), 2.0);
        // Four corners of 90°, three fan points each
        assert_eq!(b.effective_outline().len(), 12);

        let t15 = 15f64.to_radians().tan();
        let top = b
            .effective_outline()
            .iter()
            .find(|s| close(s.start(), DVec2::new(-2.0 * t15, -2.0)))
            .expect("top edge");
        assert!(close(top.end(), DVec2::new(10.0 + 2.0 * t15, -2.0)));
        assert!(max_turn(&b) <= CORNER_SEG_DEG + 1e-6);
    }

    #[test]
    fn test_expansion_keeps_ball_radius_clearance() {
        let b = finished(square(), 2.0);
        for p in b.visual_outline() {
            assert!(min_distance(&b, *p) >= 2.0 - 1e-9);
        }
    }

    #[test]
    fn test_concave_corner_is_mitred() {
        // L shape, clockwise on screen; the inner corner at (10, 10) is concave
        let b = finished(
            Boundary::from_points(
                BoundaryId(2),
                [
                    DVec2::new(0.0, 0.0),
                    DVec2::new(20.0, 0.0),
                    DVec2::new(20.0, 10.0),
                    DVec2::new(10.0, 10.0),
                    DVec2::new(10.0, 20.0),
                    DVec2::new(0.0, 20.0),
                ],
            ),
            2.0,
        );
        let points = effective_points(&b);
        assert!(points.iter().any(|p| close(*p, DVec2::new(12.0, 12.0))));
        for p in b.visual_outline() {
            assert!(min_distance(&b, *p) >= 2.0 - 1e-9);
        }
        assert!(signed_area(&points) > 0.0);
    }

    #[test]
    fn test_reversed_winding_shrinks() {
        let b = finished(square().reverse_winding(), 2.0);
        let points = effective_points(&b);
        assert_eq!(points.len(), 4);
        for corner in [(2.0, 2.0), (8.0, 2.0), (8.0, 8.0), (2.0, 8.0)] {
            assert!(points.iter().any(|p| close(*p, DVec2::new(corner.0, corner.1))));
        }
        assert!(signed_area(&points) < 0.0);
        assert!(signed_area(b.screen_outline()) < 0.0);
    }

    #[test]
    fn test_winding_preserved() {
        for b in [square(), square().reverse_winding()] {
            let b = finished(b, 1.5);
            let visual = signed_area(b.screen_outline());
            let effective = signed_area(&effective_points(&b));
            assert_eq!(visual.signum(), effective.signum());
        }
    }

    #[test]
    fn test_triangle_and_sharp_spike() {
        let b = finished(
            Boundary::from_points(
                BoundaryId(3),
                [DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0), DVec2::new(0.0, 1.0)],
            ),
            3.0,
        );
        assert!(b.effective_outline().len() >= 3);
        assert!(max_turn(&b) <= CORNER_SEG_DEG + 1e-6);
        for p in b.visual_outline() {
            assert!(min_distance(&b, *p) >= 3.0 - 1e-9);
        }
        let effective = signed_area(&effective_points(&b));
        assert!(effective > 0.0);
    }

    #[test]
    fn test_circle_stays_smooth() {
        for segments in [12, 24, 36, 72] {
            let b = finished(
                Boundary::circle(BoundaryId(4), DVec2::new(50.0, 50.0), 20.0, segments),
                4.0,
            );
            // At or below the corner step, each corner is one mitre point
            assert_eq!(b.effective_outline().len(), segments);
            assert!(max_turn(&b) <= 360.0 / segments as f64 + 1e-6);
            for p in b.visual_outline() {
                assert!(min_distance(&b, *p) >= 4.0 - 1e-9);
            }
        }
    }

    #[test]
    fn test_coarse_circle_gets_fan_points() {
        // 45° corners need two fan points each (30° then 15°)
        let b = finished(Boundary::circle(BoundaryId(5), DVec2::ZERO, 10.0, 8), 2.0);
        assert_eq!(b.effective_outline().len(), 16);
        assert!(max_turn(&b) <= CORNER_SEG_DEG + 1e-6);
    }

    #[test]
    fn test_zero_radius_keeps_outline() {
        let b = finished(square(), 0.0);
        let points = effective_points(&b);
        assert_eq!(points.len(), 4);
        assert!(close(points[0], DVec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_too_few_points() {
        let mut b = Boundary::from_points(BoundaryId(6), [DVec2::ZERO, DVec2::X]);
        assert_eq!(
            b.finish(&Transform::identity(), 1.0),
            Err(GeometryError::TooFewPoints {
                boundary: BoundaryId(6),
                count: 2
            })
        );
        assert!(!b.is_finished());
        assert!(b.effective_outline().is_empty());
    }

    #[test]
    fn test_zero_length_edge_rejected() {
        let mut b = Boundary::new(BoundaryId(7));
        for p in [
            DVec2::new(0.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(5.0, 0.0),
            DVec2::new(0.0, 5.0),
        ] {
            b.add_point(p);
        }
        assert_eq!(
            b.finish(&Transform::identity(), 1.0),
            Err(GeometryError::ZeroLengthEdge {
                boundary: BoundaryId(7),
                index: 2
            })
        );
    }

    #[test]
    fn test_actions_shared_across_outline() {
        let mut b = square()
            .wall(false)
            .drawn(false)
            .on_cross(vec![Action::Win("through".into())])
            .on_bounce(vec![Action::ChangeSpeed(1.5)]);
        b.finish(&Transform::identity(), 1.0).expect("valid");
        assert!(b.is_trigger());
        assert!(!b.is_wall());
        assert!(!b.is_drawn());

        let first = &b.effective_outline()[0];
        for s in b.effective_outline() {
            assert!(Arc::ptr_eq(s.on_cross(), first.on_cross()));
            assert!(Arc::ptr_eq(s.on_bounce(), first.on_bounce()));
            assert_eq!(s.owner(), Some(BoundaryId(1)));
        }
        assert_eq!(first.on_bounce()[0], Action::ChangeSpeed(1.5));
    }

    #[test]
    fn test_finish_applies_transform() {
        let mut t = Transform::identity();
        t.translate(100.0, 0.0).rotate(QuarterTurn::Right).scale(2.0);
        let mut b = square();
        b.add_child(Rect::new(2.0, 2.0, 4.0, 4.0));
        b.finish(&t, 1.0).expect("valid");

        // Radius scales with the level
        for p in b.screen_outline() {
            assert!(min_distance(&b, *p) >= 2.0 - 1e-9);
        }
        assert!(close(b.screen_outline()[1], DVec2::new(100.0, 20.0)));
        let layout = b.child_layouts()[0];
        assert!(close(layout.min, DVec2::new(88.0, 4.0)));
        assert!(close(layout.max, DVec2::new(96.0, 12.0)));
    }

    fn convex_polygon() -> impl Strategy<Value = Vec<Point>> {
        prop::collection::vec(1.0..10.0f64, 3..12).prop_map(|weights| {
            let total: f64 = weights.iter().sum();
            let mut angle = 0.0;
            weights
                .iter()
                .map(|w| {
                    angle += w / total * 360.0;
                    DVec2::new(50.0, 0.0).rotated(angle)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_expansion_invariant(points in convex_polygon(), radius in 0.5..10.0f64) {
            let mut b = Boundary::from_points(BoundaryId(9), points);
            b.finish(&Transform::identity(), radius).expect("valid");
            for p in b.visual_outline() {
                prop_assert!(min_distance(&b, *p) >= radius - 1e-7);
            }
            let visual = signed_area(b.screen_outline());
            let effective = signed_area(&effective_points(&b));
            prop_assert_eq!(visual.signum(), effective.signum());
            prop_assert!(max_turn(&b) <= CORNER_SEG_DEG + 1e-6);
        }
    }
}
