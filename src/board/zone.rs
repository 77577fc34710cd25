//! Radial gravity zones (holes and targets)
//!
//! A zone pulls the ball toward its centre between two radii. Outside the slope
//! radius nothing happens; between the slope and fall radii the pull grows along
//! a quarter-ellipse; inside the fall radius the pull stops so the ball is not
//! flung back out of a hole it is meant to drop into.

use super::action::{Action, Actions, actions_to_screen, no_actions};
use crate::error::GeometryError;
use crate::geom::{Point, Transform};

#[derive(Debug, Clone)]
pub struct Zone {
    centre: Point,
    slope_radius: f64,
    fall_radius: f64,
    /// Fired while the ball centre is inside the fall radius
    on_fall: Actions,
}

impl Zone {
    pub fn new(centre: Point, slope_radius: f64, fall_radius: f64) -> Result<Self, GeometryError> {
        let valid = fall_radius.is_finite()
            && slope_radius.is_finite()
            && fall_radius >= 0.0
            && fall_radius < slope_radius;
        if !valid {
            return Err(GeometryError::InvalidZone {
                slope_radius,
                fall_radius,
            });
        }
        Ok(Self {
            centre,
            slope_radius,
            fall_radius,
            on_fall: no_actions(),
        })
    }

    pub fn on_fall(mut self, actions: Vec<Action>) -> Self {
        self.on_fall = actions.into();
        self
    }

    /// The same zone in screen space
    pub fn to_screen(&self, transform: &Transform) -> Zone {
        let scale = transform.accumulated_scale().abs();
        Zone {
            centre: transform.transform_point(self.centre),
            slope_radius: self.slope_radius * scale,
            fall_radius: self.fall_radius * scale,
            on_fall: actions_to_screen(&self.on_fall, transform),
        }
    }

    /// Pull strength in `[0, 1]` at distance `d` from the centre, or `None`
    /// outside the slope radius
    pub fn falloff(&self, d: f64) -> Option<f64> {
        if d >= self.slope_radius {
            return None;
        }
        if d < self.fall_radius {
            return Some(0.0);
        }
        let frac = 1.0 - (d - self.fall_radius) / (self.slope_radius - self.fall_radius);
        Some(1.0 - (1.0 - frac * frac).sqrt())
    }

    /// The acceleration this zone applies at `p`, pointing at the centre
    pub fn query(&self, p: Point) -> Option<Action> {
        let to_centre = self.centre - p;
        let magnitude = self.falloff(to_centre.length())?;
        Some(Action::Accelerate {
            direction: to_centre.normalize_or_zero(),
            magnitude,
        })
    }

    /// True when `p` is inside the fall radius
    pub fn is_falling(&self, p: Point) -> bool {
        self.centre.distance(p) < self.fall_radius
    }

    pub fn centre(&self) -> Point {
        self.centre
    }

    pub fn slope_radius(&self) -> f64 {
        self.slope_radius
    }

    pub fn fall_radius(&self) -> f64 {
        self.fall_radius
    }

    pub fn fall_actions(&self) -> &Actions {
        &self.on_fall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn magnitude(action: Option<Action>) -> Option<f64> {
        action.map(|a| match a {
            Action::Accelerate { magnitude, .. } => magnitude,
            other => panic!("unexpected {other:?}"),
        })
    }

    #[test]
    fn test_zone_falloff_scenario() {
        let zone = Zone::new(DVec2::ZERO, 3.0, 1.0).expect("valid");

        assert_eq!(magnitude(zone.query(DVec2::ZERO)), Some(0.0));

        let mid = magnitude(zone.query(DVec2::new(2.0, 0.0))).expect("inside slope");
        assert!(mid > 0.0 && mid < 1.0, "got {mid}");

        assert!(zone.query(DVec2::new(3.0, 0.0)).is_none());
        assert!(zone.query(DVec2::new(0.0, -7.5)).is_none());
    }

    #[test]
    fn test_falloff_rises_toward_fall_radius() {
        let zone = Zone::new(DVec2::ZERO, 10.0, 2.0).expect("valid");
        let outer = zone.falloff(9.0).expect("on slope");
        let inner = zone.falloff(3.0).expect("on slope");
        assert!(inner > outer);
        // The pull peaks at the fall radius and drops to nothing inside it
        let edge = zone.falloff(2.0).expect("on slope");
        assert!((edge - 1.0).abs() < 1e-12);
        assert_eq!(zone.falloff(1.999), Some(0.0));
    }

    #[test]
    fn test_direction_points_at_centre() {
        let zone = Zone::new(DVec2::new(10.0, 10.0), 5.0, 1.0).expect("valid");
        match zone.query(DVec2::new(13.0, 10.0)) {
            Some(Action::Accelerate { direction, .. }) => {
                assert!((direction - DVec2::new(-1.0, 0.0)).length() < 1e-12);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_radii() {
        assert!(Zone::new(DVec2::ZERO, 1.0, 1.0).is_err());
        assert!(Zone::new(DVec2::ZERO, 1.0, 2.0).is_err());
        assert!(Zone::new(DVec2::ZERO, 1.0, -0.5).is_err());
        assert!(Zone::new(DVec2::ZERO, f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_to_screen_scales_radii() {
        let mut t = Transform::identity();
        t.translate(5.0, 5.0).scale(2.0);
        let zone = Zone::new(DVec2::new(1.0, 1.0), 3.0, 1.0)
            .expect("valid")
            .on_fall(vec![Action::Teleport(DVec2::new(2.0, 0.0))])
            .to_screen(&t);
        assert_eq!(zone.centre(), DVec2::new(7.0, 7.0));
        assert_eq!(zone.slope_radius(), 6.0);
        assert_eq!(zone.fall_radius(), 2.0);
        assert_eq!(zone.fall_actions()[0], Action::Teleport(DVec2::new(9.0, 5.0)));
        assert!(zone.is_falling(DVec2::new(8.0, 7.0)));
        assert!(!zone.is_falling(DVec2::new(9.5, 7.0)));
    }
}
