//! A parsed level, as the loader hands it over

use glam::DVec2;

use super::element::BoardElement;
use crate::consts::{LEVEL_HEIGHT, LEVEL_WIDTH};
use crate::error::GeometryError;
use crate::geom::{Point, Rect, Transform};

/// Level contents in level units
#[derive(Debug, Clone)]
pub struct Level {
    /// Logical size the level was authored at
    pub size: DVec2,
    /// Where the ball starts
    pub start: Point,
    pub elements: Vec<BoardElement>,
}

impl Level {
    /// Empty level of the standard logical size
    pub fn new(start: Point) -> Self {
        Self {
            size: DVec2::new(LEVEL_WIDTH, LEVEL_HEIGHT),
            start,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<BoardElement>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    /// The whole table in level units
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }

    /// Screen-space copies of every element, with boundaries finished
    pub fn build(&self, transform: &Transform, ball_radius: f64) -> Result<Vec<BoardElement>, GeometryError> {
        self.elements
            .iter()
            .map(|e| e.to_screen(transform, ball_radius))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Boundary, BoundaryId, Zone};

    #[test]
    fn test_build_propagates_errors() {
        let mut level = Level::new(DVec2::new(10.0, 10.0));
        level
            .push(Zone::new(DVec2::new(50.0, 50.0), 10.0, 4.0).expect("valid"))
            .push(Boundary::from_points(BoundaryId(2), [DVec2::ZERO, DVec2::X]));
        let err = level.build(&Transform::identity(), 1.0).unwrap_err();
        assert_eq!(
            err,
            GeometryError::TooFewPoints {
                boundary: BoundaryId(2),
                count: 2
            }
        );
    }

    #[test]
    fn test_bounds() {
        let level = Level::new(DVec2::ZERO);
        assert_eq!(level.bounds(), Rect::new(0.0, 0.0, LEVEL_WIDTH, LEVEL_HEIGHT));
        assert!(level.elements.is_empty());
    }
}
