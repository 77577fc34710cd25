//! Construction-time geometry errors
//!
//! Only board construction can fail. Numerical edge cases met during play are
//! resolved locally by the simulation and never surface as errors.

use std::fmt;

use crate::board::BoundaryId;

/// Reasons a level's geometry is rejected before play starts
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A boundary needs at least three outline points
    TooFewPoints { boundary: BoundaryId, count: usize },
    /// Two consecutive outline points coincide in screen space
    ZeroLengthEdge { boundary: BoundaryId, index: usize },
    /// Zone radii must satisfy `0 <= fall < slope`
    InvalidZone { slope_radius: f64, fall_radius: f64 },
    /// The effective outline was requested before `finish()`
    NotFinished { boundary: BoundaryId },
    /// The level-to-screen transform collapsed (zero or non-finite scale)
    NonInvertibleTransform,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::TooFewPoints { boundary, count } => write!(
                f,
                "boundary {} has {} outline points, at least 3 are required",
                boundary.0, count
            ),
            GeometryError::ZeroLengthEdge { boundary, index } => write!(
                f,
                "boundary {} has a zero-length edge ending at point {}",
                boundary.0, index
            ),
            GeometryError::InvalidZone {
                slope_radius,
                fall_radius,
            } => write!(
                f,
                "zone fall radius {fall_radius} must be non-negative and smaller than slope radius {slope_radius}"
            ),
            GeometryError::NotFinished { boundary } => {
                write!(f, "boundary {} was used before finish()", boundary.0)
            }
            GeometryError::NonInvertibleTransform => {
                write!(f, "level-to-screen transform is not invertible")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
