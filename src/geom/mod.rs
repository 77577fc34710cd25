//! Plane geometry primitives
//!
//! Everything here is immutable value math apart from [`Transform`], which is
//! built up once per level load and then only read.

pub mod rect;
pub mod segment;
pub mod transform;
pub mod vector;

pub use rect::Rect;
pub use segment::{Segment, line_fractions};
pub use transform::{QuarterTurn, Transform};
pub use vector::{Point, Vec2Ext, Vector};
