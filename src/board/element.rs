//! Tagged board elements
//!
//! Only boundaries and zones take part in physics; decorations are forwarded to
//! the renderer untouched apart from the screen transform.

use serde::{Deserialize, Serialize};

use super::boundary::Boundary;
use super::zone::Zone;
use crate::error::GeometryError;
use crate::geom::{Rect, Transform};

/// Purely visual content (sprites, text) placed on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub layout: Rect,
    #[serde(default)]
    pub label: Option<String>,
}

impl Decoration {
    pub fn to_screen(&self, transform: &Transform) -> Decoration {
        Decoration {
            layout: transform.transform_rect(&self.layout),
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum BoardElement {
    Boundary(Boundary),
    Zone(Zone),
    Decoration(Decoration),
}

impl BoardElement {
    /// Screen-space copy of this element; boundaries are finished on the way
    pub fn to_screen(&self, transform: &Transform, ball_radius: f64) -> Result<BoardElement, GeometryError> {
        Ok(match self {
            BoardElement::Boundary(boundary) => {
                let mut boundary = boundary.clone();
                boundary.finish(transform, ball_radius)?;
                BoardElement::Boundary(boundary)
            }
            BoardElement::Zone(zone) => BoardElement::Zone(zone.to_screen(transform)),
            BoardElement::Decoration(decoration) => {
                BoardElement::Decoration(decoration.to_screen(transform))
            }
        })
    }

    /// True for the variants the topology indexes
    pub fn is_geometry(&self) -> bool {
        !matches!(self, BoardElement::Decoration(_))
    }
}

impl From<Boundary> for BoardElement {
    fn from(boundary: Boundary) -> Self {
        BoardElement::Boundary(boundary)
    }
}

impl From<Zone> for BoardElement {
    fn from(zone: Zone) -> Self {
        BoardElement::Zone(zone)
    }
}

impl From<Decoration> for BoardElement {
    fn from(decoration: Decoration) -> Self {
        BoardElement::Decoration(decoration)
    }
}
