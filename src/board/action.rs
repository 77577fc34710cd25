//! Action records attached to board geometry
//!
//! Actions are authored with the level, attached to boundaries and zones when
//! the table is built, and handed to the integrator when geometry fires.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Transform, Vector};

/// Identifies a boundary so actions can target it (barrier toggles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoundaryId(pub u32);

/// How a `SetBarrier` action changes its target's walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierMode {
    On,
    Off,
    Toggle,
}

impl BarrierMode {
    /// New barrier state given the current one
    pub fn apply(self, active: bool) -> bool {
        match self {
            BarrierMode::On => true,
            BarrierMode::Off => false,
            BarrierMode::Toggle => !active,
        }
    }
}

/// Something that happens to the ball or the board when geometry fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Push toward `direction`. From a zone this is a continuous pull scaled by
    /// `magnitude`; from a line it steers the ball's velocity.
    Accelerate { direction: Vector, magnitude: f64 },
    /// Multiply velocity by a factor
    ChangeSpeed(f64),
    /// Move the ball outright
    Teleport(Point),
    /// Switch the walls of another boundary on or off
    SetBarrier { target: BoundaryId, mode: BarrierMode },
    Win(String),
    Lose(String),
}

impl Action {
    /// Re-express level-unit parameters in screen space
    pub fn to_screen(&self, transform: &Transform) -> Action {
        match self {
            Action::Accelerate {
                direction,
                magnitude,
            } => Action::Accelerate {
                direction: transform.transform_vector(*direction).normalize_or_zero(),
                magnitude: *magnitude,
            },
            Action::Teleport(target) => Action::Teleport(transform.transform_point(*target)),
            other => other.clone(),
        }
    }

    /// Win and Lose end the attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::Win(_) | Action::Lose(_))
    }
}

/// An ordered action list shared by every segment derived from one boundary
pub type Actions = Arc<[Action]>;

/// Empty action list
pub fn no_actions() -> Actions {
    Arc::new([])
}

/// Convert a list of level-unit actions to a shared screen-space list
pub fn actions_to_screen(actions: &[Action], transform: &Transform) -> Actions {
    actions.iter().map(|a| a.to_screen(transform)).collect()
}
