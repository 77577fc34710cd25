//! Board contents handed over by the level loader
//!
//! Elements are authored in level units. Building a table turns them into
//! screen-space geometry once per level load (and again on every resize).

pub mod action;
pub mod boundary;
pub mod element;
pub mod level;
pub mod zone;

pub use action::{Action, Actions, BarrierMode, BoundaryId, actions_to_screen, no_actions};
pub use boundary::Boundary;
pub use element::{BoardElement, Decoration};
pub use level::Level;
pub use zone::Zone;
