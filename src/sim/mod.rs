//! Deterministic simulation module
//!
//! Everything that advances per frame lives here:
//! - `topology`: bounce, trigger and zone queries over one table
//! - `state`: the ball, the table and its phase
//! - `tick`: the sub-stepped integrator
//!
//! Given the same table and the same inputs, a tick always produces the same
//! result. There is no rendering or platform dependency in this module.

pub mod state;
pub mod tick;
pub mod topology;

pub use state::{Ball, Phase, Table};
pub use tick::{FrameResult, GameEvent, Outcome, TickInput, tick};
pub use topology::{BounceResult, CrossResult, Topology};
