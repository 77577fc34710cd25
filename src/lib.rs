//! Tilt Table - level geometry and ball collision for a tilt-controlled rolling-ball game
//!
//! Core modules:
//! - `geom`: Points, vectors, rectangles, quarter-turn transforms and line segments
//! - `board`: Level elements (boundaries, gravity zones, decorations) and their actions
//! - `sim`: Topology queries and the per-frame integrator
//! - `settings`: Data-driven physics tuning
//!
//! Rendering, audio, persistence and level parsing are collaborators outside
//! this crate. They hand over a [`board::Level`] already expressed in level
//! units and consume the [`sim::FrameResult`] returned by every tick.
//!
//! All coordinates are screen-style: x grows right, y grows down. Angles are in
//! degrees, measured with `atan2(y, x)`, so a positive angle turns clockwise on
//! screen.

pub mod board;
pub mod error;
pub mod geom;
pub mod settings;
pub mod sim;

pub use error::GeometryError;
pub use settings::PhysicsConfig;

/// Game configuration constants
pub mod consts {
    /// Logical level size (level units); the fit transform maps this onto the screen
    pub const LEVEL_WIDTH: f64 = 320.0;
    pub const LEVEL_HEIGHT: f64 = 480.0;

    /// Ball radius in level units
    pub const BALL_RADIUS: f64 = 8.0;

    /// Angular step used when rounding convex corners of an effective outline
    pub const CORNER_SEG_DEG: f64 = 30.0;
    /// Default chord count for circle approximations (one chord per corner step)
    pub const CIRCLE_SEGMENTS: usize = 12;

    /// Screen pixels per metre of tilt acceleration
    pub const PIXELS_PER_METRE: f64 = 150.0;
    /// Dead-zone subtracted from tilt acceleration (pixels/s²)
    pub const ACCEL_FRICTION: f64 = 60.0;
    /// Rolling friction subtracted from each velocity component (pixels/s per second)
    pub const VEL_FRICTION: f64 = 40.0;
    /// Fraction of speed lost on a head-on bounce
    pub const BOUNCE_DECEL: f64 = 0.4;
    /// Bounces resolved per frame before the frame is rolled back
    pub const MAX_BOUNCES: u32 = 5;
    /// Largest distance (pixels) the ball may travel in one sub-step
    pub const MAX_STEP_PX: f64 = 1.0;
    /// Peak pull of a gravity zone (pixels/s²) at full falloff magnitude
    pub const ZONE_ACCEL: f64 = 900.0;
    /// Weight of the steering blend applied by an Accelerate action on a line
    pub const STEER_BLEND: f64 = 0.15;
    /// Longest frame the integrator will simulate in one tick (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Hard cap on sub-steps per frame
    pub const MAX_SUB_STEPS: u32 = 2000;

    /// Distance a bounce point is pushed off its wall
    pub const NUDGE: f64 = 1e-7;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f64) -> f64 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-450.0), -90.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert!(wrap_degrees(-1e-20) < 360.0);
    }
}
