//! Physics tuning
//!
//! Every value defaults to the matching constant in [`crate::consts`]. Hosts can
//! override any subset from a JSON document.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Integrator tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // === Tilt ===
    /// Screen pixels per metre of device acceleration
    pub pixels_per_metre: f64,
    /// Dead-zone subtracted from tilt acceleration (pixels/s²)
    pub accel_friction: f64,

    // === Motion ===
    /// Rolling friction per velocity component (pixels/s per second)
    pub vel_friction: f64,
    /// Fraction of speed lost on a head-on bounce (0.0 - 1.0)
    pub bounce_decel: f64,
    /// Bounces resolved in one frame before it is rolled back
    pub max_bounces: u32,
    /// Largest distance (pixels) covered by one sub-step
    pub max_step_px: f64,
    /// Zone pull at full falloff (pixels/s²)
    pub zone_accel: f64,
    /// Weight of the steering blend for line Accelerate actions (0.0 - 1.0)
    pub steer_blend: f64,

    // === Frame limits ===
    /// Elapsed time per tick is clamped to this (ms)
    pub max_frame_ms: f64,
    /// Hard cap on sub-steps per tick
    pub max_sub_steps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            // Tilt
            pixels_per_metre: PIXELS_PER_METRE,
            accel_friction: ACCEL_FRICTION,

            // Motion
            vel_friction: VEL_FRICTION,
            bounce_decel: BOUNCE_DECEL,
            max_bounces: MAX_BOUNCES,
            max_step_px: MAX_STEP_PX,
            zone_accel: ZONE_ACCEL,
            steer_blend: STEER_BLEND,

            // Frame limits
            max_frame_ms: MAX_FRAME_MS,
            max_sub_steps: MAX_SUB_STEPS,
        }
    }
}

impl PhysicsConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    /// The result is validated.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        Ok(config.validate())
    }

    /// Clamp values that would stall or destabilise the integrator
    pub fn validate(mut self) -> Self {
        let defaults = Self::default();

        let positive = |value: f64, fallback: f64, name: &str| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                log::warn!("Invalid {name} {value}, using {fallback}");
                fallback
            }
        };
        let non_negative = |value: f64, name: &str| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                log::warn!("Invalid {name} {value}, using 0");
                0.0
            }
        };

        self.pixels_per_metre = non_negative(self.pixels_per_metre, "pixels_per_metre");
        self.accel_friction = non_negative(self.accel_friction, "accel_friction");
        self.vel_friction = non_negative(self.vel_friction, "vel_friction");
        self.zone_accel = non_negative(self.zone_accel, "zone_accel");
        self.max_step_px = positive(self.max_step_px, defaults.max_step_px, "max_step_px");
        self.max_frame_ms = positive(self.max_frame_ms, defaults.max_frame_ms, "max_frame_ms");

        self.bounce_decel = non_negative(self.bounce_decel, "bounce_decel").min(1.0);
        self.steer_blend = non_negative(self.steer_blend, "steer_blend").min(1.0);

        self.max_bounces = self.max_bounces.max(1);
        self.max_sub_steps = self.max_sub_steps.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = PhysicsConfig::default();
        assert_eq!(config.bounce_decel, 0.4);
        assert_eq!(config.max_bounces, 5);
        assert_eq!(config.steer_blend, 0.15);
        assert_eq!(config.max_step_px, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PhysicsConfig::from_json(r#"{ "vel_friction": 10.0, "max_bounces": 3 }"#)
            .expect("valid json");
        assert_eq!(config.vel_friction, 10.0);
        assert_eq!(config.max_bounces, 3);
        assert_eq!(config.zone_accel, ZONE_ACCEL);
    }

    #[test]
    fn test_validate_clamps() {
        let config = PhysicsConfig::from_json(
            r#"{ "bounce_decel": 3.0, "max_step_px": -1.0, "max_bounces": 0, "vel_friction": -5.0 }"#,
        )
        .expect("valid json");
        assert_eq!(config.bounce_decel, 1.0);
        assert_eq!(config.max_step_px, MAX_STEP_PX);
        assert_eq!(config.max_bounces, 1);
        assert_eq!(config.vel_friction, 0.0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(PhysicsConfig::from_json("{ not json").is_err());
        assert!(PhysicsConfig::from_json(r#"{ "max_bounces": "five" }"#).is_err());
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = PhysicsConfig {
            zone_accel: 1200.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(PhysicsConfig::from_json(&json).expect("parse"), config);
    }
}
