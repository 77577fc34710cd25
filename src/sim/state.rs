//! Ball and table state
//!
//! A [`Table`] is one level laid out on one screen: the fitted transform, the
//! screen-space elements, the topology built from them, and the ball. It is
//! rebuilt wholesale on load and resize, never mid-frame.

use std::collections::BTreeMap;

use glam::DVec2;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::topology::Topology;
use crate::board::{BarrierMode, BoardElement, BoundaryId, Level};
use crate::consts::BALL_RADIUS;
use crate::error::GeometryError;
use crate::geom::{Point, Rect, Transform, Vector};
use crate::settings::PhysicsConfig;

/// Where the current attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Rolling,
    Won,
    Lost,
    /// Left the table rectangle
    FellOff,
}

/// The ball, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Point,
    pub vel: Vector,
}

impl Ball {
    pub fn at_rest(pos: Point) -> Self {
        Self {
            pos,
            vel: Vector::ZERO,
        }
    }
}

/// Everything derived from a level and a screen size
struct Layout {
    transform: Transform,
    elements: Vec<BoardElement>,
    topology: Topology,
    bounds: Rect,
}

impl Layout {
    fn build(level: &Level, screen: DVec2, config: &PhysicsConfig) -> Result<Self, GeometryError> {
        let sizes_valid = [level.size, screen]
            .iter()
            .all(|s| s.is_finite() && s.x > 0.0 && s.y > 0.0);
        if !sizes_valid {
            return Err(GeometryError::NonInvertibleTransform);
        }

        let transform = Transform::fit(level.size, screen);
        if transform.inverse().is_none() {
            return Err(GeometryError::NonInvertibleTransform);
        }

        let elements = level.build(&transform, BALL_RADIUS)?;
        let mut topology = Topology::build(&elements)?;
        topology.set_bounce_decel(config.bounce_decel);

        Ok(Self {
            bounds: transform.transform_rect(&level.bounds()),
            transform,
            elements,
            topology,
        })
    }
}

/// One level laid out on one screen, plus the ball rolling on it
pub struct Table {
    level: Level,
    config: PhysicsConfig,
    screen: DVec2,
    layout: Layout,
    /// Barrier states changed during play, re-applied after a resize
    barriers: BTreeMap<BoundaryId, bool>,
    pub ball: Ball,
    pub phase: Phase,
}

impl Table {
    /// Fit `level` onto a `screen` of pixels and place the ball at the start
    pub fn load(level: Level, screen: DVec2, config: PhysicsConfig) -> Result<Self, GeometryError> {
        let config = config.validate();
        let layout = Layout::build(&level, screen, &config)?;
        let ball = Ball::at_rest(layout.transform.transform_point(level.start));

        info!(
            "Table loaded: {} elements on a {}x{} screen, scale {:.3}",
            layout.elements.len(),
            screen.x,
            screen.y,
            layout.transform.accumulated_scale()
        );

        Ok(Self {
            level,
            config,
            screen,
            layout,
            barriers: BTreeMap::new(),
            ball,
            phase: Phase::Rolling,
        })
    }

    /// Re-fit to a new screen size, keeping the ball where it was on the level
    pub fn resize(&mut self, screen: DVec2) -> Result<(), GeometryError> {
        let inverse = self
            .layout
            .transform
            .inverse()
            .ok_or(GeometryError::NonInvertibleTransform)?;
        let level_pos = inverse.transform_point(self.ball.pos);
        let level_vel = inverse.transform_vector(self.ball.vel);

        self.layout = Layout::build(&self.level, screen, &self.config)?;
        self.screen = screen;
        for (&target, &active) in &self.barriers {
            let mode = if active { BarrierMode::On } else { BarrierMode::Off };
            self.layout.topology.set_barrier(target, mode);
        }

        let transform = &self.layout.transform;
        self.ball = Ball {
            pos: transform.transform_point(level_pos),
            vel: transform.transform_vector(level_vel),
        };

        info!(
            "Table resized to {}x{}, scale {:.3}, {} barrier overrides",
            screen.x,
            screen.y,
            transform.accumulated_scale(),
            self.barriers.len()
        );
        Ok(())
    }

    /// Ball back to the start at rest, every barrier back on
    pub fn restart(&mut self) {
        for target in std::mem::take(&mut self.barriers).into_keys() {
            self.layout.topology.set_barrier(target, BarrierMode::On);
        }
        self.ball = Ball::at_rest(self.layout.transform.transform_point(self.level.start));
        self.phase = Phase::Rolling;
    }

    /// Switch a boundary's walls and remember the change across resizes
    pub fn set_barrier(&mut self, target: BoundaryId, mode: BarrierMode) -> Option<bool> {
        let active = self.layout.topology.set_barrier(target, mode)?;
        self.barriers.insert(target, active);
        debug!("Barrier {} now {}", target.0, if active { "on" } else { "off" });
        Some(active)
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn screen(&self) -> DVec2 {
        self.screen
    }

    pub fn transform(&self) -> &Transform {
        &self.layout.transform
    }

    /// Screen-space elements for the renderer
    pub fn elements(&self) -> &[BoardElement] {
        &self.layout.elements
    }

    pub fn topology(&self) -> &Topology {
        &self.layout.topology
    }

    /// The table rectangle on screen; leaving it ends the attempt
    pub fn bounds(&self) -> Rect {
        self.layout.bounds
    }

    /// Ball radius in screen pixels
    pub fn ball_radius(&self) -> f64 {
        BALL_RADIUS * self.layout.transform.accumulated_scale()
    }
}
