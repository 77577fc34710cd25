//! Per-frame integrator
//!
//! Advances the ball once per rendered frame. Motion is cut into sub-steps of
//! at most `max_step_px` so a fast ball cannot tunnel through a thin wall, and
//! a frame that keeps bouncing past `max_bounces` is rolled back rather than
//! looping.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::state::{Ball, Phase, Table};
use crate::board::{Action, BoundaryId};
use crate::geom::{Point, Vector};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Device acceleration along the screen axes (m/s²)
    pub tilt: Vector,
}

/// How an attempt ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Win(String),
    Lose(String),
    /// The ball left the table rectangle
    FellOff,
}

impl Outcome {
    pub fn phase(&self) -> Phase {
        match self {
            Outcome::Win(_) => Phase::Won,
            Outcome::Lose(_) => Phase::Lost,
            Outcome::FellOff => Phase::FellOff,
        }
    }
}

/// Side effects for rendering and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Bounced {
        point: Point,
        impact_angle: f64,
        /// Speed after the bounce
        speed: f64,
    },
    Crossed {
        point: Point,
        inward: bool,
    },
    BarrierChanged {
        target: BoundaryId,
        active: bool,
    },
    Teleported {
        to: Point,
    },
    SpeedChanged {
        factor: f64,
    },
}

/// What one tick did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub position: Point,
    pub velocity: Vector,
    pub outcome: Option<Outcome>,
    pub events: Vec<GameEvent>,
    /// Bounces resolved this frame
    pub bounces: u32,
    /// The frame was rolled back after too many bounces
    pub reset: bool,
}

impl FrameResult {
    fn idle(ball: Ball) -> Self {
        Self {
            position: ball.pos,
            velocity: ball.vel,
            outcome: None,
            events: Vec::new(),
            bounces: 0,
            reset: false,
        }
    }
}

/// Working state of the frame being integrated
#[derive(Debug)]
struct Frame {
    pos: Point,
    vel: Vector,
    events: Vec<GameEvent>,
    outcome: Option<Outcome>,
    teleported: bool,
}

impl Frame {
    /// Run an action list in order. A terminal action stops the list.
    fn apply(&mut self, table: &mut Table, actions: &[Action], steer_blend: f64) {
        for action in actions {
            debug!("Action fired: {action:?}");
            match action {
                Action::Accelerate { direction, .. } => {
                    // Soft steer toward the direction, keeping the speed scale
                    let speed = self.vel.length();
                    self.vel = self.vel * (1.0 - steer_blend) + *direction * speed * steer_blend;
                }
                Action::ChangeSpeed(factor) => {
                    self.vel *= *factor;
                    self.events.push(GameEvent::SpeedChanged { factor: *factor });
                }
                Action::Teleport(to) => {
                    self.pos = *to;
                    self.teleported = true;
                    self.events.push(GameEvent::Teleported { to: *to });
                }
                Action::SetBarrier { target, mode } => {
                    if let Some(active) = table.set_barrier(*target, *mode) {
                        self.events.push(GameEvent::BarrierChanged {
                            target: *target,
                            active,
                        });
                    }
                }
                Action::Win(message) => {
                    self.outcome = Some(Outcome::Win(message.clone()));
                    return;
                }
                Action::Lose(message) => {
                    self.outcome = Some(Outcome::Lose(message.clone()));
                    return;
                }
            }
        }
    }
}

/// Shrink each component's magnitude by `amount`, stopping at zero
fn toward_zero(v: Vector, amount: f64) -> Vector {
    let shrink = |c: f64| c.signum() * (c.abs() - amount).max(0.0);
    Vector::new(shrink(v.x), shrink(v.y))
}

/// Fraction of the frame the next sub-step covers, so that starting at `vel`
/// under a constant `accel` the ball moves at most `max_step` pixels
fn step_fraction(vel: Vector, accel: Vector, dt: f64, remaining: f64, max_step: f64) -> f64 {
    let span = dt * remaining;
    let distance = (vel.length() + accel.length() * span) * span;
    if distance > max_step {
        remaining * max_step / distance
    } else {
        remaining
    }
}

/// Advance the table by `elapsed_ms` of real time
pub fn tick(table: &mut Table, input: &TickInput, elapsed_ms: f64) -> FrameResult {
    let start = table.ball;
    if table.phase != Phase::Rolling {
        return FrameResult::idle(start);
    }

    let config = table.config().clone();
    let elapsed_ms = if elapsed_ms.is_finite() {
        elapsed_ms.clamp(0.0, config.max_frame_ms)
    } else {
        0.0
    };
    let dt = elapsed_ms / 1000.0;

    let tilt = if input.tilt.is_finite() {
        input.tilt
    } else {
        Vector::ZERO
    };
    let accel = toward_zero(tilt * config.pixels_per_metre, config.accel_friction);
    let mut frame = Frame {
        pos: start.pos,
        vel: toward_zero(start.vel, config.vel_friction * dt),
        events: Vec::new(),
        outcome: None,
        teleported: false,
    };

    // Fraction of the frame still to simulate
    let mut remaining = 1.0;
    let mut bounces = 0;
    let mut steps = 0;
    let mut fell = false;

    while remaining > 0.0 && frame.outcome.is_none() {
        if steps == config.max_sub_steps {
            warn!("Sub-step cap of {} reached, dropping the rest of the frame", steps);
            break;
        }
        steps += 1;

        let mut step_accel = accel;
        if let Some(Action::Accelerate {
            direction,
            magnitude,
        }) = table.topology().zone(frame.pos)
        {
            step_accel += direction * magnitude * config.zone_accel;
        }

        let fraction = step_fraction(frame.vel, step_accel, dt, remaining, config.max_step_px);
        let step_dt = dt * fraction;
        frame.vel += step_accel * step_dt;
        let target = frame.pos + frame.vel * step_dt;

        match table.topology().reflect(frame.pos, target) {
            None => {
                frame.pos = target;
                remaining -= fraction;
            }
            Some(hit) => {
                bounces += 1;
                if bounces > config.max_bounces {
                    warn!(
                        "More than {} bounces in one frame at ({:.2}, {:.2}), resetting",
                        config.max_bounces, hit.point.x, hit.point.y
                    );
                    table.ball = Ball::at_rest(start.pos);
                    return FrameResult {
                        position: start.pos,
                        velocity: Vector::ZERO,
                        outcome: None,
                        events: frame.events,
                        bounces: config.max_bounces,
                        reset: true,
                    };
                }

                frame.pos = hit.point;
                frame.vel = hit.bounce_velocity(frame.vel);
                remaining -= fraction * hit.fraction;
                frame.events.push(GameEvent::Bounced {
                    point: hit.point,
                    impact_angle: hit.impact_angle,
                    speed: frame.vel.length(),
                });
                frame.apply(table, &hit.actions, config.steer_blend);
            }
        }

        if !fell && frame.outcome.is_none() {
            if let Some(actions) = table.topology().falling(frame.pos).cloned() {
                fell = true;
                debug!("Ball dropped into a zone at ({:.2}, {:.2})", frame.pos.x, frame.pos.y);
                frame.apply(table, &actions, config.steer_blend);
            }
        }
    }

    // Triggers see the whole frame's displacement; a teleport breaks that line
    if frame.outcome.is_none() && !frame.teleported {
        if let Some(cross) = table.topology().intersect(start.pos, frame.pos) {
            debug!(
                "Trigger crossed {} at ({:.2}, {:.2})",
                if cross.inward { "inward" } else { "outward" },
                cross.point.x,
                cross.point.y
            );
            frame.events.push(GameEvent::Crossed {
                point: cross.point,
                inward: cross.inward,
            });
            if cross.inward {
                frame.apply(table, &cross.actions, config.steer_blend);
            }
        }
    }

    if frame.outcome.is_none() && !table.bounds().contains(frame.pos) {
        frame.outcome = Some(Outcome::FellOff);
    }

    table.ball = Ball {
        pos: frame.pos,
        vel: frame.vel,
    };
    if let Some(outcome) = &frame.outcome {
        info!("Attempt over: {outcome:?}");
        table.phase = outcome.phase();
    }

    FrameResult {
        position: frame.pos,
        velocity: frame.vel,
        outcome: frame.outcome,
        events: frame.events,
        bounces,
        reset: false,
    }
}
