//! Spatial queries over one built table
//!
//! The topology flattens every wall boundary's effective outline into one list
//! of bounce candidates, every trigger boundary's outline into a list of
//! crossing candidates, and keeps the zones in insertion order. It is rebuilt
//! wholesale whenever the level or the screen changes.

use log::{debug, info, warn};

use crate::board::{Action, Actions, BarrierMode, BoardElement, BoundaryId, Zone};
use crate::consts::{BOUNCE_DECEL, NUDGE};
use crate::error::GeometryError;
use crate::geom::{Point, Rect, Segment, Vec2Ext, Vector, line_fractions};
use crate::wrap_degrees;

/// First wall contact along a motion segment
#[derive(Debug, Clone)]
pub struct BounceResult {
    /// Contact point, nudged off the wall toward the side the ball came from
    pub point: Point,
    /// Fraction of the motion consumed before contact
    pub fraction: f64,
    /// Unconsumed motion mirrored about the wall
    pub reflected: Vector,
    /// Wall direction (unit)
    pub wall_direction: Vector,
    /// Wall normal facing the side the ball came from (unit)
    pub normal: Vector,
    /// Angle between the bounce and the wall, 0 (grazing) to 90 (head-on) degrees
    pub impact_angle: f64,
    /// Factor the ball's speed is multiplied by
    pub speed_factor: f64,
    /// Index into [`Topology::walls`]
    pub wall: usize,
    pub actions: Actions,
}

impl BounceResult {
    /// Mirror a velocity about the wall that was hit and apply the energy loss
    pub fn bounce_velocity(&self, velocity: Vector) -> Vector {
        mirror(velocity, self.wall_direction) * self.speed_factor
    }
}

/// A motion segment crossing a trigger line
#[derive(Debug, Clone)]
pub struct CrossResult {
    pub point: Point,
    pub fraction: f64,
    /// Crossed from the trigger's left side to its right side
    pub inward: bool,
    /// Index into [`Topology::triggers`]
    pub trigger: usize,
    pub actions: Actions,
}

/// Walls, triggers and zones of one table, in screen space
#[derive(Debug, Clone, Default)]
pub struct Topology {
    walls: Vec<Segment>,
    triggers: Vec<Segment>,
    zones: Vec<Zone>,
    bounce_decel: f64,
}

impl Topology {
    /// Index finished screen-space elements. Decorations are skipped.
    pub fn build(elements: &[BoardElement]) -> Result<Self, GeometryError> {
        let mut topology = Topology {
            bounce_decel: BOUNCE_DECEL,
            ..Default::default()
        };

        for element in elements {
            match element {
                BoardElement::Boundary(boundary) => {
                    if !boundary.is_finished() {
                        return Err(GeometryError::NotFinished {
                            boundary: boundary.id(),
                        });
                    }
                    if boundary.is_wall() {
                        topology.walls.extend(boundary.effective_outline().iter().cloned());
                    }
                    if boundary.is_trigger() {
                        topology
                            .triggers
                            .extend(boundary.effective_outline().iter().cloned());
                    }
                }
                BoardElement::Zone(zone) => topology.zones.push(zone.clone()),
                BoardElement::Decoration(_) => {}
            }
        }

        info!(
            "Topology built: {} wall segments, {} trigger segments, {} zones",
            topology.walls.len(),
            topology.triggers.len(),
            topology.zones.len()
        );
        Ok(topology)
    }

    /// Fraction of speed lost on a head-on bounce
    pub fn set_bounce_decel(&mut self, decel: f64) {
        self.bounce_decel = decel;
    }

    /// Acceleration from the first zone (in insertion order) covering `p`
    pub fn zone(&self, p: Point) -> Option<Action> {
        self.zones.iter().find_map(|z| z.query(p))
    }

    /// Fall actions of the first zone whose fall radius contains `p`
    pub fn falling(&self, p: Point) -> Option<&Actions> {
        self.zones
            .iter()
            .find(|z| !z.fall_actions().is_empty() && z.is_falling(p))
            .map(|z| z.fall_actions())
    }

    /// Closest wall contact along the motion from `start` to `end`
    pub fn reflect(&self, start: Point, end: Point) -> Option<BounceResult> {
        let motion = end - start;
        let motion_box = Rect::from_corners(start, end);

        let mut best: Option<(usize, f64)> = None;
        for (index, wall) in self.walls.iter().enumerate() {
            if !wall.barrier_active() || !wall.bbox().intersects(&motion_box) {
                continue;
            }
            let Some(t) = contact_fraction(start, motion, wall) else {
                continue;
            };
            // Only the first physical contact counts
            if best.is_none_or(|(_, best_t)| t < best_t) {
                best = Some((index, t));
            }
        }

        let (index, fraction) = best?;
        let wall = &self.walls[index];
        let along = wall.unit();
        let hit = start + motion * fraction;

        let mut normal = along.left_normal();
        if normal.dot(motion) > 0.0 {
            normal = -normal;
        }

        let remainder = end - hit;
        let mut reflected = mirror(remainder, along);
        if reflected.length_squared() == 0.0 {
            // Stopped dead on the wall: step off it so the next frame can move
            reflected = normal * NUDGE;
        }

        // Mirroring keeps the angle to the wall, so measure it on the incoming motion
        let raw = motion.angle_from(along).abs();
        let impact_angle = if raw > 90.0 { 180.0 - raw } else { raw };
        let speed_factor = 1.0 - impact_angle.to_radians().sin() * self.bounce_decel;

        debug!(
            "Bounce on wall {index} at ({:.2}, {:.2}), impact {impact_angle:.1}°",
            hit.x, hit.y
        );

        Some(BounceResult {
            point: hit + normal * NUDGE,
            fraction,
            reflected,
            wall_direction: along,
            normal,
            impact_angle,
            speed_factor,
            wall: index,
            actions: wall.on_bounce().clone(),
        })
    }

    /// First trigger line the motion from `start` to `end` crosses
    pub fn intersect(&self, start: Point, end: Point) -> Option<CrossResult> {
        let motion = end - start;
        let motion_box = Rect::from_corners(start, end);

        self.triggers.iter().enumerate().find_map(|(index, trigger)| {
            if !trigger.barrier_active() || !trigger.bbox().intersects(&motion_box) {
                return None;
            }
            let fraction = contact_fraction(start, motion, trigger)?;
            let delta = wrap_degrees(motion.angle() - trigger.angle());
            Some(CrossResult {
                point: start + motion * fraction,
                fraction,
                inward: delta < 180.0,
                trigger: index,
                actions: trigger.on_cross().clone(),
            })
        })
    }

    /// Switch every segment derived from `target`. Returns the new state, or
    /// `None` when no wall or trigger belongs to `target`.
    pub fn set_barrier(&mut self, target: BoundaryId, mode: BarrierMode) -> Option<bool> {
        let current = self.barrier_state(target)?;
        let active = mode.apply(current);
        for segment in self.walls.iter_mut().chain(self.triggers.iter_mut()) {
            if segment.owner() == Some(target) {
                segment.set_barrier_active(active);
            }
        }
        Some(active)
    }

    /// Current barrier flag of `target`'s segments
    pub fn barrier_state(&self, target: BoundaryId) -> Option<bool> {
        let state = self
            .walls
            .iter()
            .chain(self.triggers.iter())
            .find(|s| s.owner() == Some(target))
            .map(Segment::barrier_active);
        if state.is_none() {
            warn!("No barrier segments belong to boundary {}", target.0);
        }
        state
    }

    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn triggers(&self) -> &[Segment] {
        &self.triggers
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }
}

/// Fraction along `motion` where it meets `segment`, if both fractions lie in `[0, 1]`
fn contact_fraction(start: Point, motion: Vector, segment: &Segment) -> Option<f64> {
    let (t, u) = line_fractions(start, motion, segment.start(), segment.delta())?;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t)
}

/// Mirror `v` about a line with unit direction `along`: `2·a·(v·a) − v`
#[inline]
fn mirror(v: Vector, along: Vector) -> Vector {
    2.0 * along * v.dot(along) - v
}
