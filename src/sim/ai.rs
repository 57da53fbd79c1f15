//! Autonomous tank controller
//!
//! A simple seek/aim/fire loop: drive toward a random waypoint, keep the
//! turret tracking the foe, and fire on a re-rolled random interval. Firing
//! is permissive - the turret does not need to be on target.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{bearing, normalize_angle};

use super::projectile::Projectile;
use super::tank::Tank;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiController {
    /// Current navigation waypoint
    pub target: Vec2,
    /// Earliest tick the next shot is allowed
    pub next_shot_at: u64,
}

impl AiController {
    pub fn new(rng: &mut Pcg32, arena: Vec2, tank_pos: Vec2, now: u64) -> Self {
        Self {
            target: pick_target(rng, arena, tank_pos),
            next_shot_at: now + rng.random_range(AI_SHOT_INTERVAL_TICKS),
        }
    }

    /// Run one tick of the decision loop for `tank` against a foe at
    /// `foe_pos`. May emit a shell.
    pub fn think(
        &mut self,
        tank: &mut Tank,
        foe_pos: Vec2,
        now: u64,
        dt: f32,
        arena: Vec2,
        rng: &mut Pcg32,
    ) -> Option<Projectile> {
        if drive_toward(tank, self.target, dt) {
            self.target = pick_target(rng, arena, tank.pos);
        }
        aim_turret(tank, foe_pos, dt);

        if tank.health > 0 && now >= self.next_shot_at {
            if let Some(shell) = tank.fire(now) {
                self.next_shot_at = now + rng.random_range(AI_SHOT_INTERVAL_TICKS);
                return Some(shell);
            }
        }
        None
    }
}

/// Rotate toward the waypoint until roughly aligned, then accelerate.
/// Returns true once the tank is within the arrival radius.
pub fn drive_toward(tank: &mut Tank, target: Vec2, dt: f32) -> bool {
    if tank.health == 0 {
        tank.coast(dt);
        return false;
    }

    let diff = normalize_angle(bearing(tank.pos, target) - tank.hull_heading);
    if diff.abs() > AI_ALIGN_THRESHOLD {
        tank.hull_heading += AI_TURN_RATE * dt * diff.signum();
        return false;
    }

    tank.speed = (tank.speed + TANK_ACCELERATION * dt).min(TANK_MAX_SPEED);
    tank.pos.distance(target) < AI_ARRIVAL_RADIUS
}

/// Proportional turret tracking: close a fixed fraction of the bearing error
/// per second, which gives the turret visible lead/lag instead of a snap.
pub fn aim_turret(tank: &mut Tank, target: Vec2, dt: f32) {
    if tank.health == 0 {
        return;
    }
    let error = normalize_angle(bearing(tank.pos, target) - tank.turret_absolute());
    tank.turret_heading += error * AI_TURRET_TRACK_RATE * dt;
}

/// Sample a waypoint at least AI_RETARGET_MIN_DIST from the tank.
/// Bounded resampling so a degenerate arena cannot spin forever.
fn pick_target(rng: &mut Pcg32, arena: Vec2, tank_pos: Vec2) -> Vec2 {
    let mut candidate = Vec2::ZERO;
    for _ in 0..32 {
        candidate = Vec2::new(
            rng.random_range(0.0..arena.x),
            rng.random_range(0.0..arena.y),
        );
        if candidate.distance(tank_pos) >= AI_RETARGET_MIN_DIST {
            break;
        }
    }
    candidate
}
