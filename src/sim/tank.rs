//! Tank kinematics, combat, and the death sequence
//!
//! A tank integrates three independent displacement sources each tick: drive
//! along the hull axis, recoil along the turret axis, and knockback along a
//! stored push direction. Recoil and push are transient impulses that decay
//! toward zero and never cross it.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_vec;

use super::projectile::Projectile;

/// Throttle control for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Throttle {
    #[default]
    Coast,
    Forward,
    Reverse,
}

/// Steering control for one tick (hull or turret)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    #[default]
    Neutral,
    /// Counterclockwise (+degrees)
    Left,
    /// Clockwise (-degrees)
    Right,
}

impl Steer {
    fn sign(self) -> f32 {
        match self {
            Steer::Neutral => 0.0,
            Steer::Left => 1.0,
            Steer::Right => -1.0,
        }
    }
}

/// Derived life state; not stored, so it can never disagree with health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    /// Health hit zero, death animation running
    Dying,
    /// Death animation finished; the wreck is inert
    Dead,
}

/// One sub-explosion of a death animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathBlast {
    pub pos: Vec2,
    pub spawned: u64,
    /// Lifetime in ticks, rolled per blast
    pub lifetime: u64,
    /// Randomized sprite rotation in degrees
    pub rotation: f32,
}

impl DeathBlast {
    pub fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.spawned) >= self.lifetime
    }
}

/// One combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub pos: Vec2,
    /// Hull heading in degrees, unbounded (wraps implicitly via trig)
    pub hull_heading: f32,
    /// Turret heading in degrees relative to the hull, unbounded
    pub turret_heading: f32,
    /// Signed drive speed along the hull axis, |speed| <= TANK_MAX_SPEED
    pub speed: f32,
    /// Recoil impulse along the turret axis, always <= 0
    pub recoil_speed: f32,
    /// Knockback magnitude, always >= 0
    pub push_speed: f32,
    pub push_dir: Option<Vec2>,
    pub health: u32,
    pub dying: bool,
    pub death_started: u64,
    /// Next tick a death sub-explosion is due
    pub next_blast_at: u64,
    /// Tick of the last shot; None until the first shot
    pub last_shot: Option<u64>,
    /// Muzzle flash shows while now < flash_until
    pub flash_until: u64,
    pub blasts: Vec<DeathBlast>,
}

impl Tank {
    pub fn new(pos: Vec2, hull_heading: f32) -> Self {
        Self {
            pos,
            hull_heading,
            turret_heading: 0.0,
            speed: 0.0,
            recoil_speed: 0.0,
            push_speed: 0.0,
            push_dir: None,
            health: TANK_MAX_HEALTH,
            dying: false,
            death_started: 0,
            next_blast_at: 0,
            last_shot: None,
            flash_until: 0,
            blasts: Vec::new(),
        }
    }

    /// Absolute turret heading (firing axis) in degrees
    pub fn turret_absolute(&self) -> f32 {
        self.hull_heading + self.turret_heading
    }

    pub fn flash_active(&self, now: u64) -> bool {
        now < self.flash_until
    }

    pub fn life_state(&self) -> LifeState {
        if self.health > 0 {
            LifeState::Alive
        } else if self.dying {
            LifeState::Dying
        } else {
            LifeState::Dead
        }
    }

    /// Apply one tick of control input. May emit a new shell.
    pub fn apply_controls(
        &mut self,
        throttle: Throttle,
        steer: Steer,
        turret_steer: Steer,
        fire: bool,
        now: u64,
        dt: f32,
    ) -> Option<Projectile> {
        let alive = self.health > 0;

        match throttle {
            Throttle::Forward if alive => {
                self.speed = (self.speed + TANK_ACCELERATION * dt).min(TANK_MAX_SPEED);
            }
            Throttle::Reverse if alive => {
                self.speed = (self.speed - TANK_ACCELERATION * dt).max(-TANK_MAX_SPEED);
            }
            _ => self.coast(dt),
        }

        if alive {
            self.hull_heading += HULL_TURN_RATE * dt * steer.sign();
            self.turret_heading += TURRET_TURN_RATE * dt * turret_steer.sign();
        }

        if fire { self.fire(now) } else { None }
    }

    /// Decay drive speed toward zero without overshooting past it
    pub(crate) fn coast(&mut self, dt: f32) {
        if self.speed > 0.0 {
            self.speed = (self.speed - TANK_DECELERATION * dt).max(0.0);
        } else if self.speed < 0.0 {
            self.speed = (self.speed + TANK_DECELERATION * dt).min(0.0);
        }
    }

    /// Attempt a shot. Gated on health and the shot cooldown; on success
    /// records the shot, arms the muzzle flash, kicks recoil, and returns the
    /// shell spawned ahead of the turret.
    pub fn fire(&mut self, now: u64) -> Option<Projectile> {
        if self.health == 0 {
            return None;
        }
        if let Some(last) = self.last_shot
            && now.saturating_sub(last) < SHOT_COOLDOWN_TICKS
        {
            return None;
        }

        self.last_shot = Some(now);
        self.flash_until = now + FLASH_DURATION_TICKS;
        self.recoil_speed = RECOIL_IMPULSE;

        let axis = self.turret_absolute();
        let muzzle = self.pos + heading_vec(axis) * SHELL_OFFSET;
        Some(Projectile::new(muzzle, axis, self.speed, self.hull_heading))
    }

    /// Integrate one tick of motion: drive + recoil + push, then wrap, then
    /// decay the transient impulses.
    pub fn advance(&mut self, dt: f32, arena: Vec2) {
        self.pos += heading_vec(self.hull_heading) * (self.speed * dt);
        self.pos += heading_vec(self.turret_absolute()) * (self.recoil_speed * dt);
        if let Some(dir) = self.push_dir {
            self.pos += dir * (self.push_speed * dt);
        }

        // Screen wrap: one bound check per axis, no clamping, no bounce
        if self.pos.x > arena.x {
            self.pos.x = 0.0;
        } else if self.pos.x < 0.0 {
            self.pos.x = arena.x;
        }
        if self.pos.y > arena.y {
            self.pos.y = 0.0;
        } else if self.pos.y < 0.0 {
            self.pos.y = arena.y;
        }

        self.push_speed = (self.push_speed - PUSH_DECAY * dt).max(0.0);
        if self.push_speed == 0.0 {
            self.push_dir = None;
        }
        self.recoil_speed = (self.recoil_speed + RECOIL_DECAY * dt).min(0.0);
    }

    /// Set the knockback state. Overwrites any push in progress.
    pub fn apply_push(&mut self, direction: Vec2, strength: f32) {
        self.push_dir = Some(direction);
        self.push_speed = strength;
    }

    /// Direct shell hit. Returns the damage rolled.
    pub fn take_direct_hit(&mut self, rng: &mut Pcg32, now: u64) -> u32 {
        let damage = rng.random_range(DIRECT_HIT_DAMAGE);
        self.apply_damage(damage, now);
        damage
    }

    /// Tank-vs-tank contact damage. Returns the damage rolled.
    pub fn take_collision_damage(&mut self, rng: &mut Pcg32, now: u64) -> u32 {
        let damage = rng.random_range(COLLISION_DAMAGE);
        self.apply_damage(damage, now);
        damage
    }

    /// Zero health and enter the death sequence, for the mutual-destruction
    /// rule. No-op on a tank already dying or already a wreck. Returns
    /// whether this call made the kill.
    pub fn force_destroy(&mut self, now: u64) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health = 0;
        self.start_death(now);
        true
    }

    fn apply_damage(&mut self, damage: u32, now: u64) {
        // A wreck absorbs nothing further; the dying flag is set exactly
        // once per life
        if self.health == 0 {
            return;
        }
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.start_death(now);
        }
    }

    fn start_death(&mut self, now: u64) {
        if self.dying {
            return;
        }
        self.dying = true;
        self.death_started = now;
        self.next_blast_at = now + DEATH_BLAST_INTERVAL_TICKS;
    }

    /// Advance the death animation: spawn one sub-explosion each interval,
    /// prune expired ones, and fall to the terminal state once the window
    /// elapses.
    pub fn update_death(&mut self, now: u64, rng: &mut Pcg32) {
        if !self.dying {
            return;
        }
        if now.saturating_sub(self.death_started) > DEATH_DURATION_TICKS {
            self.dying = false;
            self.blasts.clear();
            return;
        }

        if now >= self.next_blast_at {
            self.next_blast_at = now + DEATH_BLAST_INTERVAL_TICKS;
            let offset = Vec2::new(
                rng.random_range(-DEATH_BLAST_SPREAD..=DEATH_BLAST_SPREAD),
                rng.random_range(-DEATH_BLAST_SPREAD..=DEATH_BLAST_SPREAD),
            );
            self.blasts.push(DeathBlast {
                pos: self.pos + offset,
                spawned: now,
                lifetime: rng.random_range(DEATH_BLAST_LIFETIME_TICKS),
                rotation: rng.random_range(0.0..360.0),
            });
        }

        self.blasts.retain(|b| !b.expired(now));
    }
}
