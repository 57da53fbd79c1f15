//! Tank Duel - a top-down two-tank arena battle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, ballistics, combat, AI)
//! - `snapshot`: Read-only per-tick views for a rendering collaborator
//! - `audio`: Event-to-sound mapping and loop volume fades (no playback)
//! - `settings`: Shell preferences persisted as JSON

pub mod audio;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::ops::RangeInclusive;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 800.0;

    /// Hull motion envelope
    pub const TANK_MAX_SPEED: f32 = 150.0;
    pub const TANK_ACCELERATION: f32 = 300.0;
    pub const TANK_DECELERATION: f32 = 90.0;
    /// Hull rotation rate under steering input (degrees/sec)
    pub const HULL_TURN_RATE: f32 = 90.0;
    /// Turret rotation rate under input, relative to hull (degrees/sec)
    pub const TURRET_TURN_RATE: f32 = 120.0;

    /// Minimum ticks between shots (2 seconds)
    pub const SHOT_COOLDOWN_TICKS: u64 = 2 * TICK_RATE as u64;
    /// Muzzle flash visibility window (~50 ms)
    pub const FLASH_DURATION_TICKS: u64 = 3;
    /// Backward impulse applied to the firer along the turret axis (negative)
    pub const RECOIL_IMPULSE: f32 = -45.0;
    /// Recoil decay toward zero (px/s per second)
    pub const RECOIL_DECAY: f32 = 90.0;
    /// Shell spawn distance ahead of the turret pivot
    pub const SHELL_OFFSET: f32 = 60.0;
    pub const SHELL_SPEED: f32 = 600.0;
    /// Shell self-destructs after traveling this far
    pub const SHELL_RANGE: f32 = 500.0;

    /// Tank-vs-tank proximity threshold
    pub const TANK_HIT_RADIUS: f32 = 100.0;
    /// Shell-vs-tank hit radius
    pub const SHELL_HIT_RADIUS: f32 = 40.0;
    /// Knockback impulse applied to both tanks on contact
    pub const PUSH_IMPULSE: f32 = 120.0;
    /// Knockback decay toward zero (px/s per second)
    pub const PUSH_DECAY: f32 = 300.0;

    pub const TANK_MAX_HEALTH: u32 = 100;
    /// Damage roll for a direct shell hit
    pub const DIRECT_HIT_DAMAGE: RangeInclusive<u32> = 30..=50;
    /// Damage roll for tank-vs-tank contact
    pub const COLLISION_DAMAGE: RangeInclusive<u32> = 5..=10;

    /// Death animation length (5 seconds)
    pub const DEATH_DURATION_TICKS: u64 = 5 * TICK_RATE as u64;
    /// Interval between death sub-explosions (~100 ms)
    pub const DEATH_BLAST_INTERVAL_TICKS: u64 = TICK_RATE as u64 / 10;
    /// Death sub-explosions scatter within this box around the wreck
    pub const DEATH_BLAST_SPREAD: f32 = 30.0;
    /// Lifetime roll for one death sub-explosion (300-700 ms)
    pub const DEATH_BLAST_LIFETIME_TICKS: RangeInclusive<u64> = 18..=42;

    /// Impact explosion total lifetime (~300 ms)
    pub const EXPLOSION_DURATION_TICKS: u64 = 18;
    /// Impact explosion scale-up window (~200 ms)
    pub const EXPLOSION_GROWTH_TICKS: u64 = 12;

    /// Victory/defeat banner display window before auto-reset (6 seconds,
    /// outlasts the death animation so the wreck finishes burning)
    pub const BANNER_DURATION_TICKS: u64 = 6 * TICK_RATE as u64;

    /// AI hull rotation rate while aligning to a waypoint (degrees/sec)
    pub const AI_TURN_RATE: f32 = 120.0;
    /// Bearing error below which the AI stops turning and drives (degrees)
    pub const AI_ALIGN_THRESHOLD: f32 = 3.0;
    /// Waypoint counts as reached inside this radius
    pub const AI_ARRIVAL_RADIUS: f32 = 50.0;
    /// A fresh waypoint must be at least this far from the tank
    pub const AI_RETARGET_MIN_DIST: f32 = 300.0;
    /// Proportional gain for turret target tracking (fraction of error/sec)
    pub const AI_TURRET_TRACK_RATE: f32 = 3.0;
    /// Ticks between AI shots, re-rolled after each shot (2-5 seconds)
    pub const AI_SHOT_INTERVAL_TICKS: RangeInclusive<u64> = 120..=300;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

/// Unit vector for a heading in degrees (0 = +X, counterclockwise)
#[inline]
pub fn heading_vec(degrees: f32) -> Vec2 {
    let r = degrees.to_radians();
    Vec2::new(r.cos(), r.sin())
}

/// Heading in degrees from one point toward another
///
/// Coincident points yield 0 rather than an undefined angle.
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}
