//! Match state and core simulation types
//!
//! Everything needed to replay or continue a match deterministically lives
//! here, including the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::ai::AiController;
use super::projectile::Projectile;
use super::tank::Tank;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active combat
    Playing,
    /// Opponent destroyed; banner shows until the display window elapses
    Victory { since: u64 },
    /// Player destroyed; banner shows until the display window elapses
    Defeat { since: u64 },
}

/// Identifies one of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankId {
    Player,
    Enemy,
}

impl TankId {
    pub fn other(self) -> Self {
        match self {
            TankId::Player => TankId::Enemy,
            TankId::Enemy => TankId::Player,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TankId::Player => 0,
            TankId::Enemy => 1,
        }
    }
}

/// Fire-and-forget notifications for the audio/shell collaborators.
/// The simulation only emits these; it never manages playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { tank: TankId },
    ShellImpact { pos: Vec2 },
    TankDestroyed { tank: TankId },
    MatchOver { winner: TankId },
    MatchReset,
}

/// Impact explosion VFX entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub spawned: u64,
    pub duration: u64,
    /// Scale-up window at the start of the lifetime
    pub growth: u64,
}

impl Explosion {
    pub fn new(pos: Vec2, now: u64) -> Self {
        Self {
            pos,
            spawned: now,
            duration: EXPLOSION_DURATION_TICKS,
            growth: EXPLOSION_GROWTH_TICKS,
        }
    }

    /// Visual scale: ramps 0..1 over the growth window, then holds at 1.0
    pub fn scale(&self, now: u64) -> f32 {
        let age = now.saturating_sub(self.spawned);
        if age < self.growth {
            age as f32 / self.growth as f32
        } else {
            1.0
        }
    }

    pub fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.spawned) > self.duration
    }
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter, runs across resets
    pub time_ticks: u64,
    /// Arena dimensions (width, height)
    pub arena: Vec2,
    pub phase: GamePhase,
    /// Index 0 = player, 1 = enemy
    pub tanks: [Tank; 2],
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    /// Decision state for the enemy tank
    pub enemy_ai: AiController,
    /// Decision state for the player tank in attract mode
    pub autopilot: AiController,
    /// Events produced this tick, drained by the shell
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with the given seed and arena size
    pub fn new(seed: u64, arena: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let [player, enemy] = spawn_tanks(arena);
        let enemy_ai = AiController::new(&mut rng, arena, enemy.pos, 0);
        let autopilot = AiController::new(&mut rng, arena, player.pos, 0);
        Self {
            seed,
            rng,
            time_ticks: 0,
            arena,
            phase: GamePhase::Playing,
            tanks: [player, enemy],
            projectiles: Vec::new(),
            explosions: Vec::new(),
            enemy_ai,
            autopilot,
            events: Vec::new(),
        }
    }

    pub fn tank(&self, id: TankId) -> &Tank {
        &self.tanks[id.index()]
    }

    pub fn tank_mut(&mut self, id: TankId) -> &mut Tank {
        &mut self.tanks[id.index()]
    }

    /// Hand this tick's events to the shell
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reinitialize both tanks and clear transient entities for a fresh
    /// round. The tick counter and RNG stream keep running so a match stays
    /// a single deterministic sequence across resets.
    pub fn reset(&mut self) {
        log::info!("match reset at tick {}", self.time_ticks);
        self.tanks = spawn_tanks(self.arena);
        self.projectiles.clear();
        self.explosions.clear();
        let now = self.time_ticks;
        self.enemy_ai = AiController::new(&mut self.rng, self.arena, self.tanks[1].pos, now);
        self.autopilot = AiController::new(&mut self.rng, self.arena, self.tanks[0].pos, now);
        self.phase = GamePhase::Playing;
    }
}

/// Fixed spawn poses: player on the left facing the enemy, enemy on the
/// right facing back.
fn spawn_tanks(arena: Vec2) -> [Tank; 2] {
    [
        Tank::new(Vec2::new(arena.x * 0.25, arena.y * 0.5), 0.0),
        Tank::new(Vec2::new(arena.x * 0.75, arena.y * 0.5), 180.0),
    ]
}
