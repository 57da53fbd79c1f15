//! Read-only render snapshots
//!
//! A rendering collaborator consumes these owned views once per tick and
//! never touches simulation state. Derived values (absolute turret heading,
//! explosion scale, blast age) are precomputed here so renderers stay dumb.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TANK_MAX_HEALTH;
use crate::sim::{GamePhase, GameState, LifeState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub arena: Vec2,
    pub phase: GamePhase,
    /// Index 0 = player, 1 = enemy
    pub tanks: [TankView; 2],
    pub shells: Vec<ShellView>,
    pub explosions: Vec<ExplosionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankView {
    pub pos: Vec2,
    pub hull_heading: f32,
    /// Absolute turret heading (hull + relative turret)
    pub turret_heading: f32,
    pub speed: f32,
    pub flash: bool,
    pub health: u32,
    pub max_health: u32,
    pub life: LifeState,
    pub blasts: Vec<BlastView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellView {
    pub pos: Vec2,
    pub heading: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionView {
    pub pos: Vec2,
    /// 0..1 during the growth window, then 1.0
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastView {
    pub pos: Vec2,
    pub rotation: f32,
    /// Fraction of the blast's lifetime already elapsed, 0..1
    pub age: f32,
}

/// Build the per-tick snapshot
pub fn build(state: &GameState) -> RenderSnapshot {
    let now = state.time_ticks;
    RenderSnapshot {
        tick: now,
        arena: state.arena,
        phase: state.phase,
        tanks: [
            tank_view(&state.tanks[0], now),
            tank_view(&state.tanks[1], now),
        ],
        shells: state
            .projectiles
            .iter()
            .map(|p| ShellView {
                pos: p.pos,
                heading: p.heading,
            })
            .collect(),
        explosions: state
            .explosions
            .iter()
            .map(|e| ExplosionView {
                pos: e.pos,
                scale: e.scale(now),
            })
            .collect(),
    }
}

fn tank_view(tank: &crate::sim::Tank, now: u64) -> TankView {
    TankView {
        pos: tank.pos,
        hull_heading: tank.hull_heading,
        turret_heading: tank.turret_absolute(),
        speed: tank.speed,
        flash: tank.flash_active(now),
        health: tank.health,
        max_health: TANK_MAX_HEALTH,
        life: tank.life_state(),
        blasts: tank
            .blasts
            .iter()
            .map(|b| BlastView {
                pos: b.pos,
                rotation: b.rotation,
                age: (now.saturating_sub(b.spawned) as f32 / b.lifetime as f32).min(1.0),
            })
            .collect(),
    }
}
