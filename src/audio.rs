//! Audio direction
//!
//! Turns simulation events into fire-and-forget play commands and keeps the
//! continuous engine/track loop volumes faded toward their targets. Commands
//! are backend-agnostic; no playback happens here and the simulation never
//! sees this module.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{GameEvent, LifeState, TankId};
use crate::snapshot::RenderSnapshot;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A tank fired its cannon
    CannonFire,
    /// Shell struck a tank
    ShellImpact,
    /// A tank was destroyed
    TankExplosion,
}

/// One instruction for a playback backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioCommand {
    /// One-shot effect at the given final volume
    Play { effect: SoundEffect, volume: f32 },
    /// Set a tank's idle engine loop volume
    EngineVolume { tank: TankId, volume: f32 },
    /// Set a tank's track-rolling loop volume
    TrackVolume { tank: TankId, volume: f32 },
}

/// Idle engine loop volume while a tank lives
const ENGINE_VOLUME: f32 = 0.05;
/// Track loop target volume while the hull moves
const TRACK_TARGET_VOLUME: f32 = 0.5;
/// Linear track fade rate (volume units/sec)
const TRACK_FADE_RATE: f32 = 3.0;
/// Hull counts as moving above this drive speed
const MOVING_SPEED_EPS: f32 = 0.5;

const TANK_IDS: [TankId; 2] = [TankId::Player, TankId::Enemy];

/// Audio manager for the game shell
pub struct AudioDirector {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    track_volume: [f32; 2],
    engine_volume: [f32; 2],
    prev_heading: [Option<f32>; 2],
}

impl AudioDirector {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            muted: settings.muted,
            track_volume: [0.0; 2],
            engine_volume: [0.0; 2],
            prev_heading: [None; 2],
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn loop_scale(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Process one tick's snapshot and events into backend commands
    pub fn frame(
        &mut self,
        snap: &RenderSnapshot,
        events: &[GameEvent],
        dt: f32,
    ) -> Vec<AudioCommand> {
        let mut commands = Vec::new();

        let volume = self.effective_volume();
        if volume > 0.0 {
            for event in events {
                let effect = match event {
                    GameEvent::ShotFired { .. } => SoundEffect::CannonFire,
                    GameEvent::ShellImpact { .. } => SoundEffect::ShellImpact,
                    GameEvent::TankDestroyed { .. } => SoundEffect::TankExplosion,
                    GameEvent::MatchOver { .. } | GameEvent::MatchReset => continue,
                };
                commands.push(AudioCommand::Play { effect, volume });
            }
        }

        for (i, tank) in snap.tanks.iter().enumerate() {
            // Engine idles at a fixed volume while the tank lives
            let engine = if tank.life == LifeState::Alive {
                ENGINE_VOLUME * self.loop_scale()
            } else {
                0.0
            };
            if engine != self.engine_volume[i] {
                self.engine_volume[i] = engine;
                commands.push(AudioCommand::EngineVolume {
                    tank: TANK_IDS[i],
                    volume: engine,
                });
            }

            // Track loop fades toward its target instead of snapping
            let turning = self.prev_heading[i].is_some_and(|h| h != tank.hull_heading);
            self.prev_heading[i] = Some(tank.hull_heading);
            let moving = tank.speed.abs() > MOVING_SPEED_EPS || turning;
            let target = if moving { TRACK_TARGET_VOLUME } else { 0.0 };

            let step = TRACK_FADE_RATE * dt;
            let current = self.track_volume[i];
            let next = if current < target {
                (current + step).min(target)
            } else {
                (current - step).max(target)
            };
            if next != current {
                self.track_volume[i] = next;
                commands.push(AudioCommand::TrackVolume {
                    tank: TANK_IDS[i],
                    volume: next * self.loop_scale(),
                });
            }
        }

        commands
    }
}
