//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Strictly sequential single-threaded tick pipeline
//! - No rendering, audio, or platform dependencies (events out, input in)

pub mod ai;
pub mod projectile;
pub mod state;
pub mod tank;
pub mod tick;

pub use ai::AiController;
pub use projectile::Projectile;
pub use state::{Explosion, GameEvent, GamePhase, GameState, TankId};
pub use tank::{DeathBlast, LifeState, Steer, Tank, Throttle};
pub use tick::{TickInput, tick};
