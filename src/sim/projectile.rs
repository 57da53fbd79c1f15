//! Ballistic shells
//!
//! Straight-line constant-velocity flight: no drag, no gravity. A shell's
//! velocity is fixed at launch and includes the momentum of the firing
//! platform, so a moving tank throws its shells farther downrange.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading_vec;

/// One in-flight shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Launch heading in degrees, kept only for rendering rotation
    pub heading: f32,
    /// Flight velocity, captured by value at launch and never changed
    vel: Vec2,
    /// Cumulative distance flown
    pub traveled: f32,
    pub max_range: f32,
}

impl Projectile {
    /// Build a shell leaving the muzzle.
    ///
    /// `platform_speed`/`platform_heading` describe the firing tank's drive
    /// motion at the instant of the shot; they feed the velocity sum only,
    /// not the rendering heading.
    pub fn new(pos: Vec2, heading: f32, platform_speed: f32, platform_heading: f32) -> Self {
        let vel =
            heading_vec(heading) * SHELL_SPEED + heading_vec(platform_heading) * platform_speed;
        Self {
            pos,
            heading,
            vel,
            traveled: 0.0,
            max_range: SHELL_RANGE,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// Advance one tick. Returns whether the shell is still in flight
    /// (exactly at max range still counts as live).
    pub fn advance(&mut self, dt: f32) -> bool {
        let step = self.vel * dt;
        self.pos += step;
        self.traveled += step.length();
        self.traveled <= self.max_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_includes_platform_motion() {
        // Fired straight along +X from a platform also driving along +X
        let p = Projectile::new(Vec2::ZERO, 0.0, 100.0, 0.0);
        assert!((p.velocity().x - (SHELL_SPEED + 100.0)).abs() < 1e-3);
        assert!(p.velocity().y.abs() < 1e-3);

        // Platform motion does not tilt the rendering heading
        assert_eq!(p.heading, 0.0);
    }

    #[test]
    fn test_velocity_is_constant_after_launch() {
        let mut p = Projectile::new(Vec2::ZERO, 30.0, 50.0, -10.0);
        let v0 = p.velocity();
        for _ in 0..20 {
            p.advance(SIM_DT);
        }
        assert_eq!(p.velocity(), v0);
    }

    #[test]
    fn test_traveled_is_monotone() {
        let mut p = Projectile::new(Vec2::ZERO, 45.0, 0.0, 0.0);
        let mut last = 0.0;
        for _ in 0..30 {
            p.advance(SIM_DT);
            assert!(p.traveled >= last);
            last = p.traveled;
        }
    }

    #[test]
    fn test_range_boundary() {
        let mut p = Projectile::new(Vec2::ZERO, 0.0, 0.0, 0.0);
        // Force the boundary: exactly at max range stays live
        p.traveled = p.max_range - SHELL_SPEED * SIM_DT;
        assert!(p.advance(SIM_DT));
        assert!((p.traveled - p.max_range).abs() < 1e-3);
        // One more step crosses it
        assert!(!p.advance(SIM_DT));
    }

    #[test]
    fn test_opposing_platform_motion_slows_shell() {
        // Reversing platform subtracts from shell speed
        let p = Projectile::new(Vec2::ZERO, 0.0, -100.0, 0.0);
        assert!((p.velocity().x - (SHELL_SPEED - 100.0)).abs() < 1e-3);
    }
}
