//! Fixed timestep simulation tick
//!
//! The per-tick pipeline, in order: control input -> tank-vs-tank contact ->
//! projectile flight and hits -> position integration -> death animations ->
//! enemy AI -> win/lose detection -> display-window reset. Every stage runs
//! on the single logical thread of control; collections are pruned in place.

use rand_pcg::Pcg32;

use crate::consts::*;

use super::state::{Explosion, GameEvent, GamePhase, GameState, TankId};
use super::tank::{Steer, Tank, Throttle};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub forward: bool,
    pub backward: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub turret_left: bool,
    pub turret_right: bool,
    pub fire: bool,
    /// Attract mode - the autopilot drives the player tank
    pub auto_pilot: bool,
}

impl TickInput {
    fn throttle(&self) -> Throttle {
        if self.forward {
            Throttle::Forward
        } else if self.backward {
            Throttle::Reverse
        } else {
            Throttle::Coast
        }
    }

    fn steer(&self) -> Steer {
        match (self.steer_left, self.steer_right) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            // Both keys cancel out
            _ => Steer::Neutral,
        }
    }

    fn turret_steer(&self) -> Steer {
        match (self.turret_left, self.turret_right) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            _ => Steer::Neutral,
        }
    }
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    let now = state.time_ticks;
    let arena = state.arena;

    // Player controls (or the attract-mode autopilot)
    if input.auto_pilot {
        let foe_pos = state.tanks[TankId::Enemy.index()].pos;
        let [player, _] = &mut state.tanks;
        if let Some(shell) =
            state.autopilot.think(player, foe_pos, now, dt, arena, &mut state.rng)
        {
            state.events.push(GameEvent::ShotFired { tank: TankId::Player });
            state.projectiles.push(shell);
        }
    } else {
        let [player, _] = &mut state.tanks;
        if let Some(shell) = player.apply_controls(
            input.throttle(),
            input.steer(),
            input.turret_steer(),
            input.fire,
            now,
            dt,
        ) {
            state.events.push(GameEvent::ShotFired { tank: TankId::Player });
            state.projectiles.push(shell);
        }
    }

    resolve_tank_contact(state, now);
    advance_projectiles(state, now, dt);

    for tank in &mut state.tanks {
        tank.advance(dt, arena);
    }

    for tank in &mut state.tanks {
        tank.update_death(now, &mut state.rng);
    }
    state.explosions.retain(|e| !e.expired(now));

    // Enemy AI
    let foe_pos = state.tanks[TankId::Player.index()].pos;
    let [_, enemy] = &mut state.tanks;
    if let Some(shell) = state.enemy_ai.think(enemy, foe_pos, now, dt, arena, &mut state.rng) {
        state.events.push(GameEvent::ShotFired { tank: TankId::Enemy });
        state.projectiles.push(shell);
    }

    update_phase(state, now);

    // Auto-reset once the banner has been shown long enough
    if let GamePhase::Victory { since } | GamePhase::Defeat { since } = state.phase
        && now.saturating_sub(since) > BANNER_DURATION_TICKS
    {
        state.reset();
        state.events.push(GameEvent::MatchReset);
    }
}

/// Tank-vs-tank proximity resolution.
///
/// Contact with a dying tank is lethal; contact between two live tanks rolls
/// independent collision damage for each. The opposed push impulses apply on
/// every contact so the hulls cannot overlap indefinitely.
fn resolve_tank_contact(state: &mut GameState, now: u64) {
    let [player, enemy] = &mut state.tanks;
    let delta = enemy.pos - player.pos;
    if delta.length() >= TANK_HIT_RADIUS {
        return;
    }

    if player.dying || enemy.dying {
        if player.dying && enemy.force_destroy(now) {
            state.events.push(GameEvent::TankDestroyed { tank: TankId::Enemy });
        }
        if enemy.dying && player.force_destroy(now) {
            state.events.push(GameEvent::TankDestroyed { tank: TankId::Player });
        }
    } else {
        contact_damage(player, TankId::Player, &mut state.rng, now, &mut state.events);
        contact_damage(enemy, TankId::Enemy, &mut state.rng, now, &mut state.events);
    }

    // Coincident centers degrade to a zero push direction, never NaN
    let dir = delta.normalize_or_zero();
    enemy.apply_push(dir, PUSH_IMPULSE);
    player.apply_push(-dir, PUSH_IMPULSE);
}

fn contact_damage(
    tank: &mut Tank,
    id: TankId,
    rng: &mut Pcg32,
    now: u64,
    events: &mut Vec<GameEvent>,
) {
    let was_alive = tank.health > 0;
    let damage = tank.take_collision_damage(rng, now);
    log::debug!("{id:?} took {damage} collision damage");
    if was_alive && tank.health == 0 {
        events.push(GameEvent::TankDestroyed { tank: id });
    }
}

/// Advance all shells, resolving hits and range expiry. A consumed shell is
/// replaced by an explosion at its final position; the first tank within the
/// hit radius (index order) takes the damage.
fn advance_projectiles(state: &mut GameState, now: u64, dt: f32) {
    let mut surviving = Vec::with_capacity(state.projectiles.len());

    for mut shell in state.projectiles.drain(..) {
        let in_flight = shell.advance(dt);

        let mut consumed = false;
        for (index, tank) in state.tanks.iter_mut().enumerate() {
            if shell.pos.distance(tank.pos) < SHELL_HIT_RADIUS {
                state.explosions.push(Explosion::new(shell.pos, now));
                state.events.push(GameEvent::ShellImpact { pos: shell.pos });
                let id = if index == 0 { TankId::Player } else { TankId::Enemy };
                let was_alive = tank.health > 0;
                let damage = tank.take_direct_hit(&mut state.rng, now);
                log::debug!("{id:?} took {damage} shell damage");
                if was_alive && tank.health == 0 {
                    state.events.push(GameEvent::TankDestroyed { tank: id });
                }
                consumed = true;
                break;
            }
        }
        if consumed {
            continue;
        }

        if !in_flight {
            // Out of range: the shell detonates where it stopped
            state.explosions.push(Explosion::new(shell.pos, now));
            continue;
        }
        surviving.push(shell);
    }

    state.projectiles = surviving;
}

/// Latch victory/defeat the first tick a tank reaches zero health. The
/// opponent is checked first, so a same-tick mutual kill counts as a win.
fn update_phase(state: &mut GameState, now: u64) {
    if !matches!(state.phase, GamePhase::Playing) {
        return;
    }
    if state.tanks[TankId::Enemy.index()].health == 0 {
        state.phase = GamePhase::Victory { since: now };
        state.events.push(GameEvent::MatchOver { winner: TankId::Player });
        log::info!("victory at tick {now}");
    } else if state.tanks[TankId::Player.index()].health == 0 {
        state.phase = GamePhase::Defeat { since: now };
        state.events.push(GameEvent::MatchOver { winner: TankId::Enemy });
        log::info!("defeat at tick {now}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::Projectile;
    use crate::sim::tank::LifeState;
    use glam::Vec2;

    fn new_state() -> GameState {
        GameState::new(12345, Vec2::new(ARENA_WIDTH, ARENA_HEIGHT))
    }

    #[test]
    fn test_contact_damages_both_and_pushes_apart() {
        let mut state = new_state();
        state.tanks[0].pos = Vec2::new(400.0, 400.0);
        state.tanks[1].pos = Vec2::new(450.0, 400.0); // distance 50 < 100

        resolve_tank_contact(&mut state, 1);

        let [player, enemy] = &state.tanks;
        for tank in [player, enemy] {
            let lost = TANK_MAX_HEALTH - tank.health;
            assert!(COLLISION_DAMAGE.contains(&lost));
        }
        // Equal-magnitude, exactly opposite pushes
        assert_eq!(player.push_speed, PUSH_IMPULSE);
        assert_eq!(enemy.push_speed, PUSH_IMPULSE);
        let pd = player.push_dir.unwrap();
        let ed = enemy.push_dir.unwrap();
        assert!((pd + ed).length() < 1e-6);
        assert!((ed - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_no_contact_outside_radius() {
        let mut state = new_state();
        state.tanks[0].pos = Vec2::new(400.0, 400.0);
        state.tanks[1].pos = Vec2::new(400.0 + TANK_HIT_RADIUS, 400.0);

        resolve_tank_contact(&mut state, 1);

        assert_eq!(state.tanks[0].health, TANK_MAX_HEALTH);
        assert_eq!(state.tanks[1].health, TANK_MAX_HEALTH);
        assert!(state.tanks[0].push_dir.is_none());
    }

    #[test]
    fn test_dying_tank_kills_on_contact() {
        let mut state = new_state();
        state.tanks[0].pos = Vec2::new(400.0, 400.0);
        state.tanks[1].pos = Vec2::new(430.0, 400.0);
        state.tanks[0].force_destroy(10);
        assert_eq!(state.tanks[0].life_state(), LifeState::Dying);

        resolve_tank_contact(&mut state, 20);

        assert_eq!(state.tanks[1].health, 0);
        assert_eq!(state.tanks[1].life_state(), LifeState::Dying);
        assert!(state
            .events
            .contains(&GameEvent::TankDestroyed { tank: TankId::Enemy }));
        // Push still applies in the lethal branch
        assert_eq!(state.tanks[0].push_speed, PUSH_IMPULSE);
        assert_eq!(state.tanks[1].push_speed, PUSH_IMPULSE);
    }

    #[test]
    fn test_burned_out_wreck_is_inert() {
        let mut state = new_state();
        state.tanks[0].pos = Vec2::new(400.0, 400.0);
        state.tanks[1].pos = Vec2::new(430.0, 400.0);
        state.tanks[0].force_destroy(10);
        state.tanks[0].update_death(10 + DEATH_DURATION_TICKS + 1, &mut state.rng);
        assert_eq!(state.tanks[0].life_state(), LifeState::Dead);

        resolve_tank_contact(&mut state, 1000);

        // The live tank takes ordinary contact damage, not a forced kill
        let lost = TANK_MAX_HEALTH - state.tanks[1].health;
        assert!(COLLISION_DAMAGE.contains(&lost));
        // The wreck absorbs its roll without re-entering the death sequence
        assert_eq!(state.tanks[0].life_state(), LifeState::Dead);
    }

    #[test]
    fn test_coincident_tanks_get_zero_push_not_nan() {
        let mut state = new_state();
        state.tanks[0].pos = Vec2::new(400.0, 400.0);
        state.tanks[1].pos = Vec2::new(400.0, 400.0);

        resolve_tank_contact(&mut state, 1);

        let pd = state.tanks[0].push_dir.unwrap();
        assert_eq!(pd, Vec2::ZERO);
        assert!(pd.x.is_finite() && pd.y.is_finite());
    }

    #[test]
    fn test_shell_hit_consumes_and_damages() {
        let mut state = new_state();
        let target = state.tanks[1].pos;
        // Shell one step away from entering the hit radius, flying straight in
        let start = target - Vec2::new(SHELL_HIT_RADIUS - 1.0 + SHELL_SPEED * SIM_DT, 0.0);
        state.projectiles.push(Projectile::new(start, 0.0, 0.0, 0.0));

        advance_projectiles(&mut state, 1, SIM_DT);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.explosions.len(), 1);
        let lost = TANK_MAX_HEALTH - state.tanks[1].health;
        assert!(DIRECT_HIT_DAMAGE.contains(&lost));
        assert!(matches!(
            state.events.as_slice(),
            [GameEvent::ShellImpact { .. }]
        ));
        assert_eq!(state.tanks[0].health, TANK_MAX_HEALTH);
    }

    #[test]
    fn test_range_expiry_detonates() {
        let mut state = new_state();
        let mut shell = Projectile::new(Vec2::new(100.0, 100.0), 90.0, 0.0, 0.0);
        shell.traveled = SHELL_RANGE; // next step crosses the boundary
        state.projectiles.push(shell);

        advance_projectiles(&mut state, 1, SIM_DT);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.explosions.len(), 1);
        // No impact sound for a dud detonation
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_victory_latches_then_resets() {
        let mut state = new_state();
        state.tanks[1].force_destroy(state.time_ticks);

        let input = TickInput::default();
        tick(&mut state, &input, SIM_DT);
        assert!(matches!(state.phase, GamePhase::Victory { .. }));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::MatchOver { winner: TankId::Player }));

        let mut resets = 0;
        let mut match_overs = 0;
        for _ in 0..=(BANNER_DURATION_TICKS + 2) {
            tick(&mut state, &input, SIM_DT);
            for event in state.drain_events() {
                match event {
                    GameEvent::MatchReset => resets += 1,
                    GameEvent::MatchOver { .. } => match_overs += 1,
                    _ => {}
                }
            }
        }
        // Latched: no second MatchOver while the banner shows
        assert_eq!(match_overs, 0);
        assert_eq!(resets, 1);
        assert!(matches!(state.phase, GamePhase::Playing));
        assert_eq!(state.tanks[1].health, TANK_MAX_HEALTH);
    }

    #[test]
    fn test_mutual_kill_shows_victory() {
        let mut state = new_state();
        state.tanks[0].force_destroy(state.time_ticks);
        state.tanks[1].force_destroy(state.time_ticks);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(state.phase, GamePhase::Victory { .. }));
    }

    #[test]
    fn test_autopilot_drives_player() {
        let mut state = new_state();
        let input = TickInput {
            auto_pilot: true,
            ..Default::default()
        };
        for _ in 0..(5 * TICK_RATE as u64) {
            tick(&mut state, &input, SIM_DT);
        }
        let player = &state.tanks[0];
        assert!(player.speed != 0.0 || player.hull_heading != 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two matches with the same seed and inputs stay identical
        let mut state1 = new_state();
        let mut state2 = new_state();
        let input = TickInput {
            auto_pilot: true,
            ..Default::default()
        };

        for _ in 0..(10 * TICK_RATE as u64) {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.projectiles.len(), state2.projectiles.len());
        for (a, b) in state1.tanks.iter().zip(&state2.tanks) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.hull_heading, b.hull_heading);
            assert_eq!(a.turret_heading, b.turret_heading);
            assert_eq!(a.health, b.health);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn input_from_bits(bits: u8) -> TickInput {
            TickInput {
                forward: bits & 1 != 0,
                backward: bits & 2 != 0,
                steer_left: bits & 4 != 0,
                steer_right: bits & 8 != 0,
                turret_left: bits & 16 != 0,
                turret_right: bits & 32 != 0,
                fire: bits & 64 != 0,
                auto_pilot: bits & 128 != 0,
            }
        }

        proptest! {
            #[test]
            fn invariants_hold_for_any_input_sequence(
                seed in any::<u64>(),
                inputs in proptest::collection::vec(any::<u8>(), 1..200),
            ) {
                let mut state = GameState::new(seed, Vec2::new(ARENA_WIDTH, ARENA_HEIGHT));
                for bits in inputs {
                    tick(&mut state, &input_from_bits(bits), SIM_DT);
                    for tank in &state.tanks {
                        prop_assert!(tank.health <= TANK_MAX_HEALTH);
                        prop_assert!(tank.speed.abs() <= TANK_MAX_SPEED);
                        prop_assert!(tank.recoil_speed <= 0.0);
                        prop_assert!(tank.push_speed >= 0.0);
                        prop_assert!(tank.pos.x >= 0.0 && tank.pos.x <= ARENA_WIDTH);
                        prop_assert!(tank.pos.y >= 0.0 && tank.pos.y <= ARENA_HEIGHT);
                    }
                    for shell in &state.projectiles {
                        prop_assert!(shell.traveled <= shell.max_range);
                    }
                }
            }
        }
    }
}
