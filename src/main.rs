//! Headless demo shell
//!
//! Runs an attract-mode match (autopilot vs. AI) to completion, logging
//! events and forwarding audio commands nowhere. A real shell would swap in
//! window/input/audio backends around the same loop.

use glam::Vec2;

use tank_duel::audio::AudioDirector;
use tank_duel::consts::*;
use tank_duel::sim::{GameEvent, GameState, TickInput, tick};
use tank_duel::{Settings, snapshot};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xDECAF_u64);
    // Safety cap so a very evenly matched seed still terminates
    let max_ticks: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10 * 60 * TICK_RATE as u64);

    let settings = Settings::load();
    let mut state = GameState::new(seed, Vec2::new(ARENA_WIDTH, ARENA_HEIGHT));
    let mut audio = AudioDirector::new(&settings);
    log::info!("Match initialized with seed {seed}");

    let input = TickInput {
        auto_pilot: true,
        ..Default::default()
    };

    let mut winner = None;
    'running: loop {
        tick(&mut state, &input, SIM_DT);

        let events = state.drain_events();
        for event in &events {
            match event {
                GameEvent::ShotFired { tank } => log::debug!("{tank:?} fired"),
                GameEvent::ShellImpact { pos } => {
                    log::debug!("shell impact at ({:.0}, {:.0})", pos.x, pos.y)
                }
                GameEvent::TankDestroyed { tank } => log::info!("{tank:?} destroyed"),
                GameEvent::MatchOver { winner: w } => winner = Some(*w),
                GameEvent::MatchReset => break 'running,
            }
        }

        let snap = snapshot::build(&state);
        // A playback backend would consume these; the demo just drops them
        let _ = audio.frame(&snap, &events, SIM_DT);

        if state.time_ticks >= max_ticks {
            log::info!("Tick cap reached with no decision");
            break;
        }
    }

    let secs = state.time_ticks as f32 * SIM_DT;
    match winner {
        Some(w) => println!("{w:?} won after {secs:.1}s of simulated combat"),
        None => println!("Draw: no winner within {secs:.1}s"),
    }
}
