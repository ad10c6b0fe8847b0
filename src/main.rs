//! Coreguard headless harness
//!
//! Runs a scripted, fully deterministic session: title -> intro -> playing,
//! with synthetic movement and fire input at 60fps, and prints a JSON
//! summary of the run. Useful for balance checks and replay debugging
//! without a window.
//!
//! Usage: `coreguard [seed] [atlas.json]`

use std::error::Error;

use glam::Vec2;
use serde::Serialize;

use coreguard::atlas::Atlas;
use coreguard::render::sprites;
use coreguard::sim::{GameState, Screen, TickInput, tick};

const DT: f64 = 1.0 / 60.0;
const SESSION_FRAMES: u32 = 60 * 90;

#[derive(Debug, Serialize)]
struct SessionSummary {
    seed: u64,
    frames: u32,
    sim_seconds: f64,
    final_screen: String,
    hero_hit_points: Option<i32>,
    companion_alive: bool,
    foes_remaining: usize,
    peak_foes: usize,
    shots_fired: u32,
    sprites_last_frame: usize,
}

fn screen_name(screen: Screen) -> &'static str {
    match screen {
        Screen::Title => "title",
        Screen::Intro => "intro",
        Screen::Playing => "playing",
        Screen::GameOver => "game_over",
    }
}

/// Synthetic input for one frame: sweep the map in a loose rectangle while
/// firing at a circling crosshair
fn scripted_input(frame: u32, now: f64) -> TickInput {
    let phase = (frame / 300) % 4;
    let held = Some(now - ((frame % 300) as f64) * DT);
    let (left, right, up, down) = match phase {
        0 => (None, held, None, None),
        1 => (None, None, None, held),
        2 => (held, None, None, None),
        _ => (None, None, held, None),
    };

    let sweep = frame as f32 * 0.05;
    TickInput {
        left_since: left,
        right_since: right,
        up_since: up,
        down_since: down,
        attack: frame % 120 < 60,
        pointer: Vec2::new(
            120.0 + 80.0 * sweep.cos(),
            90.0 + 60.0 * sweep.sin(),
        ),
        confirm: false,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 1337,
    };
    let atlas = match args.next() {
        Some(path) => Atlas::from_json(&std::fs::read_to_string(path)?)?,
        None => Atlas::default(),
    };

    log::info!("coreguard headless session, seed {seed}");
    let mut state = GameState::new(seed, atlas)?;

    // Through the menus
    let confirm = TickInput { confirm: true, ..TickInput::default() };
    tick(&mut state, &confirm, DT);
    tick(&mut state, &confirm, DT);

    let mut peak_foes = 0usize;
    let mut shots_fired = 0u32;
    let mut frames = 0u32;

    for frame in 0..SESSION_FRAMES {
        let projectiles_before = state.entities.iter().filter(|e| e.is_projectile()).count();
        let input = scripted_input(frame, state.now);
        tick(&mut state, &input, DT);
        frames += 1;

        let projectiles_after = state.entities.iter().filter(|e| e.is_projectile()).count();
        shots_fired += projectiles_after.saturating_sub(projectiles_before) as u32;
        peak_foes = peak_foes.max(state.foe_count());

        if state.screen == Screen::GameOver {
            break;
        }
    }

    let summary = SessionSummary {
        seed,
        frames,
        sim_seconds: state.now,
        final_screen: screen_name(state.screen).to_string(),
        hero_hit_points: state.hero().and_then(|h| h.hit_points()),
        companion_alive: state
            .companion()
            .and_then(|c| c.hit_points())
            .is_some_and(|hp| hp > 0),
        foes_remaining: state.foe_count(),
        peak_foes,
        shots_fired,
        sprites_last_frame: sprites(&state).len(),
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
