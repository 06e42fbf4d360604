//! Space Runner headless runner
//!
//! Drives the simulation with a scripted pilot so balance changes can be
//! tried from the command line without a renderer.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use space_runner::sim::{GameEvent, GameState, TickInput, tick};
use space_runner::{HighScoreStore, JsonFileStore, Tuning};

/// Forward speed of the scripted pilot (units per second along -Z)
const PILOT_SPEED: f32 = 20.0;

/// Run the endless-runner simulation without a window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed for the run
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Maximum number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// High score file (created on a new record)
    #[arg(long)]
    high_score: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Scripted pilot: flies forward, weaves, holds the trigger, and heads for a
/// lit reload ring when one is offered.
fn pilot(state: &GameState, time: f32) -> TickInput {
    let z = -PILOT_SPEED * time;
    let (x, y) = match state.pickups.visible_ring() {
        Some(ring) => (ring.x, ring.y),
        None => (6.0 * (time * 0.7).sin(), 2.0 + 1.5 * (time * 1.3).sin()),
    };
    TickInput {
        player_position: Some(Vec3::new(x, y, z)),
        fire: true,
        ..Default::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let mut store = args.high_score.clone().map(JsonFileStore::new);
    let high_score = match &store {
        Some(store) => store.load()?,
        None => 0,
    };

    log::info!("Space Runner (headless) seed={} ticks={}", args.seed, args.ticks);
    let mut state = GameState::new(args.seed, tuning, high_score);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, args.dt);

    let mut time = 0.0f32;
    for _ in 1..args.ticks {
        time += args.dt;
        let input = pilot(&state, time);
        tick(&mut state, &input, args.dt);

        let mut finished = false;
        for event in &state.events {
            match *event {
                GameEvent::LevelUp { level } => log::info!("Reached level {level}"),
                GameEvent::PlayerHit { lives, .. } => log::info!("Hit! {lives} lives left"),
                GameEvent::AmmoCollected { amount, ammo } => {
                    log::debug!("Reloaded {amount} ({ammo} in magazine)")
                }
                GameEvent::GameOver {
                    score,
                    high_score,
                    new_record,
                } => {
                    log::info!("Game over with {score} (best {high_score})");
                    if new_record {
                        if let Some(store) = store.as_mut() {
                            if let Err(e) = store.save(high_score) {
                                log::warn!("Failed to save high score: {e}");
                            }
                        }
                    }
                    finished = true;
                }
                _ => {}
            }
        }
        if finished {
            break;
        }
    }

    println!("{}", serde_json::to_string_pretty(&state.progression)?);
    Ok(())
}
