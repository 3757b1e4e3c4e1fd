//! Asteroid Dodge headless runner
//!
//! Plays one run with a simple evasive autopilot and prints the result.
//!
//! Usage: `asteroid-dodge [easy|normal|hard] [settings.json] [best_scores.json]`

use std::path::Path;
use std::process::ExitCode;

use glam::Vec2;

use asteroid_dodge::persistence::JsonFileStore;
use asteroid_dodge::sim::{ControlSample, GameState, Hitbox};
use asteroid_dodge::{Bounds, DifficultyTier, Session, Settings};

const SCREEN: (f32, f32) = (1080.0, 1920.0);
const FRAME_SECS: f32 = 1.0 / 60.0;
/// Stop after ten minutes of session time
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Virtual stick radius used by the autopilot
const STICK_RADIUS: f32 = 100.0;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings_path = args.get(1).map_or("settings.json", String::as_str);
    let scores_path = args.get(2).map_or("best_scores.json", String::as_str);

    let mut settings = Settings::load(Path::new(settings_path));
    if let Some(tier) = args.first() {
        match tier.parse::<DifficultyTier>() {
            Ok(tier) => settings.tier = tier,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let store = match JsonFileStore::open(scores_path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open best scores: {e}");
            return ExitCode::FAILURE;
        }
    };

    let bounds = Bounds::new(SCREEN.0, SCREEN.1);
    let mut session = Session::start(&settings, bounds, store);

    for _ in 0..MAX_FRAMES {
        let sample = autopilot(session.state());
        session.push_control(sample);
        session.advance(FRAME_SECS);
        if session.end_signal().is_some() {
            break;
        }
    }

    let state = session.state();
    match session.end_signal() {
        Some(summary) => {
            println!(
                "{}: score {} (best {}), {} tokens, {:.1}s",
                settings.tier,
                summary.final_score,
                summary.best_score,
                state.score.tokens_collected,
                state.time_ms as f32 / 1000.0
            );
        }
        None => {
            println!(
                "{}: survived {:.1}s with score {}",
                settings.tier,
                state.time_ms as f32 / 1000.0,
                state.score.current
            );
        }
    }

    session.exit();
    ExitCode::SUCCESS
}

/// Steer away from nearby asteroids, weighted by closeness, and drift back
/// toward the middle of the screen when nothing is close
fn autopilot(state: &GameState) -> ControlSample {
    let ship = state.ship.center();
    let mut push = Vec2::ZERO;
    for asteroid in &state.asteroids {
        let away = ship - asteroid.center();
        let dist = away.length().max(1.0);
        if dist < 450.0 {
            push += away / dist * (450.0 - dist) / 450.0;
        }
    }
    if push.length_squared() < 1e-4 {
        push = (state.bounds.center() - ship) / state.bounds.width;
    }

    if push.length_squared() < 1e-6 {
        ControlSample::JoystickReleased
    } else {
        ControlSample::Joystick {
            offset: push.clamp_length_max(1.0) * STICK_RADIUS,
            radius: STICK_RADIUS,
        }
    }
}
