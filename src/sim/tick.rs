//! Fixed-step game loop
//!
//! `tick` advances the session clock and runs every lane, one-shot timer and
//! token expiry that falls due, in time order. Events sharing an instant run
//! in a fixed order:
//! 1. end of the invulnerability grace period
//! 2. token expiry
//! 3. lanes: blink, movement, physics (+ token pickup), collision, score,
//!    token spawn
//! 4. end of the game-over explosion

use glam::Vec2;

use super::collision::{Hitbox, is_collision};
use super::control::{ControlSample, displace};
use super::lanes::Lane;
use super::physics::step_asteroids;
use super::spawner::place_token;
use super::state::{Explosion, GameEvent, GamePhase, GameState, SessionSummary, Token};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest control sample, applied before any lane runs
    pub control: Option<ControlSample>,
}

impl TickInput {
    pub fn with_control(sample: ControlSample) -> Self {
        Self {
            control: Some(sample),
        }
    }
}

/// Advance the game state by `elapsed_ms` of session time
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: u32) {
    if let Some(sample) = input.control {
        if state.is_game_active() {
            state.control.apply(sample);
        }
    }

    let target = state.time_ms + elapsed_ms as u64;
    while let Some(now) = next_event_ms(state).filter(|&t| t <= target) {
        state.time_ms = now;
        run_due(state, now);
    }
    state.time_ms = target;
}

/// Earliest pending lane, timer or expiry
fn next_event_ms(state: &GameState) -> Option<u64> {
    let mut next = state.lanes.earliest();
    let mut consider = |t: u64| {
        next = Some(next.map_or(t, |n| n.min(t)));
    };

    match state.phase {
        GamePhase::Invulnerable => consider(state.invulnerable_until_ms),
        GamePhase::Active => {}
        GamePhase::GameOver => {
            if state.summary.is_none() {
                if let Some(explosion) = &state.explosion {
                    consider(explosion.ends_at_ms);
                }
            }
        }
    }

    if state.is_game_active() {
        for token in state.tokens.iter().filter(|t| t.active) {
            consider(token.expires_at_ms);
        }
    }

    next
}

fn run_due(state: &mut GameState, now: u64) {
    if state.phase == GamePhase::Invulnerable && now >= state.invulnerable_until_ms {
        end_invulnerability(state);
    }

    if state.is_game_active() {
        expire_tokens(state, now);
    }

    for lane in Lane::ALL {
        if !state.lanes.is_due(lane, now) {
            continue;
        }
        run_lane(state, lane, now);
        state.lanes.reschedule(lane);
    }

    if state.phase == GamePhase::GameOver && state.summary.is_none() {
        let finished = state
            .explosion
            .as_ref()
            .is_some_and(|e| now >= e.ends_at_ms);
        if finished {
            finish_session(state);
        }
    }
}

fn run_lane(state: &mut GameState, lane: Lane, now: u64) {
    match lane {
        Lane::Blink => {
            if state.is_invulnerable() {
                state.ship.toggle_blink();
            } else {
                state.ship.alpha = 1.0;
                state.lanes.cancel(Lane::Blink);
            }
        }
        Lane::Movement => {
            let vector = state.control.vector();
            state.ship.pos = displace(
                state.ship.pos,
                state.ship.size,
                vector,
                state.difficulty.tie_speed,
                state.bounds,
            );
        }
        Lane::Physics => {
            let mut collided = Vec::new();
            step_asteroids(&mut state.asteroids, state.bounds, &mut state.rng, &mut collided);
            for (a, b) in collided {
                log::debug!("Asteroids {} and {} collided", a, b);
                state.events.push(GameEvent::AsteroidsCollided { a, b });
            }
            collect_tokens(state);
        }
        Lane::Collision => {
            if state.phase != GamePhase::Active {
                return;
            }
            let hit = state
                .asteroids
                .iter()
                .find(|a| is_collision(&state.ship, *a, COLLISION_THRESHOLD))
                .map(|a| a.id);
            if let Some(asteroid) = hit {
                game_over(state, asteroid, now);
            }
        }
        Lane::Score => state.score.add_interval(),
        Lane::TokenSpawn => {
            if state.tokens.len() < MAX_POINT_TOKENS {
                spawn_token(state, now);
            }
        }
    }
}

fn end_invulnerability(state: &mut GameState) {
    state.phase = GamePhase::Active;
    state.ship.alpha = 1.0;
    state.lanes.cancel(Lane::Blink);
    state.events.push(GameEvent::InvulnerabilityEnded);
    log::debug!("Invulnerability ended at {} ms", state.time_ms);
}

fn expire_tokens(state: &mut GameState, now: u64) {
    let events = &mut state.events;
    state.tokens.retain_mut(|token| {
        if token.active && now >= token.expires_at_ms {
            token.active = false;
            log::debug!("Token {} expired", token.id);
            events.push(GameEvent::TokenExpired { id: token.id });
            false
        } else {
            true
        }
    });
}

/// Ship-vs-token pickups; allowed at any time while the game is live
fn collect_tokens(state: &mut GameState) {
    let ship = &state.ship;
    let score = &mut state.score;
    let events = &mut state.events;
    state.tokens.retain_mut(|token| {
        if token.active && is_collision(ship, &*token, COLLISION_THRESHOLD) {
            token.active = false;
            score.add_token(token.value);
            log::debug!("Token {} collected (+{})", token.id, token.value);
            events.push(GameEvent::TokenCollected {
                id: token.id,
                value: token.value,
                pos: token.pos,
            });
            false
        } else {
            true
        }
    });
}

fn spawn_token(state: &mut GameState, now: u64) {
    let asteroid_centers: Vec<Vec2> = state.asteroids.iter().map(|a| a.center()).collect();
    let pos = place_token(
        state.bounds,
        Vec2::splat(TOKEN_SIZE),
        state.ship.center(),
        SAFE_ZONE_RADIUS,
        &asteroid_centers,
        &mut state.rng,
    );
    let id = state.next_entity_id();
    state.tokens.push(Token::new(id, pos, now));
    log::debug!("Token {} spawned at {:?}", id, pos);
    state.events.push(GameEvent::TokenSpawned { id, pos });
}

/// Terminal transition: stop every lane, settle the best score, start the
/// explosion
fn game_over(state: &mut GameState, asteroid: u32, now: u64) {
    state.phase = GamePhase::GameOver;
    state.lanes.cancel_all();
    state.control.apply(ControlSample::JoystickReleased);
    state.ship.alpha = 1.0;

    let improved = state.score.finalize();
    log::info!(
        "Ship destroyed by asteroid {} at {} ms: score={} best={}{}",
        asteroid,
        now,
        state.score.current,
        state.score.best,
        if improved.is_some() { " (new best)" } else { "" }
    );

    state.explosion = Some(Explosion {
        pos: state.ship.pos,
        size: state.ship.size,
        ends_at_ms: now + EXPLOSION_DURATION_MS as u64,
    });
    state.events.push(GameEvent::ShipDestroyed {
        pos: state.ship.pos,
        asteroid,
    });
}

fn finish_session(state: &mut GameState) {
    let summary = SessionSummary {
        final_score: state.score.current,
        best_score: state.score.best,
    };
    state.summary = Some(summary);
    state.explosion = None;
    state.events.push(GameEvent::SessionEnded(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;
    use crate::settings::Difficulty;

    fn bounds() -> Bounds {
        Bounds::new(1080.0, 1920.0)
    }

    /// A session whose asteroids hold still, so nothing happens by chance
    fn frozen_state(count: usize, speed_factor: f32) -> GameState {
        let mut state = GameState::new(Difficulty::new(count, speed_factor, 10.0), bounds(), 0, 4242);
        for a in &mut state.asteroids {
            a.vel = Vec2::ZERO;
            a.rotation_speed = 0.0;
        }
        state
    }

    fn park_on_ship(state: &mut GameState) -> u32 {
        let ship_pos = state.ship.pos;
        let asteroid = &mut state.asteroids[0];
        asteroid.pos = ship_pos;
        asteroid.id
    }

    #[test]
    fn test_invulnerable_window_ignores_hits() {
        let mut state = frozen_state(3, 0.7);
        park_on_ship(&mut state);

        tick(&mut state, &TickInput::default(), 1999);
        assert_eq!(state.phase, GamePhase::Invulnerable);
        assert!(state.is_game_active());

        tick(&mut state, &TickInput::default(), 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_ms, 2000);
    }

    #[test]
    fn test_blink_during_invulnerability() {
        let mut state = frozen_state(3, 0.7);
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.ship.alpha, INVULNERABLE_ALPHA);
        tick(&mut state, &TickInput::default(), 200);
        assert_eq!(state.ship.alpha, 1.0);
        tick(&mut state, &TickInput::default(), 200);
        assert_eq!(state.ship.alpha, INVULNERABLE_ALPHA);

        tick(&mut state, &TickInput::default(), 1600);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.ship.alpha, 1.0);
        assert!(!state.lanes.is_scheduled(Lane::Blink));
        assert!(state.drain_events().contains(&GameEvent::InvulnerabilityEnded));
    }

    #[test]
    fn test_token_expires_after_lifetime() {
        let mut state = frozen_state(4, 1.0);
        let id = state.next_entity_id();
        state.tokens.push(Token::new(id, Vec2::ZERO, 0));

        tick(&mut state, &TickInput::default(), 7999);
        assert!(state.tokens.iter().any(|t| t.id == id));

        tick(&mut state, &TickInput::default(), 1);
        assert!(state.tokens.iter().all(|t| t.id != id));
        assert!(state.drain_events().contains(&GameEvent::TokenExpired { id }));
    }

    #[test]
    fn test_token_spawns_on_interval_up_to_max() {
        let mut state = frozen_state(4, 1.0);
        tick(&mut state, &TickInput::default(), 1999);
        assert!(state.tokens.is_empty());

        tick(&mut state, &TickInput::default(), 1);
        assert_eq!(state.tokens.len(), 1);
        let first = state.tokens[0].id;

        // Still capped at one while the first is alive
        tick(&mut state, &TickInput::default(), 4000);
        assert_eq!(state.tokens.len(), 1);
        assert_eq!(state.tokens[0].id, first);
        assert_eq!(state.tokens[0].expires_at_ms, 2000 + TOKEN_LIFETIME_MS as u64);
    }

    #[test]
    fn test_score_after_three_seconds() {
        let mut state = frozen_state(4, 1.0);
        tick(&mut state, &TickInput::default(), 3000);
        assert_eq!(state.score.current, 30);
        assert!(state.is_game_active());
    }

    #[test]
    fn test_score_accumulates_across_small_frames() {
        let mut state = frozen_state(4, 1.0);
        for _ in 0..(3000 / 16) {
            tick(&mut state, &TickInput::default(), 16);
        }
        tick(&mut state, &TickInput::default(), 3000 % 16);
        assert_eq!(state.score.current, 30);
    }

    #[test]
    fn test_token_pickup_scores_even_when_invulnerable() {
        let mut state = frozen_state(3, 0.7);
        let id = state.next_entity_id();
        let pos = state.ship.pos + Vec2::splat(10.0);
        state.tokens.push(Token::new(id, pos, 0));

        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.phase, GamePhase::Invulnerable);
        assert_eq!(state.score.current, TOKEN_POINTS);
        assert_eq!(state.score.tokens_collected, 1);
        assert!(state.tokens.is_empty());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::TokenCollected { id: got, value: 20, .. } if *got == id))
        );
    }

    #[test]
    fn test_joystick_moves_ship_each_movement_tick() {
        let mut state = frozen_state(3, 0.7);
        let start = state.ship.pos;
        let input = TickInput::with_control(ControlSample::Joystick {
            offset: Vec2::new(50.0, 0.0),
            radius: 100.0,
        });
        // Movement runs at 0, 10, ..., 100
        tick(&mut state, &input, 100);
        assert!((state.ship.pos.x - (start.x + 55.0)).abs() < 1e-3);
        assert_eq!(state.ship.pos.y, start.y);

        tick(
            &mut state,
            &TickInput::with_control(ControlSample::JoystickReleased),
            100,
        );
        assert!((state.ship.pos.x - (start.x + 55.0)).abs() < 1e-3);
    }

    #[test]
    fn test_ship_clamped_at_edge() {
        let mut state = frozen_state(3, 0.7);
        let input = TickInput::with_control(ControlSample::Joystick {
            offset: Vec2::new(-100.0, -100.0),
            radius: 100.0,
        });
        tick(&mut state, &input, 1500);
        assert_eq!(state.ship.pos, Vec2::ZERO);
    }

    #[test]
    fn test_game_over_stops_everything() {
        let mut state = frozen_state(4, 1.0);
        let asteroid = park_on_ship(&mut state);

        tick(&mut state, &TickInput::default(), 2000);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.lanes.any_scheduled());
        // Collision lane runs before the score lane at t=2000
        assert_eq!(state.score.current, 10);
        let events = state.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::ShipDestroyed { asteroid: hit, .. } if *hit == asteroid))
        );

        for a in &mut state.asteroids {
            a.vel = Vec2::new(3.0, 3.0);
        }
        let frozen: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        let ship = state.ship.pos;
        tick(
            &mut state,
            &TickInput::with_control(ControlSample::Joystick {
                offset: Vec2::new(100.0, 0.0),
                radius: 100.0,
            }),
            10_000,
        );
        assert_eq!(state.score.current, 10);
        assert_eq!(state.ship.pos, ship);
        let after: Vec<Vec2> = state.asteroids.iter().map(|a| a.pos).collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn test_explosion_then_summary() {
        let mut state = frozen_state(4, 1.0);
        state.score.best = 5;
        park_on_ship(&mut state);

        tick(&mut state, &TickInput::default(), 2000);
        assert!(state.explosion.is_some());
        assert!(state.summary.is_none());

        tick(&mut state, &TickInput::default(), 499);
        assert!(state.summary.is_none());

        tick(&mut state, &TickInput::default(), 1);
        let summary = SessionSummary {
            final_score: 10,
            best_score: 10,
        };
        assert_eq!(state.summary, Some(summary));
        assert!(state.explosion.is_none());
        assert!(state.drain_events().contains(&GameEvent::SessionEnded(summary)));
    }

    #[test]
    fn test_score_monotonic_while_active() {
        let mut state = GameState::new(Difficulty::new(5, 1.3, 10.0), bounds(), 0, 99);
        let mut last = 0;
        while state.is_game_active() && state.time_ms < 20_000 {
            tick(&mut state, &TickInput::default(), 16);
            assert!(state.score.current >= last);
            last = state.score.current;
        }
    }

    #[test]
    fn test_asteroids_stay_on_screen_through_play() {
        let mut state = GameState::new(Difficulty::new(5, 1.3, 10.0), bounds(), 0, 7);
        for _ in 0..500 {
            tick(&mut state, &TickInput::default(), 16);
            for a in &state.asteroids {
                assert!(a.pos.x >= 0.0 && a.pos.x <= bounds().width - a.size.x);
                assert!(a.pos.y >= 0.0 && a.pos.y <= bounds().height - a.size.y);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let difficulty = Difficulty::new(5, 1.3, 10.0);
        let mut state1 = GameState::new(difficulty, bounds(), 0, 99999);
        let mut state2 = GameState::new(difficulty, bounds(), 0, 99999);

        let inputs = [
            TickInput::with_control(ControlSample::Joystick {
                offset: Vec2::new(20.0, -10.0),
                radius: 60.0,
            }),
            TickInput::default(),
            TickInput::with_control(ControlSample::JoystickReleased),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input, 16);
                tick(&mut state2, input, 16);
            }
        }

        assert_eq!(state1.time_ms, state2.time_ms);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        for (a, b) in state1.asteroids.iter().zip(&state2.asteroids) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }
}
