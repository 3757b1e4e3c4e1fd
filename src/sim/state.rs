//! Game state and core simulation types
//!
//! One [`GameState`] per run. Created at session start, dropped at game over
//! or restart; nothing carries over between runs except what the caller
//! passes back in (difficulty, bounds, stored best score).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::control::ControlState;
use super::lanes::Lanes;
use super::score::Scoreboard;
use super::spawner::place_asteroids;
use crate::consts::*;
use crate::settings::Difficulty;
use crate::{Bounds, wrap_degrees};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Just spawned; asteroid hits are ignored until the grace period ends
    Invulnerable,
    /// Normal play
    Active,
    /// Ship destroyed (terminal)
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub size: Vec2,
    /// Render alpha; blinks while invulnerable, not gameplay state
    pub alpha: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            alpha: 1.0,
        }
    }

    /// Spawn point: centered on screen
    pub fn spawn_position(bounds: Bounds, size: Vec2) -> Vec2 {
        bounds.clamp(bounds.center() - size * 0.5, size)
    }

    pub fn toggle_blink(&mut self) {
        self.alpha = if self.alpha < 1.0 { 1.0 } else { INVULNERABLE_ALPHA };
    }
}

impl Hitbox for Ship {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// A drifting, spinning asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Position units per physics tick
    pub vel: Vec2,
    /// Degrees, in [0, 360)
    pub rotation_angle: f32,
    /// Degrees per physics tick, in [-3, 3], fixed for the asteroid's lifetime
    pub rotation_speed: f32,
}

impl Asteroid {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, rotation_speed: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(ASTEROID_SIZE),
            vel,
            rotation_angle: 0.0,
            rotation_speed,
        }
    }

    /// Random velocity per axis: magnitude in [MIN, MAX) times `speed_factor`,
    /// random sign
    pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, speed_factor: f32) -> Vec2 {
        let mut axis = || {
            let speed = rng.random::<f32>() * (MAX_ASTEROID_SPEED - MIN_ASTEROID_SPEED)
                + MIN_ASTEROID_SPEED;
            let speed = if rng.random_bool(0.5) { speed } else { -speed };
            speed * speed_factor
        };
        let x = axis();
        let y = axis();
        Vec2::new(x, y)
    }

    pub fn random_rotation_speed<R: Rng + ?Sized>(rng: &mut R) -> f32 {
        rng.random::<f32>() * 2.0 * MAX_ROTATION_SPEED - MAX_ROTATION_SPEED
    }

    /// Advance rotation by one physics tick
    pub fn rotate(&mut self) {
        self.rotation_angle = wrap_degrees(self.rotation_angle + self.rotation_speed);
    }
}

impl Hitbox for Asteroid {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// A collectible point token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub value: u32,
    pub active: bool,
    /// Session time at which the token disappears on its own
    pub expires_at_ms: u64,
}

impl Token {
    pub fn new(id: u32, pos: Vec2, spawned_at_ms: u64) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(TOKEN_SIZE),
            value: TOKEN_POINTS,
            active: true,
            expires_at_ms: spawned_at_ms + TOKEN_LIFETIME_MS as u64,
        }
    }
}

impl Hitbox for Token {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Explosion shown where the ship died
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: Vec2,
    /// Session time at which the effect ends
    pub ends_at_ms: u64,
}

impl Explosion {
    /// Remaining opacity at `now_ms`, fading 1 -> 0
    pub fn alpha(&self, now_ms: u64) -> f32 {
        let remaining = self.ends_at_ms.saturating_sub(now_ms) as f32;
        (remaining / EXPLOSION_DURATION_MS as f32).clamp(0.0, 1.0)
    }
}

/// Final result surfaced once the explosion has played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: u32,
    pub best_score: u32,
}

/// Things that happened during a tick, for renderers/audio/UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    InvulnerabilityEnded,
    TokenSpawned { id: u32, pos: Vec2 },
    TokenCollected { id: u32, value: u32, pos: Vec2 },
    TokenExpired { id: u32 },
    AsteroidsCollided { a: u32, b: u32 },
    ShipDestroyed { pos: Vec2, asteroid: u32 },
    SessionEnded(SessionSummary),
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from (for logging/replay)
    pub seed: u64,
    /// Random source for spawns and collision jitter
    pub rng: Pcg32,
    pub difficulty: Difficulty,
    pub bounds: Bounds,
    pub phase: GamePhase,
    /// Session clock in milliseconds
    pub time_ms: u64,
    /// Session time at which the spawn grace period ends
    pub invulnerable_until_ms: u64,
    pub ship: Ship,
    /// Active asteroids (stable order by id)
    pub asteroids: Vec<Asteroid>,
    /// Live tokens (stable order by id)
    pub tokens: Vec<Token>,
    pub score: Scoreboard,
    pub control: ControlState,
    pub lanes: Lanes,
    pub explosion: Option<Explosion>,
    pub summary: Option<SessionSummary>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a run with a seeded PCG source
    pub fn new(difficulty: Difficulty, bounds: Bounds, best_score: u32, seed: u64) -> Self {
        Self::with_rng(difficulty, bounds, best_score, seed, Pcg32::seed_from_u64(seed))
    }

    /// Start a run with a free-running seed
    pub fn from_entropy(difficulty: Difficulty, bounds: Bounds, best_score: u32) -> Self {
        let seed: u64 = rand::random();
        Self::new(difficulty, bounds, best_score, seed)
    }

    /// Start a run with an injected random source
    pub fn with_rng(
        difficulty: Difficulty,
        bounds: Bounds,
        best_score: u32,
        seed: u64,
        mut rng: Pcg32,
    ) -> Self {
        let ship_size = Vec2::new(SHIP_WIDTH, SHIP_HEIGHT);
        let ship = Ship::new(Ship::spawn_position(bounds, ship_size));

        let asteroid_size = Vec2::splat(ASTEROID_SIZE);
        let positions = place_asteroids(
            difficulty.asteroid_count,
            bounds,
            asteroid_size,
            ship.center(),
            SAFE_ZONE_RADIUS,
            &mut rng,
        );

        let mut state = Self {
            seed,
            rng,
            difficulty,
            bounds,
            phase: GamePhase::Invulnerable,
            time_ms: 0,
            invulnerable_until_ms: INVULNERABILITY_DURATION_MS as u64,
            ship,
            asteroids: Vec::with_capacity(positions.len()),
            tokens: Vec::new(),
            score: Scoreboard::new(difficulty.tier(), best_score),
            control: ControlState::default(),
            lanes: Lanes::start(0),
            explosion: None,
            summary: None,
            events: Vec::new(),
            next_id: 1,
        };

        for pos in positions {
            let id = state.next_entity_id();
            let vel = Asteroid::random_velocity(&mut state.rng, difficulty.asteroid_speed_factor);
            let spin = Asteroid::random_rotation_speed(&mut state.rng);
            state.asteroids.push(Asteroid::new(id, pos, vel, spin));
        }

        log::info!(
            "Session started: tier={} asteroids={} speed_factor={} seed={}",
            difficulty.tier(),
            difficulty.asteroid_count,
            difficulty.asteroid_speed_factor,
            seed
        );
        state
    }

    /// Fresh run with the same difficulty and bounds
    ///
    /// The new seed is drawn from this run's RNG.
    pub fn restart(&mut self) -> GameState {
        let seed = self.rng.random::<u64>();
        let mut next = GameState::new(self.difficulty, self.bounds, self.score.best, seed);
        next.control.use_gyroscope = self.control.use_gyroscope;
        next
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// True until the ship is destroyed
    pub fn is_game_active(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    pub fn is_invulnerable(&self) -> bool {
        self.phase == GamePhase::Invulnerable
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
