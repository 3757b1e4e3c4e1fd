//! Asteroid Dodge - an arcade asteroid-avoidance game engine
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, collisions, game state)
//! - `session`: Single-writer driver that owns a running session
//! - `persistence`: Best-score storage backends
//! - `highscores`: Best score per difficulty tier
//! - `settings`: Launch settings and difficulty tiers

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use highscores::BestScores;
pub use session::{AfterGame, EndChoice, Session};
pub use settings::{Difficulty, DifficultyTier, Settings};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
///
/// All intervals are in milliseconds. Velocities are in position units per
/// physics tick (fixed virtual timestep, not scaled by wall time).
pub mod consts {
    /// Collision forgiveness used for ship, token and asteroid checks
    pub const COLLISION_THRESHOLD: f32 = 0.2;

    /// Lane intervals
    pub const MOVEMENT_INTERVAL_MS: u32 = 10;
    pub const PHYSICS_UPDATE_INTERVAL_MS: u32 = 16;
    pub const COLLISION_CHECK_INTERVAL_MS: u32 = 10;
    pub const SCORE_INCREMENT_INTERVAL_MS: u32 = 1000;
    pub const TOKEN_SPAWN_INTERVAL_MS: u32 = 2000;
    pub const BLINK_INTERVAL_MS: u32 = 200;

    /// One-shot timers
    pub const INVULNERABILITY_DURATION_MS: u32 = 2000;
    pub const EXPLOSION_DURATION_MS: u32 = 500;
    pub const TOKEN_LIFETIME_MS: u32 = 8000;

    /// Longest wall-clock frame the session driver will simulate at once
    pub const MAX_FRAME_MS: u32 = 100;

    /// Score
    pub const SCORE_PER_INTERVAL: u32 = 10;
    pub const TOKEN_POINTS: u32 = 20;

    /// Asteroid physics
    pub const MIN_ASTEROID_SPEED: f32 = 8.0;
    pub const MAX_ASTEROID_SPEED: f32 = 12.0;
    pub const MAX_ROTATION_SPEED: f32 = 3.0; // degrees per physics tick
    pub const COLLISION_JITTER_MIN: f32 = 0.95;
    pub const COLLISION_JITTER_SPAN: f32 = 0.1;
    pub const SEPARATION_PUSH: f32 = 2.0;

    /// Entity sizes
    pub const ASTEROID_SIZE: f32 = 120.0;
    pub const SHIP_WIDTH: f32 = 100.0;
    pub const SHIP_HEIGHT: f32 = 100.0;
    pub const TOKEN_SIZE: f32 = 50.0;

    /// Tokens
    pub const MAX_POINT_TOKENS: usize = 1;

    /// Spawner
    pub const SAFE_ZONE_RADIUS: f32 = 200.0;
    pub const ASTEROID_PLACEMENT_ATTEMPTS: u32 = 100;
    pub const TOKEN_PLACEMENT_ATTEMPTS: u32 = 50;
    pub const TOKEN_ASTEROID_CLEARANCE: f32 = 150.0;
    pub const FALLBACK_CORNER_INSET: f32 = 200.0;

    /// Controls
    pub const DEFAULT_TIE_SPEED: f32 = 10.0;
    pub const TIE_SPEED_MAX: f32 = 20.0;
    pub const TILT_SENSITIVITY: f32 = 0.05;
    pub const TILT_GAIN: f32 = 0.1;

    /// Ship alpha while blinking out
    pub const INVULNERABLE_ALPHA: f32 = 0.3;
}

/// Screen bounds in entity coordinate units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a top-left position so a box of `size` stays on screen
    #[inline]
    pub fn clamp(&self, pos: Vec2, size: Vec2) -> Vec2 {
        let max_x = (self.width - size.x).max(0.0);
        let max_y = (self.height - size.y).max(0.0);
        Vec2::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Wrap an angle in degrees into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
