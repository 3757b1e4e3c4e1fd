//! Launch settings and difficulty tiers
//!
//! Chosen on the menu before a session starts and persisted separately from
//! best scores.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TIE_SPEED, TIE_SPEED_MAX};
use crate::error::{GameError, Result};

/// Difficulty tier; also the key under which best scores are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DifficultyTier {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Normal,
        DifficultyTier::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Normal => "Normal",
            DifficultyTier::Hard => "Hard",
        }
    }

    /// Number of asteroids in play
    pub fn asteroid_count(&self) -> usize {
        match self {
            DifficultyTier::Easy => 3,
            DifficultyTier::Normal => 4,
            DifficultyTier::Hard => 5,
        }
    }

    /// Multiplier applied to asteroid spawn velocities
    pub fn speed_factor(&self) -> f32 {
        match self {
            DifficultyTier::Easy => 0.7,
            DifficultyTier::Normal => 1.0,
            DifficultyTier::Hard => 1.3,
        }
    }

    /// Best-score store key for this tier
    pub fn storage_key(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "BestScoreEasy",
            DifficultyTier::Normal => "BestScoreNormal",
            DifficultyTier::Hard => "BestScoreHard",
        }
    }

    /// Tier for a raw asteroid count; counts other than 3 and 4 are hard
    pub fn from_asteroid_count(count: usize) -> Self {
        match count {
            3 => DifficultyTier::Easy,
            4 => DifficultyTier::Normal,
            _ => DifficultyTier::Hard,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyTier {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(DifficultyTier::Easy),
            "normal" | "medium" => Ok(DifficultyTier::Normal),
            "hard" => Ok(DifficultyTier::Hard),
            _ => Err(GameError::UnknownTier(s.to_string())),
        }
    }
}

/// Per-session difficulty parameters, immutable once a session starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub asteroid_count: usize,
    pub asteroid_speed_factor: f32,
    /// Ship displacement per movement tick at full stick deflection
    pub tie_speed: f32,
}

impl Difficulty {
    pub fn new(asteroid_count: usize, asteroid_speed_factor: f32, tie_speed: f32) -> Self {
        Self {
            asteroid_count,
            asteroid_speed_factor,
            tie_speed,
        }
    }

    pub fn from_tier(tier: DifficultyTier, tie_speed: f32) -> Self {
        Self::new(tier.asteroid_count(), tier.speed_factor(), tie_speed)
    }

    /// Tier used to key best-score storage
    pub fn tier(&self) -> DifficultyTier {
        DifficultyTier::from_asteroid_count(self.asteroid_count)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::from_tier(DifficultyTier::default(), DEFAULT_TIE_SPEED)
    }
}

/// Launch settings picked on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty tier
    pub tier: DifficultyTier,
    /// Ship speed slider value
    pub tie_speed: f32,
    /// Steer with device tilt when the joystick is not held
    pub use_gyroscope: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tier: DifficultyTier::Normal,
            tie_speed: DEFAULT_TIE_SPEED,
            use_gyroscope: false,
        }
    }
}

impl Settings {
    /// Set the ship speed, clamped to the slider range
    pub fn set_tie_speed(&mut self, speed: f32) {
        self.tie_speed = if speed.is_finite() {
            speed.clamp(0.0, TIE_SPEED_MAX)
        } else {
            DEFAULT_TIE_SPEED
        };
    }

    /// Difficulty parameters for a session launched with these settings
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_tier(self.tier, self.tie_speed.clamp(0.0, TIE_SPEED_MAX))
    }

    /// Read settings from a JSON file
    pub fn try_load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.set_tie_speed(settings.tie_speed);
        Ok(settings)
    }

    /// Read settings, falling back to defaults if missing or unreadable
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| GameError::io(path, e))?;
        log::info!("Settings saved");
        Ok(())
    }
}
