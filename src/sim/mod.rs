//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed virtual timestep per lane, integer millisecond clock
//! - One injectable RNG per session (seeded PCG)
//! - Stable iteration order (by entity ID)
//! - No rendering, input decoding or storage dependencies

pub mod collision;
pub mod control;
pub mod lanes;
pub mod physics;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, Rect, collision_distance, is_collision};
pub use control::{ControlSample, ControlState, displace, normalize_joystick, tilt_to_vector};
pub use lanes::{Lane, Lanes};
pub use physics::step_asteroids;
pub use score::Scoreboard;
pub use spawner::{place_asteroids, place_token};
pub use state::{
    Asteroid, Explosion, GameEvent, GamePhase, GameState, SessionSummary, Ship, Token,
};
pub use tick::{TickInput, tick};
