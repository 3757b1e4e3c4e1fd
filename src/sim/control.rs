//! Control mapping: joystick/tilt samples to ship displacement
//!
//! Both input sources are reduced to one normalized vector in [-1, 1]². The
//! movement lane then applies `pos + vector * tie_speed`, clamped on screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::consts::{TILT_GAIN, TILT_SENSITIVITY};

/// Joystick radii at or below this produce no movement
const MIN_JOYSTICK_RADIUS: f32 = 1e-3;

/// A raw input sample from an external input decoder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlSample {
    /// Joystick held, dragged `offset` away from its center
    Joystick { offset: Vec2, radius: f32 },
    /// Joystick let go; the pad recenters
    JoystickReleased,
    /// Tilt sensor reading (x = left/right, y = forward/back)
    Tilt(Vec2),
}

/// Normalize a joystick drag offset into the unit disc
///
/// Offsets past the rim are clamped onto it. A zero radius gives no movement.
pub fn normalize_joystick(offset: Vec2, radius: f32) -> Vec2 {
    if radius.is_nan() || radius <= MIN_JOYSTICK_RADIUS || !offset.is_finite() {
        return Vec2::ZERO;
    }
    offset.clamp_length_max(radius) / radius
}

/// Map a tilt reading to a control vector
///
/// Tilting right reads as negative x on the sensor, hence the flip.
pub fn tilt_to_vector(tilt: Vec2) -> Vec2 {
    if !tilt.is_finite() {
        return Vec2::ZERO;
    }
    let scaled = Vec2::new(-tilt.x, tilt.y) * TILT_SENSITIVITY * TILT_GAIN;
    scaled.clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Next top-left ship position for one movement tick
pub fn displace(pos: Vec2, size: Vec2, vector: Vec2, tie_speed: f32, bounds: Bounds) -> Vec2 {
    let vector = vector.clamp(Vec2::NEG_ONE, Vec2::ONE);
    bounds.clamp(pos + vector * tie_speed, size)
}

/// Latest control input, last value wins
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlState {
    pub use_gyroscope: bool,
    /// Normalized joystick vector while held
    joystick: Option<Vec2>,
    /// Latest tilt-derived vector
    tilt: Vec2,
}

impl ControlState {
    pub fn new(use_gyroscope: bool) -> Self {
        Self {
            use_gyroscope,
            joystick: None,
            tilt: Vec2::ZERO,
        }
    }

    /// Replace the retained sample for the sample's source
    pub fn apply(&mut self, sample: ControlSample) {
        match sample {
            ControlSample::Joystick { offset, radius } => {
                self.joystick = Some(normalize_joystick(offset, radius));
            }
            ControlSample::JoystickReleased => self.joystick = None,
            ControlSample::Tilt(tilt) => self.tilt = tilt_to_vector(tilt),
        }
    }

    pub fn joystick_held(&self) -> bool {
        self.joystick.is_some()
    }

    /// Vector to apply on the next movement tick
    ///
    /// A held joystick wins over tilt; tilt only counts with the gyroscope on.
    pub fn vector(&self) -> Vec2 {
        match self.joystick {
            Some(v) => v,
            None if self.use_gyroscope => self.tilt,
            None => Vec2::ZERO,
        }
    }
}
