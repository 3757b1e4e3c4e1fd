//! Spawn placement for asteroids and tokens
//!
//! Rejection sampling with a bounded number of attempts. When the attempts run
//! out (too many asteroids for the screen, a ship parked in the only gap) the
//! spawner falls back instead of looping forever:
//! - asteroids go to the corner region opposite the ship
//! - tokens keep the last candidate, unchecked

use glam::Vec2;
use rand::Rng;

use crate::consts::{
    ASTEROID_PLACEMENT_ATTEMPTS, FALLBACK_CORNER_INSET, TOKEN_ASTEROID_CLEARANCE,
    TOKEN_PLACEMENT_ATTEMPTS,
};
use crate::{Bounds, distance};

/// Top-left positions for `count` asteroids of `size`
///
/// Candidates are drawn one asteroid-size in from every edge. A candidate is
/// rejected if its center lies within `safe_radius` of `ship_center`, or
/// within two asteroid widths of an asteroid already placed.
pub fn place_asteroids<R: Rng + ?Sized>(
    count: usize,
    bounds: Bounds,
    size: Vec2,
    ship_center: Vec2,
    safe_radius: f32,
    rng: &mut R,
) -> Vec<Vec2> {
    let half = size * 0.5;
    let span = Vec2::new(
        (bounds.width - 2.0 * size.x).max(0.0),
        (bounds.height - 2.0 * size.y).max(0.0),
    );
    let min_separation = size.x * 2.0;

    let mut placed: Vec<Vec2> = Vec::with_capacity(count);
    for index in 0..count {
        let mut position = None;
        for _ in 0..ASTEROID_PLACEMENT_ATTEMPTS {
            let candidate = Vec2::new(
                rng.random::<f32>() * span.x + size.x,
                rng.random::<f32>() * span.y + size.y,
            );
            let center = candidate + half;

            let crowded = placed
                .iter()
                .any(|other| distance(center, *other + half) < min_separation);
            if crowded || distance(center, ship_center) < safe_radius {
                continue;
            }
            position = Some(candidate);
            break;
        }

        let position = position.unwrap_or_else(|| {
            let fallback = fallback_corner(bounds, size, ship_center);
            log::warn!(
                "Asteroid {} placement exhausted {} attempts, using corner {:?}",
                index,
                ASTEROID_PLACEMENT_ATTEMPTS,
                fallback
            );
            fallback
        });
        placed.push(position);
    }
    placed
}

/// Deterministic placement in the quadrant opposite the ship
pub fn fallback_corner(bounds: Bounds, size: Vec2, ship_center: Vec2) -> Vec2 {
    let x = if ship_center.x < bounds.width / 2.0 {
        bounds.width - FALLBACK_CORNER_INSET
    } else {
        FALLBACK_CORNER_INSET
    };
    let y = if ship_center.y < bounds.height / 2.0 {
        bounds.height - FALLBACK_CORNER_INSET
    } else {
        FALLBACK_CORNER_INSET
    };
    bounds.clamp(Vec2::new(x, y), size)
}

/// Top-left position for a new token of `size`
///
/// The token center must be at least `safe_radius` from the ship center and
/// the asteroid clearance from every asteroid center.
pub fn place_token<R: Rng + ?Sized>(
    bounds: Bounds,
    size: Vec2,
    ship_center: Vec2,
    safe_radius: f32,
    asteroid_centers: &[Vec2],
    rng: &mut R,
) -> Vec2 {
    let half = size * 0.5;
    let span = Vec2::new(
        (bounds.width - size.x).max(0.0),
        (bounds.height - size.y).max(0.0),
    );

    let mut candidate = Vec2::ZERO;
    for _ in 0..TOKEN_PLACEMENT_ATTEMPTS {
        candidate = Vec2::new(rng.random::<f32>() * span.x, rng.random::<f32>() * span.y);
        let center = candidate + half;

        if distance(center, ship_center) < safe_radius {
            continue;
        }
        if asteroid_centers
            .iter()
            .any(|a| distance(center, *a) < TOKEN_ASTEROID_CLEARANCE)
        {
            continue;
        }
        return candidate;
    }

    log::debug!(
        "Token placement exhausted {} attempts, keeping {:?}",
        TOKEN_PLACEMENT_ATTEMPTS,
        candidate
    );
    candidate
}
