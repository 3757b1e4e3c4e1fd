//! Asteroid physics: integration, wall bounces, asteroid-asteroid collisions
//!
//! Fixed virtual timestep: velocities are units per physics tick and are not
//! scaled by wall time. Collisions swap velocities (equal-mass approximation)
//! rather than solving for momentum; a small random jitter and a hard push
//! apart keep pairs from locking into repeating bounce cycles.

use glam::Vec2;
use rand::Rng;

use super::collision::is_collision;
use super::state::Asteroid;
use crate::Bounds;
use crate::consts::{COLLISION_JITTER_MIN, COLLISION_JITTER_SPAN, COLLISION_THRESHOLD, SEPARATION_PUSH};

/// Move and spin one asteroid by a tick
#[inline]
pub fn integrate(asteroid: &mut Asteroid) {
    asteroid.pos += asteroid.vel;
    asteroid.rotate();
}

/// Bounce an asteroid off the screen edges
///
/// Each axis is handled on its own: touching or crossing an edge flips that
/// velocity component and snaps the asteroid back onto the edge. Returns true
/// if either axis bounced.
pub fn bounce_off_walls(asteroid: &mut Asteroid, bounds: Bounds) -> bool {
    let mut bounced = false;

    let left = asteroid.pos.x;
    let right = left + asteroid.size.x;
    if left <= 0.0 || right >= bounds.width {
        asteroid.vel.x = -asteroid.vel.x;
        asteroid.pos.x = if left <= 0.0 {
            0.0
        } else {
            bounds.width - asteroid.size.x
        };
        bounced = true;
    }

    let top = asteroid.pos.y;
    let bottom = top + asteroid.size.y;
    if top <= 0.0 || bottom >= bounds.height {
        asteroid.vel.y = -asteroid.vel.y;
        asteroid.pos.y = if top <= 0.0 {
            0.0
        } else {
            bounds.height - asteroid.size.y
        };
        bounced = true;
    }

    bounced
}

/// Swap two asteroids' velocity vectors
#[inline]
pub fn exchange_velocities(a: &mut Asteroid, b: &mut Asteroid) {
    std::mem::swap(&mut a.vel, &mut b.vel);
}

/// Scale each velocity component by an independent factor in [0.95, 1.05)
pub fn jitter_velocity<R: Rng + ?Sized>(vel: Vec2, rng: &mut R) -> Vec2 {
    let mut factor = || COLLISION_JITTER_MIN + rng.random::<f32>() * COLLISION_JITTER_SPAN;
    let fx = factor();
    let fy = factor();
    Vec2::new(vel.x * fx, vel.y * fy)
}

/// Push two asteroids apart by a fixed amount on each axis
///
/// Direction follows the sign of the position delta. Equal coordinates push
/// `a` toward positive and `b` toward negative, so coincident asteroids still
/// separate without any division by their distance.
pub fn separate(a: &mut Asteroid, b: &mut Asteroid) {
    let push = Vec2::new(
        if b.pos.x > a.pos.x { SEPARATION_PUSH } else { -SEPARATION_PUSH },
        if b.pos.y > a.pos.y { SEPARATION_PUSH } else { -SEPARATION_PUSH },
    );
    a.pos -= push;
    b.pos += push;
}

/// Full response to one colliding pair
pub fn resolve_collision<R: Rng + ?Sized>(a: &mut Asteroid, b: &mut Asteroid, rng: &mut R) {
    exchange_velocities(a, b);
    a.vel = jitter_velocity(a.vel, rng);
    b.vel = jitter_velocity(b.vel, rng);
    separate(a, b);
}

/// Advance every asteroid by one physics tick
///
/// Integrate, bounce off walls, then resolve every colliding pair in index
/// order. Colliding pairs are appended to `collided` as `(id_a, id_b)`.
/// Positions are clamped on screen at the end, since the separation push can
/// nudge an asteroid that was sitting on an edge.
pub fn step_asteroids<R: Rng + ?Sized>(
    asteroids: &mut [Asteroid],
    bounds: Bounds,
    rng: &mut R,
    collided: &mut Vec<(u32, u32)>,
) {
    for asteroid in asteroids.iter_mut() {
        integrate(asteroid);
        bounce_off_walls(asteroid, bounds);
    }

    for i in 0..asteroids.len() {
        let (head, tail) = asteroids.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if is_collision(a, b, COLLISION_THRESHOLD) {
                resolve_collision(a, b, rng);
                collided.push((a.id, b.id));
            }
        }
    }

    for asteroid in asteroids.iter_mut() {
        asteroid.pos = bounds.clamp(asteroid.pos, asteroid.size);
    }
}
