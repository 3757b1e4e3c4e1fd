//! Circle-overlap collision predicate
//!
//! Every entity is an axis-aligned box positioned by its top-left corner. For
//! collision purposes the box is treated as a circle around its center with
//! radius `(width + height) / 4`, and a forgiveness threshold shrinks the
//! combined radius so sprites can visually overlap a little before it counts.

use glam::Vec2;

use crate::distance;

/// Anything with a top-left position and a fixed size
pub trait Hitbox {
    /// Top-left corner
    fn position(&self) -> Vec2;

    /// Width and height
    fn size(&self) -> Vec2;

    #[inline]
    fn center(&self) -> Vec2 {
        self.position() + self.size() * 0.5
    }

    /// Collision radius (average of width and height, halved)
    #[inline]
    fn radius(&self) -> f32 {
        let size = self.size();
        (size.x + size.y) / 4.0
    }
}

/// A bare box, used for candidate positions and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }
}

impl Hitbox for Rect {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}

/// Center distance below which two radii count as colliding
///
/// `threshold` is the forgiveness factor in [0, 1]; 0 keeps the full combined
/// radius, 1 halves it.
#[inline]
pub fn collision_distance(radius_a: f32, radius_b: f32, threshold: f32) -> f32 {
    (radius_a + radius_b) * (1.0 - threshold * 0.5)
}

/// Check whether two hitboxes overlap
///
/// Pure function of the two snapshots: the same inputs always give the same
/// answer.
pub fn is_collision<A, B>(a: &A, b: &B, threshold: f32) -> bool
where
    A: Hitbox + ?Sized,
    B: Hitbox + ?Sized,
{
    distance(a.center(), b.center()) < collision_distance(a.radius(), b.radius(), threshold)
}
