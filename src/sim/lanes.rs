//! Periodic lanes
//!
//! Each lane is an independently clocked responsibility with its own
//! interval. Instead of self-rescheduling timers, the tick loop asks for the
//! earliest due time, runs every lane due at that instant in a fixed order,
//! and reschedules them. Cancelling a lane drops its next due time.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Periodic responsibilities, in the order they run at a shared instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Blink,
    Movement,
    Physics,
    Collision,
    Score,
    TokenSpawn,
}

impl Lane {
    pub const ALL: [Lane; 6] = [
        Lane::Blink,
        Lane::Movement,
        Lane::Physics,
        Lane::Collision,
        Lane::Score,
        Lane::TokenSpawn,
    ];

    pub fn interval_ms(&self) -> u32 {
        match self {
            Lane::Blink => BLINK_INTERVAL_MS,
            Lane::Movement => MOVEMENT_INTERVAL_MS,
            Lane::Physics => PHYSICS_UPDATE_INTERVAL_MS,
            Lane::Collision => COLLISION_CHECK_INTERVAL_MS,
            Lane::Score => SCORE_INCREMENT_INTERVAL_MS,
            Lane::TokenSpawn => TOKEN_SPAWN_INTERVAL_MS,
        }
    }

    /// Delay before the first run after a session starts
    pub fn first_delay_ms(&self) -> u32 {
        match self {
            Lane::Score | Lane::TokenSpawn => self.interval_ms(),
            _ => 0,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Next due time per lane; `None` means cancelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lanes {
    next_due_ms: [Option<u64>; 6],
}

impl Lanes {
    /// Schedule every lane relative to `now_ms`
    pub fn start(now_ms: u64) -> Self {
        Self {
            next_due_ms: Lane::ALL.map(|lane| Some(now_ms + lane.first_delay_ms() as u64)),
        }
    }

    pub fn next_due(&self, lane: Lane) -> Option<u64> {
        self.next_due_ms[lane.index()]
    }

    /// Earliest due time across all scheduled lanes
    pub fn earliest(&self) -> Option<u64> {
        self.next_due_ms.iter().flatten().min().copied()
    }

    /// Whether `lane` is due at exactly `now_ms`
    pub fn is_due(&self, lane: Lane, now_ms: u64) -> bool {
        self.next_due(lane) == Some(now_ms)
    }

    /// Push `lane` one interval past its current due time
    pub fn reschedule(&mut self, lane: Lane) {
        if let Some(due) = &mut self.next_due_ms[lane.index()] {
            *due += lane.interval_ms() as u64;
        }
    }

    pub fn cancel(&mut self, lane: Lane) {
        self.next_due_ms[lane.index()] = None;
    }

    pub fn cancel_all(&mut self) {
        self.next_due_ms = [None; 6];
    }

    pub fn is_scheduled(&self, lane: Lane) -> bool {
        self.next_due(lane).is_some()
    }

    pub fn any_scheduled(&self) -> bool {
        self.next_due_ms.iter().any(Option::is_some)
    }
}
