//! Best score per difficulty tier
//!
//! Three independent slots (easy, normal, hard) kept in a [`BestScoreStore`].
//! Read at session start, written back at game over only when beaten.

use serde::{Deserialize, Serialize};

use crate::persistence::BestScoreStore;
use crate::settings::DifficultyTier;

/// Key that mirrors the most recent improved best across all tiers
pub const LEGACY_BEST_KEY: &str = "BestScore";

/// A tier and its stored best, for menu listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBest {
    pub tier: DifficultyTier,
    pub best: u32,
}

/// Best-score bookkeeping on top of a store
pub struct BestScores;

impl BestScores {
    /// Stored best for a tier (0 if never set)
    pub fn load<S: BestScoreStore + ?Sized>(store: &S, tier: DifficultyTier) -> u32 {
        store.read(tier.storage_key()).unwrap_or(0)
    }

    /// Record a finished run's score
    ///
    /// Writes only if `score` beats the stored best for `tier`. Returns the
    /// new best when it was improved.
    pub fn record<S: BestScoreStore + ?Sized>(
        store: &mut S,
        tier: DifficultyTier,
        score: u32,
    ) -> Option<u32> {
        let stored = Self::load(store, tier);
        if score <= stored {
            return None;
        }
        store.write(tier.storage_key(), score);
        store.write(LEGACY_BEST_KEY, score);
        log::info!("New {} best score: {} (was {})", tier, score, stored);
        Some(score)
    }

    /// Stored best for every tier
    pub fn all<S: BestScoreStore + ?Sized>(store: &S) -> [TierBest; 3] {
        DifficultyTier::ALL.map(|tier| TierBest {
            tier,
            best: Self::load(store, tier),
        })
    }
}
