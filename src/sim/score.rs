//! Current score and the best score for the active tier

use serde::{Deserialize, Serialize};

use crate::consts::SCORE_PER_INTERVAL;
use crate::settings::DifficultyTier;

/// Score bookkeeping for one run
///
/// `current` only ever grows while the run is live. `best` is the stored best
/// for `tier`, loaded at session start and raised at game over if beaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub tier: DifficultyTier,
    pub current: u32,
    pub best: u32,
    /// Tokens picked up this run
    pub tokens_collected: u32,
}

impl Scoreboard {
    pub fn new(tier: DifficultyTier, best: u32) -> Self {
        Self {
            tier,
            current: 0,
            best,
            tokens_collected: 0,
        }
    }

    /// Survival increment, once per score interval
    pub fn add_interval(&mut self) {
        self.current = self.current.saturating_add(SCORE_PER_INTERVAL);
    }

    pub fn add_token(&mut self, value: u32) {
        self.current = self.current.saturating_add(value);
        self.tokens_collected += 1;
    }

    /// Close out the run; returns the new best if this run beat it
    pub fn finalize(&mut self) -> Option<u32> {
        if self.current > self.best {
            self.best = self.current;
            Some(self.best)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increments() {
        let mut score = Scoreboard::new(DifficultyTier::Normal, 0);
        score.add_interval();
        score.add_interval();
        score.add_token(20);
        assert_eq!(score.current, 40);
        assert_eq!(score.tokens_collected, 1);
    }

    #[test]
    fn test_finalize_improves_best() {
        let mut score = Scoreboard::new(DifficultyTier::Normal, 100);
        score.current = 150;
        assert_eq!(score.finalize(), Some(150));
        assert_eq!(score.best, 150);
    }

    #[test]
    fn test_finalize_keeps_higher_best() {
        let mut score = Scoreboard::new(DifficultyTier::Normal, 100);
        score.current = 80;
        assert_eq!(score.finalize(), None);
        assert_eq!(score.best, 100);
    }
}
