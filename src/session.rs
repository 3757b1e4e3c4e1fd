//! Session driver
//!
//! Owns the one [`GameState`] of a run together with the best-score store,
//! and is the only thing that mutates either. Input decoders push samples in
//! whenever they arrive (last value wins); the host calls [`Session::advance`]
//! once per frame with wall-clock time.

use crate::consts::MAX_FRAME_MS;
use crate::highscores::BestScores;
use crate::persistence::BestScoreStore;
use crate::settings::Settings;
use crate::sim::{ControlSample, ControlState, GameEvent, GameState, SessionSummary, TickInput, tick};
use crate::Bounds;

/// What the player picked on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndChoice {
    /// New run, same difficulty
    Restart,
    /// Leave the session
    Menu,
}

/// Result of [`Session::choose`]
pub enum AfterGame<S: BestScoreStore> {
    Playing(Session<S>),
    /// Session torn down; the store is handed back to the menu
    Menu(S),
}

pub struct Session<S: BestScoreStore> {
    state: GameState,
    store: S,
    use_gyroscope: bool,
    /// Latest control sample not yet consumed by a tick
    pending: Option<ControlSample>,
    /// Sub-millisecond remainder carried between frames
    accumulator_ms: f32,
}

impl<S: BestScoreStore> Session<S> {
    /// Start a run with a free-running seed
    pub fn start(settings: &Settings, bounds: Bounds, store: S) -> Self {
        Self::start_seeded(settings, bounds, store, rand::random())
    }

    /// Start a run with a fixed seed
    pub fn start_seeded(settings: &Settings, bounds: Bounds, store: S, seed: u64) -> Self {
        let difficulty = settings.difficulty();
        let best = BestScores::load(&store, difficulty.tier());
        let mut state = GameState::new(difficulty, bounds, best, seed);
        state.control = ControlState::new(settings.use_gyroscope);
        Self {
            state,
            store,
            use_gyroscope: settings.use_gyroscope,
            pending: None,
            accumulator_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that script scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record an input sample; only the newest one reaches the next tick
    pub fn push_control(&mut self, sample: ControlSample) {
        self.pending = Some(sample);
    }

    /// Advance by a frame of wall-clock time (seconds)
    ///
    /// Long frames are capped so a stalled host does not fast-forward the run.
    pub fn advance(&mut self, dt_secs: f32) -> Vec<GameEvent> {
        let dt_ms = if dt_secs.is_finite() {
            (dt_secs * 1000.0).clamp(0.0, MAX_FRAME_MS as f32)
        } else {
            0.0
        };
        self.accumulator_ms += dt_ms;
        let whole = self.accumulator_ms.floor();
        self.accumulator_ms -= whole;
        self.advance_ms(whole as u32)
    }

    /// Advance by whole milliseconds of session time
    pub fn advance_ms(&mut self, elapsed_ms: u32) -> Vec<GameEvent> {
        let input = TickInput {
            control: self.pending.take(),
        };
        tick(&mut self.state, &input, elapsed_ms);

        let events = self.state.drain_events();
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::ShipDestroyed { .. }))
        {
            BestScores::record(&mut self.store, self.state.score.tier, self.state.score.current);
        }
        events
    }

    /// Final score and best, once the explosion has played out
    pub fn end_signal(&self) -> Option<SessionSummary> {
        self.state.summary
    }

    /// Replace the run with a brand new one at the same difficulty
    pub fn restart(&mut self) {
        self.state.lanes.cancel_all();
        let mut next = self.state.restart();
        next.score.best = BestScores::load(&self.store, next.score.tier);
        next.control = ControlState::new(self.use_gyroscope);
        log::info!("Session restarted (seed {})", next.seed);
        self.state = next;
        self.pending = None;
        self.accumulator_ms = 0.0;
    }

    /// Tear the session down and hand back the store
    pub fn exit(mut self) -> S {
        self.state.lanes.cancel_all();
        log::info!("Session closed at {} ms", self.state.time_ms);
        self.store
    }

    /// Apply the game-over choice
    pub fn choose(mut self, choice: EndChoice) -> AfterGame<S> {
        match choice {
            EndChoice::Restart => {
                self.restart();
                AfterGame::Playing(self)
            }
            EndChoice::Menu => AfterGame::Menu(self.exit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::settings::DifficultyTier;
    use crate::sim::GamePhase;
    use glam::Vec2;

    fn bounds() -> Bounds {
        Bounds::new(1080.0, 1920.0)
    }

    fn normal_settings() -> Settings {
        Settings {
            tier: DifficultyTier::Normal,
            ..Settings::default()
        }
    }

    /// Freeze asteroids and park one on the ship so it dies at t=2000
    fn doomed_session(store: MemoryStore, starting_score: u32) -> Session<MemoryStore> {
        let mut session = Session::start_seeded(&normal_settings(), bounds(), store, 321);
        let state = session.state_mut();
        for a in &mut state.asteroids {
            a.vel = Vec2::ZERO;
        }
        state.asteroids[0].pos = state.ship.pos;
        state.score.current = starting_score;
        session
    }

    #[test]
    fn test_best_loaded_at_start() {
        let store = MemoryStore::with_values([("BestScoreNormal", 100)]);
        let session = Session::start_seeded(&normal_settings(), bounds(), store, 1);
        assert_eq!(session.state().score.best, 100);
    }

    #[test]
    fn test_improved_best_written_at_game_over() {
        let store = MemoryStore::with_values([("BestScoreNormal", 100)]);
        let mut session = doomed_session(store, 140);

        session.advance_ms(2000);
        assert_eq!(session.state().phase, GamePhase::GameOver);
        assert_eq!(session.state().score.current, 150);
        assert_eq!(session.store().read("BestScoreNormal"), Some(150));
    }

    #[test]
    fn test_lower_score_leaves_best_alone() {
        let store = MemoryStore::with_values([("BestScoreNormal", 100)]);
        let mut session = doomed_session(store, 70);

        session.advance_ms(2000);
        assert_eq!(session.state().score.current, 80);
        assert_eq!(session.store().read("BestScoreNormal"), Some(100));
    }

    #[test]
    fn test_end_signal_after_explosion() {
        let mut session = doomed_session(MemoryStore::new(), 0);
        session.advance_ms(2000);
        assert_eq!(session.end_signal(), None);

        let events = session.advance_ms(500);
        let summary = SessionSummary {
            final_score: 10,
            best_score: 10,
        };
        assert_eq!(session.end_signal(), Some(summary));
        assert!(events.contains(&GameEvent::SessionEnded(summary)));
    }

    #[test]
    fn test_restart_is_fresh_and_reloads_best() {
        let mut session = doomed_session(MemoryStore::new(), 40);
        session.advance_ms(2500);
        assert_eq!(session.store().read("BestScoreNormal"), Some(50));

        match session.choose(EndChoice::Restart) {
            AfterGame::Playing(session) => {
                let state = session.state();
                assert_eq!(state.phase, GamePhase::Invulnerable);
                assert_eq!(state.time_ms, 0);
                assert_eq!(state.score.current, 0);
                assert_eq!(state.score.best, 50);
                assert_eq!(state.asteroids.len(), 4);
                assert!(state.summary.is_none());
            }
            AfterGame::Menu(_) => panic!("expected a new session"),
        }
    }

    #[test]
    fn test_menu_returns_store() {
        let mut session = doomed_session(MemoryStore::new(), 90);
        session.advance_ms(2500);
        match session.choose(EndChoice::Menu) {
            AfterGame::Menu(store) => assert_eq!(store.read("BestScoreNormal"), Some(100)),
            AfterGame::Playing(_) => panic!("expected the menu"),
        }
    }

    #[test]
    fn test_frame_accumulator_carries_remainder() {
        let mut session = Session::start_seeded(&normal_settings(), bounds(), MemoryStore::new(), 8);
        for a in &mut session.state_mut().asteroids {
            a.vel = Vec2::ZERO;
        }
        for _ in 0..4 {
            session.advance(0.0125);
        }
        assert_eq!(session.state().time_ms, 50);
    }

    #[test]
    fn test_long_frame_capped() {
        let mut session = Session::start_seeded(&normal_settings(), bounds(), MemoryStore::new(), 8);
        session.advance(5.0);
        assert_eq!(session.state().time_ms, MAX_FRAME_MS as u64);
        session.advance(f32::NAN);
        assert_eq!(session.state().time_ms, MAX_FRAME_MS as u64);
    }

    #[test]
    fn test_latest_control_sample_wins() {
        let mut session = Session::start_seeded(&normal_settings(), bounds(), MemoryStore::new(), 8);
        for a in &mut session.state_mut().asteroids {
            a.vel = Vec2::ZERO;
        }
        let start = session.state().ship.pos;
        session.push_control(ControlSample::Joystick {
            offset: Vec2::new(-100.0, 0.0),
            radius: 100.0,
        });
        session.push_control(ControlSample::Joystick {
            offset: Vec2::new(0.0, 100.0),
            radius: 100.0,
        });
        // Movement at t=0 only
        session.advance_ms(0);
        assert_eq!(session.state().ship.pos, start + Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_gyroscope_setting_reaches_controls() {
        let settings = Settings {
            use_gyroscope: true,
            ..normal_settings()
        };
        let mut session = Session::start_seeded(&settings, bounds(), MemoryStore::new(), 2);
        assert!(session.state().control.use_gyroscope);
        session.restart();
        assert!(session.state().control.use_gyroscope);
    }
}
