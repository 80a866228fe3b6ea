//! Game state machine and the per-frame tick
//!
//! One `tick` per rendered frame while running. Every physics delta is per
//! tick, so simulation speed follows the host's frame rate.

use super::collision::{self, Crash};
use super::state::{GamePhase, Session, Snapshot};
use crate::highscores::{GameResult, ScoreTracker};
use crate::persistence::PersistentStore;
use crate::platform::{Command, ViewportProvider};
use crate::tuning::Tuning;

/// Owns the session, the score tracker and the best-score store
pub struct Game<S: PersistentStore> {
    phase: GamePhase,
    session: Option<Session>,
    scores: ScoreTracker,
    store: S,
    tuning: Tuning,
    /// Base seed; each session derives its own from this
    seed: u64,
    sessions_started: u64,
    last_result: Option<GameResult>,
}

impl<S: PersistentStore> Game<S> {
    /// Create an idle game, reading the best score from `store`
    pub fn new(store: S, tuning: Tuning, seed: u64) -> Self {
        let scores = ScoreTracker::load(&store);
        Self {
            phase: GamePhase::Idle,
            session: None,
            scores,
            store,
            tuning,
            seed,
            sessions_started: 0,
            last_result: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn scores(&self) -> &ScoreTracker {
        &self.scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Summary of the most recent game over
    pub fn last_result(&self) -> Option<GameResult> {
        self.last_result
    }

    /// Idle/GameOver -> Running with a fresh session
    pub fn start(&mut self, now_ms: f64, viewport: &dyn ViewportProvider) {
        if self.phase.has_session() {
            return;
        }
        let seed = self.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;

        let dims = viewport.dimensions();
        self.session = Some(Session::new(dims, &self.tuning, seed, now_ms));
        self.scores.reset_session();
        self.phase = GamePhase::Running;
        log::info!(
            "Session started: viewport {}x{}, scale {:.2}, seed {}",
            dims.width,
            dims.height,
            dims.scale(),
            seed
        );
    }

    /// Running -> Paused
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::debug!("Paused");
        }
    }

    /// Paused -> Running, rescheduling the next spawn
    pub fn resume(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Paused {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.stream.realign_after_resume(now_ms);
        }
        self.phase = GamePhase::Running;
        log::debug!("Resumed at t={:.0}ms", now_ms);
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(now_ms),
            GamePhase::Idle | GamePhase::GameOver => {}
        }
    }

    /// Trigger impulse outside of a tick; ignored unless running
    pub fn flap(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.flyer.apply_impulse();
        }
    }

    /// Dispatch a mapped input command
    pub fn handle(&mut self, command: Command, now_ms: f64, viewport: &dyn ViewportProvider) {
        match command {
            Command::Flap => self.flap(),
            Command::TogglePause => self.toggle_pause(now_ms),
            Command::Start => self.start(now_ms, viewport),
        }
    }

    /// Current state without advancing anything
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.phase,
            self.session.as_ref(),
            self.scores.current(),
            self.scores.best(),
        )
    }

    /// Advance one frame
    ///
    /// Order: impulse, obstacles (spawn/advance/reap), flyer physics,
    /// collisions, score and difficulty, then the terminal transition.
    /// Does nothing unless running.
    pub fn tick(&mut self, now_ms: f64, trigger_impulse: bool) -> Snapshot {
        if self.phase != GamePhase::Running {
            return self.snapshot();
        }
        let Some(session) = self.session.as_mut() else {
            return self.snapshot();
        };

        if trigger_impulse {
            session.flyer.apply_impulse();
        }

        // Obstacles
        session.maybe_spawn(now_ms);
        session.stream.advance();
        session.stream.reap_offscreen();
        session.scroll();

        // Physics
        session.flyer.apply_gravity();
        session.flyer.integrate();

        // Collisions
        let ground_y = session.ground_y();
        let crash = collision::adjudicate(
            &mut session.flyer,
            &session.stream.pairs,
            session.stream.width(),
            ground_y,
        );

        // Score, ramping once per increment so no milestone is skipped
        let passed = session.stream.mark_passed(session.flyer.left());
        for _ in 0..passed {
            let score = self.scores.record_pass();
            session.stream.apply_difficulty_ramp(score);
        }

        session.ticks += 1;

        match crash {
            Some(crash) => self.game_over(crash),
            None => self.snapshot(),
        }
    }

    /// Running -> GameOver: finalize the score and drop the session
    fn game_over(&mut self, crash: Crash) -> Snapshot {
        self.phase = GamePhase::GameOver;
        let result = self.scores.finalize(&mut self.store);
        self.last_result = Some(result);
        log::info!(
            "Game over ({:?}): score {}, best {}{}",
            crash,
            result.score,
            result.best,
            if result.new_best { " (new best)" } else { "" }
        );

        // The terminal frame still shows the crash
        let snapshot = self.snapshot();
        self.session = None;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{BEST_SCORE_KEY, MemoryStore};
    use crate::sim::Viewport;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn viewport() -> Viewport {
        Viewport::new(400.0, 600.0)
    }

    fn running_game() -> Game<MemoryStore> {
        let mut game = Game::new(MemoryStore::new(), Tuning::default(), 12345);
        game.start(0.0, &viewport());
        game
    }

    #[test]
    fn test_idle_to_running() {
        let mut game = Game::new(MemoryStore::new(), Tuning::default(), 1);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.session().is_none());

        // Ticks and commands before start do nothing
        let snap = game.tick(16.0, true);
        assert_eq!(snap.phase, GamePhase::Idle);
        game.pause();
        assert_eq!(game.phase(), GamePhase::Idle);

        game.start(0.0, &viewport());
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.session().is_some());
        assert_eq!(game.scores().current(), 0);
    }

    #[test]
    fn test_tick_applies_gravity() {
        let mut game = running_game();
        let snap = game.tick(FRAME_MS, false);
        let flyer = snap.flyer.unwrap();
        assert!((flyer.velocity - 0.3).abs() < 1e-6);
        assert!((flyer.y - 300.3).abs() < 1e-4);
    }

    #[test]
    fn test_impulse_in_tick() {
        let mut game = running_game();
        let snap = game.tick(FRAME_MS, true);
        // Impulse then one tick of gravity
        let flyer = snap.flyer.unwrap();
        assert!((flyer.velocity - (-5.7)).abs() < 1e-5);
        assert!(flyer.y < 300.0);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut game = running_game();
        for i in 1..30 {
            game.tick(i as f64 * FRAME_MS, i % 10 == 0);
        }
        game.pause();
        assert_eq!(game.phase(), GamePhase::Paused);
        let before = game.snapshot();
        for i in 30..200 {
            let snap = game.tick(i as f64 * 100.0, true);
            assert_eq!(snap, before);
        }
        game.flap();
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_start_ignored_while_active() {
        let mut game = running_game();
        game.tick(FRAME_MS, false);
        let ticks = game.session().unwrap().ticks;
        game.start(FRAME_MS * 2.0, &viewport());
        assert_eq!(game.session().unwrap().ticks, ticks);
        game.pause();
        game.start(FRAME_MS * 3.0, &viewport());
        assert_eq!(game.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_resume_does_not_spawn_immediately() {
        let mut game = running_game();
        game.tick(100.0, false);
        game.pause();
        // Long pause: the interval has elapsed many times over
        game.resume(60_000.0);
        game.tick(60_000.0, true);
        assert!(game.session().unwrap().stream.pairs.is_empty());
        game.tick(60_101.0, true);
        assert_eq!(game.session().unwrap().stream.pairs.len(), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game = running_game();
        game.toggle_pause(10.0);
        assert_eq!(game.phase(), GamePhase::Paused);
        game.toggle_pause(20.0);
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_ground_crash_ends_game() {
        let mut game = running_game();
        game.session_mut().unwrap().flyer.pos.y = 581.0;
        let snap = game.tick(FRAME_MS, false);
        assert_eq!(snap.phase, GamePhase::GameOver);
        // Terminal frame still carries the flyer
        assert!(snap.flyer.is_some());
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(game.session().is_none());
        assert_eq!(
            game.last_result(),
            Some(GameResult {
                score: 0,
                best: 0,
                new_best: false
            })
        );
        // Nothing written for a zero score against a zero best
        assert_eq!(game.store().get(BEST_SCORE_KEY).unwrap(), None);
    }

    #[test]
    fn test_ceiling_is_not_terminal() {
        let mut game = running_game();
        {
            let session = game.session_mut().unwrap();
            session.flyer.pos.y = 2.0;
            session.flyer.velocity = -6.0;
        }
        let snap = game.tick(FRAME_MS, false);
        assert_eq!(snap.phase, GamePhase::Running);
        let flyer = snap.flyer.unwrap();
        assert_eq!(flyer.y, 0.0);
        assert_eq!(flyer.velocity, 0.0);
    }

    #[test]
    fn test_obstacle_crash_ends_game() {
        let mut game = running_game();
        // Top member reaches below the flyer's top edge
        game.session_mut()
            .unwrap()
            .stream
            .spawn_pair_at(130.0, 400.0);
        let snap = game.tick(FRAME_MS, false);
        assert_eq!(snap.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = running_game();
        game.session_mut().unwrap().flyer.pos.y = 590.0;
        game.tick(FRAME_MS, false);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.handle(Command::Start, 5000.0, &viewport());
        assert_eq!(game.phase(), GamePhase::Running);
        let session = game.session().unwrap();
        assert_eq!(session.ticks, 0);
        assert_eq!(session.started_at_ms, 5000.0);
        // Each session gets its own seed
        assert_eq!(session.seed, 12346);
    }

    #[test]
    fn test_spawns_follow_timestamps() {
        let mut game = running_game();
        let mut frame = 0u32;
        // Keep the flyer airborne in the middle band
        while frame < 200 {
            frame += 1;
            let flap = game
                .session()
                .map(|s| s.flyer.pos.y > 320.0)
                .unwrap_or(false);
            game.tick(frame as f64 * FRAME_MS, flap);
            if game.phase() != GamePhase::Running {
                break;
            }
        }
        // 200 frames at 60fps is ~3.3s: two spawns at 1.5s cadence
        if let Some(session) = game.session() {
            assert_eq!(session.stream.pairs.len(), 2);
        }
    }

    proptest! {
        #[test]
        fn prop_paused_ticks_change_nothing(
            warmup in 0u32..60,
            paused_ticks in 1u32..100,
            flaps in proptest::collection::vec(any::<bool>(), 100),
        ) {
            let mut game = running_game();
            for i in 0..warmup {
                game.tick(i as f64 * FRAME_MS, i % 12 == 0);
            }
            prop_assume!(game.phase() == GamePhase::Running);
            game.pause();

            let flyer = game.session().unwrap().flyer.clone();
            let stream = game.session().unwrap().stream.clone();
            let score = game.scores().current();

            for i in 0..paused_ticks {
                let flap = flaps[i as usize % flaps.len()];
                game.tick(10_000.0 + i as f64 * FRAME_MS, flap);
                if flap {
                    game.flap();
                }
            }

            prop_assert_eq!(&game.session().unwrap().flyer, &flyer);
            prop_assert_eq!(&game.session().unwrap().stream, &stream);
            prop_assert_eq!(game.scores().current(), score);
        }
    }
}
