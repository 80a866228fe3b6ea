//! Session score and persisted best score
//!
//! The best score is read from the store once at startup and written at most
//! once per game over, only when beaten.

use serde::{Deserialize, Serialize};

use crate::persistence::{BEST_SCORE_KEY, PersistentStore};

/// Summary shown on the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub score: u32,
    pub best: u32,
    /// This run set a new best
    pub new_best: bool,
}

/// Tracks the current run's score against the best ever
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    current: u32,
    best: u32,
    /// False when the store could not be read at startup
    best_known: bool,
    finalized: bool,
}

impl ScoreTracker {
    /// Tracker with a known best (0 for a fresh install)
    pub fn new(best: u32) -> Self {
        Self {
            current: 0,
            best,
            best_known: true,
            finalized: false,
        }
    }

    /// Read the best score from `store`
    ///
    /// A failing or corrupt store degrades to an unknown best of 0.
    pub fn load(store: &dyn PersistentStore) -> Self {
        match store.get(BEST_SCORE_KEY) {
            Ok(Some(value)) => match u32::try_from(value) {
                Ok(best) => {
                    log::info!("Loaded best score {}", best);
                    Self::new(best)
                }
                Err(_) => {
                    log::warn!("Ignoring out-of-range best score {}", value);
                    Self::unknown_best()
                }
            },
            Ok(None) => {
                log::info!("No best score stored, starting fresh");
                Self::new(0)
            }
            Err(e) => {
                log::warn!("Best score unknown this session: {}", e);
                Self::unknown_best()
            }
        }
    }

    fn unknown_best() -> Self {
        Self {
            best_known: false,
            ..Self::new(0)
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn best_known(&self) -> bool {
        self.best_known
    }

    /// Reset for a new session; the best carries over
    pub fn reset_session(&mut self) {
        self.current = 0;
        self.finalized = false;
    }

    /// One pair passed. Returns the new score.
    pub fn record_pass(&mut self) -> u32 {
        self.current += 1;
        self.current
    }

    /// Close out the run, persisting the best if beaten
    ///
    /// Only the first call after `reset_session` has any effect.
    pub fn finalize(&mut self, store: &mut dyn PersistentStore) -> GameResult {
        if self.finalized {
            return self.result(false);
        }
        self.finalized = true;

        if self.current <= self.best {
            return self.result(false);
        }

        self.best = self.current;
        log::info!("New best score: {}", self.best);
        if let Err(e) = store.set(BEST_SCORE_KEY, i64::from(self.best)) {
            log::warn!("Failed to persist best score {}: {}", self.best, e);
        }
        self.result(true)
    }

    fn result(&self, new_best: bool) -> GameResult {
        GameResult {
            score: self.current,
            best: self.best,
            new_best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};

    /// Counts writes so tests can assert "exactly once"
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: u32,
    }

    impl PersistentStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
            self.writes += 1;
            self.inner.set(key, value)
        }
    }

    #[test]
    fn test_load_existing_best() {
        let store = MemoryStore::with_value(BEST_SCORE_KEY, 9);
        let tracker = ScoreTracker::load(&store);
        assert_eq!(tracker.best(), 9);
        assert!(tracker.best_known());
    }

    #[test]
    fn test_load_degrades_when_unavailable() {
        let tracker = ScoreTracker::load(&MemoryStore::unavailable());
        assert_eq!(tracker.best(), 0);
        assert!(!tracker.best_known());
    }

    #[test]
    fn test_load_rejects_negative() {
        let store = MemoryStore::with_value(BEST_SCORE_KEY, -3);
        let tracker = ScoreTracker::load(&store);
        assert_eq!(tracker.best(), 0);
        assert!(!tracker.best_known());
    }

    #[test]
    fn test_best_updates_only_when_beaten() {
        let mut store = CountingStore::default();
        let mut tracker = ScoreTracker::new(3);

        tracker.record_pass();
        tracker.record_pass();
        tracker.record_pass();
        let result = tracker.finalize(&mut store);
        // Equal is not better
        assert!(!result.new_best);
        assert_eq!(store.writes, 0);

        tracker.reset_session();
        for _ in 0..4 {
            tracker.record_pass();
        }
        let result = tracker.finalize(&mut store);
        assert_eq!(
            result,
            GameResult {
                score: 4,
                best: 4,
                new_best: true
            }
        );
        assert_eq!(store.writes, 1);
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), Some(4));
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut store = CountingStore::default();
        let mut tracker = ScoreTracker::new(0);
        tracker.record_pass();
        assert!(tracker.finalize(&mut store).new_best);
        assert!(!tracker.finalize(&mut store).new_best);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_persist_failure_keeps_best_in_memory() {
        let mut store = MemoryStore::unavailable();
        let mut tracker = ScoreTracker::new(0);
        tracker.record_pass();
        tracker.record_pass();
        let result = tracker.finalize(&mut store);
        assert!(result.new_best);
        assert_eq!(tracker.best(), 2);
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut tracker = ScoreTracker::new(5);
        tracker.record_pass();
        tracker.reset_session();
        assert_eq!(tracker.current(), 0);
        assert_eq!(tracker.best(), 5);
    }
}
