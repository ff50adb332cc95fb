//! Driver module - glues a [`GameSession`] to a clock and a persistence port
//!
//! The host owns the real event loop; it forwards input events and frame timestamps here.
//! The driver turns timestamps into deltas, saves the session after input-driven changes and
//! on every lock, keeps the persisted best score current, and recovers from unreadable saves
//! by starting a fresh game.

use log::{info, warn};

use crate::persistence::Persistence;
use crate::session::GameSession;
use crate::timing::FrameClock;
use crate::types::{InputEvent, Settings, Timing};

pub struct GameDriver<P: Persistence> {
    session: GameSession,
    persistence: P,
    clock: FrameClock,
    saved_best: u32,
}

impl<P: Persistence> GameDriver<P> {
    /// Resume the saved game (unless `fresh`), or start a new one.
    pub fn start(mut persistence: P, seed: u32, timing: Timing, fresh: bool) -> Self {
        let saved_best = persistence.load_best_score().unwrap_or_else(|e| {
            warn!("failed to load best score: {}", e);
            0
        });

        let saved = if fresh {
            None
        } else {
            persistence.load().unwrap_or_else(|e| {
                warn!("failed to load saved game: {}", e);
                None
            })
        };

        let mut session = match saved {
            Some(snapshot) => {
                let settings = snapshot.settings;
                match GameSession::restore(snapshot, seed, timing) {
                    Ok(session) => {
                        info!("restored saved game (score {})", session.score());
                        session
                    }
                    Err(e) => {
                        warn!("discarding saved game: {}", e);
                        GameSession::new(seed, timing, settings)
                    }
                }
            }
            None => GameSession::new(seed, timing, Settings::default()),
        };
        session.set_best_score(saved_best);

        Self {
            session,
            persistence,
            clock: FrameClock::new(),
            saved_best,
        }
    }

    /// Forward one input event; returns whether the game changed.
    pub fn input(&mut self, event: InputEvent) -> bool {
        let changed = self.session.handle_input(event);
        if !changed {
            return false;
        }

        match event {
            InputEvent::Restart => {
                if let Err(e) = self.persistence.clear() {
                    warn!("failed to clear saved game: {}", e);
                }
            }
            InputEvent::TogglePause if self.session.is_paused() => {
                self.clock.pause();
                self.save();
            }
            _ => self.save(),
        }
        self.session.take_last_event();
        self.save_best_score();
        true
    }

    /// Advance the game to the host timestamp `now_ms`.
    ///
    /// Frames are ignored while paused. The clock baseline was dropped on pause, so the
    /// first frame after resuming only sets a new baseline.
    pub fn frame(&mut self, now_ms: u64) {
        if self.session.is_paused() {
            return;
        }
        let dt = self.clock.frame(now_ms);
        self.session.tick(dt);
        if self.session.take_last_event().is_some() {
            self.save();
            self.save_best_score();
        }
    }

    /// Final save before the host exits
    pub fn shutdown(&mut self) {
        self.save();
        self.save_best_score();
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn save(&mut self) {
        if let Err(e) = self.persistence.save(&self.session.snapshot()) {
            warn!("failed to save game: {}", e);
        }
    }

    fn save_best_score(&mut self) {
        let best = self.session.best_score();
        if best <= self.saved_best {
            return;
        }
        match self.persistence.save_best_score(best) {
            Ok(()) => self.saved_best = best,
            Err(e) => warn!("failed to save best score: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::snapshot::Snapshot;

    #[test]
    fn test_start_without_save_is_fresh() {
        let driver = GameDriver::start(MemoryStore::new(), 7, Timing::default(), false);
        assert!(driver.session().arena().is_empty());
        assert_eq!(driver.session().score(), 0);
    }

    #[test]
    fn test_invalid_save_falls_back_but_keeps_settings() {
        let mut snapshot = Snapshot::default();
        snapshot.settings.show_ghost = false;
        let store = MemoryStore::with_snapshot(snapshot);
        let driver = GameDriver::start(store, 7, Timing::default(), false);
        assert!(driver.session().arena().is_empty());
        assert!(!driver.session().settings().show_ghost);
    }

    #[test]
    fn test_input_saves_and_restart_clears() {
        let mut driver = GameDriver::start(MemoryStore::new(), 7, Timing::default(), false);
        assert!(driver.input(InputEvent::HardDrop));
        assert_eq!(driver.persistence().save_count(), 1);
        assert!(driver.persistence().best_score() > 0);

        driver.input(InputEvent::Restart);
        assert!(driver.persistence().snapshot().is_none());
        assert_eq!(driver.session().score(), 0);
    }

    #[test]
    fn test_release_does_not_save() {
        let mut driver = GameDriver::start(MemoryStore::new(), 7, Timing::default(), false);
        assert!(!driver.input(InputEvent::SoftDropStop));
        assert_eq!(driver.persistence().save_count(), 0);
    }

    #[test]
    fn test_resume_from_saved_game() {
        let mut first = GameDriver::start(MemoryStore::new(), 7, Timing::default(), false);
        first.input(InputEvent::HardDrop);
        first.shutdown();
        let store = first.persistence().clone();
        let score = first.session().score();

        let second = GameDriver::start(store.clone(), 8, Timing::default(), false);
        assert_eq!(second.session().score(), score);
        assert_eq!(second.session().arena(), first.session().arena());

        let fresh = GameDriver::start(store, 8, Timing::default(), true);
        assert_eq!(fresh.session().score(), 0);
        assert_eq!(fresh.session().best_score(), score);
    }

    #[test]
    fn test_pause_freezes_frames() {
        let mut driver = GameDriver::start(MemoryStore::new(), 7, Timing::default(), false);
        driver.frame(0);
        driver.frame(16);
        assert!(driver.input(InputEvent::TogglePause));
        assert_eq!(driver.persistence().save_count(), 1);
        driver.frame(10_000);
        assert_eq!(driver.session().active().y(), 0);

        // Resuming saves too; the first frame afterwards only sets the baseline.
        assert!(driver.input(InputEvent::TogglePause));
        assert_eq!(driver.persistence().save_count(), 2);
        driver.frame(60_000);
        driver.frame(60_384);
        assert_eq!(driver.session().active().y(), 0);
        driver.frame(60_385);
        assert_eq!(driver.session().active().y(), 1);
    }
}
