//! Persistence port
//!
//! The core never performs I/O itself. A host hands the [`GameDriver`](crate::GameDriver) some
//! implementation of [`Persistence`]; the driver calls into it at fixed points and treats
//! every failure as non-fatal (it is logged and the game goes on).

use std::convert::Infallible;
use std::fmt::Display;

use crate::snapshot::Snapshot;

/// Load/save capability for session snapshots and the best score
pub trait Persistence {
    type Error: Display;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;

    /// `Ok(None)` when nothing has been saved
    fn load(&mut self) -> Result<Option<Snapshot>, Self::Error>;

    /// Forget the saved session (the best score is kept)
    fn clear(&mut self) -> Result<(), Self::Error>;

    fn save_best_score(&mut self, best: u32) -> Result<(), Self::Error>;

    /// 0 when no best score has been saved
    fn load_best_score(&mut self) -> Result<u32, Self::Error>;
}

/// In-memory store, for tests and headless runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
    best_score: u32,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a saved session
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryStore {
    type Error = Infallible;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), Infallible> {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Snapshot>, Infallible> {
        Ok(self.snapshot.clone())
    }

    fn clear(&mut self) -> Result<(), Infallible> {
        self.snapshot = None;
        Ok(())
    }

    fn save_best_score(&mut self, best: u32) -> Result<(), Infallible> {
        self.best_score = best;
        Ok(())
    }

    fn load_best_score(&mut self) -> Result<u32, Infallible> {
        Ok(self.best_score)
    }
}
