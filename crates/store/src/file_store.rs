//! JSON file implementation of the persistence port
//!
//! Layout inside the data directory:
//!
//! - `game_state.json`: the current [`Snapshot`]
//! - `best_score.json`: `{"bestScore": n}`, kept across restarts and discarded saves
//!
//! Writes go to a `.tmp` sibling first and are then renamed over the target, so a crash
//! mid-write never leaves a truncated save behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use trixel_core::{Persistence, Snapshot};

const STATE_FILE: &str = "game_state.json";
const BEST_SCORE_FILE: &str = "best_score.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BestScore {
    best_score: u32,
}

/// Saves sessions and the best score as JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub fn best_score_path(&self) -> PathBuf {
        self.dir.join(BEST_SCORE_FILE)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        atomic_write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// `Ok(None)` when the file does not exist
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}

impl Persistence for JsonFileStore {
    type Error = anyhow::Error;

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_vec(snapshot).context("failed to serialize snapshot")?;
        self.write(&self.state_path(), &json)
    }

    fn load(&mut self) -> Result<Option<Snapshot>> {
        let path = self.state_path();
        let Some(bytes) = read_optional(&path)? else {
            debug!("no saved game at {}", path.display());
            return Ok(None);
        };
        let snapshot = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(snapshot))
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.state_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }

    fn save_best_score(&mut self, best: u32) -> Result<()> {
        let json = serde_json::to_vec(&BestScore { best_score: best })?;
        self.write(&self.best_score_path(), &json)
    }

    fn load_best_score(&mut self) -> Result<u32> {
        let path = self.best_score_path();
        let Some(bytes) = read_optional(&path)? else {
            return Ok(0);
        };
        let best: BestScore = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(best.best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_dir::TempDir;
    use trixel_core::types::{InputEvent, Settings, Timing};
    use trixel_core::GameSession;

    #[test]
    fn test_load_from_empty_dir() {
        let tmp = TempDir::new("empty");
        let mut store = JsonFileStore::new(tmp.path().join("missing"));
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.load_best_score().unwrap(), 0);
        store.clear().unwrap();
    }

    #[test]
    fn test_save_load_snapshot() {
        let tmp = TempDir::new("snapshot");
        let mut store = JsonFileStore::new(tmp.path().join("data"));

        let mut session = GameSession::new(3, Timing::default(), Settings::default());
        session.handle_input(InputEvent::HardDrop);
        let snapshot = session.snapshot();

        store.save(&snapshot).unwrap();
        assert!(!store.state_path().with_extension("tmp").exists());
        assert_eq!(store.load().unwrap(), Some(snapshot));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_best_score_survives_clear() {
        let tmp = TempDir::new("best");
        let mut store = JsonFileStore::new(tmp.path());
        store.save_best_score(1234).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load_best_score().unwrap(), 1234);

        let raw = fs::read_to_string(store.best_score_path()).unwrap();
        assert_eq!(raw, r#"{"bestScore":1234}"#);
    }

    #[test]
    fn test_malformed_save_is_an_error() {
        let tmp = TempDir::new("malformed");
        let mut store = JsonFileStore::new(tmp.path());
        fs::write(store.state_path(), "{not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("game_state.json"));
    }

    #[test]
    fn test_partial_save_parses_with_defaults() {
        let tmp = TempDir::new("partial");
        let mut store = JsonFileStore::new(tmp.path());
        fs::write(store.state_path(), r#"{"score": 40}"#).unwrap();
        let snapshot = store.load().unwrap().unwrap();
        assert_eq!(snapshot.score, 40);
        assert!(snapshot.player.is_none());
    }
}
