//! Best-score persistence.
//!
//! The game only ever keeps one record: the fixed key `rivalsSave` mapped to
//! the best score reached so far.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key under which the best score is stored.
pub const SAVE_KEY: &str = "rivalsSave";

/// A key-value record holding the best score.
pub trait ScoreStore {
    /// Read the stored best score. Absent records read as `Ok(0)`.
    fn load(&self) -> Result<u32, StoreError>;

    fn save(&mut self, score: u32) -> Result<(), StoreError>;

    /// [`ScoreStore::load`] with every failure mapped to 0.
    fn load_or_zero(&self) -> u32 {
        match self.load() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("ignoring unreadable best score: {}", e);
                0
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveRecord {
    #[serde(rename = "rivalsSave")]
    best: u32,
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// Stores the record as a one-line TOML file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.rivals_shooter_save.toml`, or the working directory without a home.
    pub fn in_home() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::new(PathBuf::from(home).join(".rivals_shooter_save.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<u32, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: SaveRecord =
            toml::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(record.best)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        let text = toml::to_string(&SaveRecord { best: score })
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Volatile store for tests and throwaway sessions. Counts writes.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: Option<u32>,
    writes: u32,
    reads: Cell<u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best: Some(best), ..Self::default() }
    }

    pub fn best(&self) -> Option<u32> {
        self.best
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<u32, StoreError> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.best.unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        self.best = Some(score);
        self.writes += 1;
        Ok(())
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&self) -> Result<u32, StoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        (**self).save(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    /// A store pointing into a fresh directory; the directory goes away with
    /// the returned guard.
    fn scratch() -> (TempDir, FileScoreStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileScoreStore::new(dir.path().join("save.toml"));
        (dir, store)
    }

    #[test]
    fn missing_file_reads_zero() {
        let (_dir, store) = scratch();
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn saved_score_reads_back() {
        let (_dir, mut store) = scratch();
        store.save(42).unwrap();
        assert_eq!(store.load().unwrap(), 42);
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains(SAVE_KEY));
    }

    #[test]
    fn corrupt_file_defaults_to_zero() {
        let (_dir, store) = scratch();
        std::fs::write(store.path(), "rivalsSave = \"lots\"").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Parse(_))));
        assert_eq!(store.load_or_zero(), 0);
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryScoreStore::with_best(3);
        assert_eq!(store.load().unwrap(), 3);
        store.save(4).unwrap();
        assert_eq!(store.best(), Some(4));
        assert_eq!(store.writes(), 1);
        assert_eq!(store.reads(), 1);
    }
}
