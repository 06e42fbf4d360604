//! High score persistence
//!
//! A single best score survives between runs. The simulation only compares
//! against it; the host loads it at startup and saves it when a run ends.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum HighScoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk shape of the high score file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// Somewhere a high score can be loaded from and saved to
pub trait HighScoreStore {
    /// Stored high score; 0 when nothing has been saved yet
    fn load(&self) -> Result<u64, HighScoreError>;

    fn save(&mut self, high_score: u64) -> Result<(), HighScoreError>;

    /// Save only if `score` beats what is stored; returns true when written
    fn submit(&mut self, score: u64) -> Result<bool, HighScoreError> {
        if score <= self.load()? {
            return Ok(false);
        }
        self.save(score)?;
        Ok(true)
    }
}

/// High score kept as a small JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u64, HighScoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        log::info!("Loaded high score {}", record.high_score);
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u64) -> Result<(), HighScoreError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })?;
        std::fs::write(&self.path, json)?;
        log::info!("High score saved ({high_score})");
        Ok(())
    }
}

/// In-memory store for tests and hosts without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u64,
}

impl MemoryStore {
    pub fn new(high_score: u64) -> Self {
        Self { high_score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, HighScoreError> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u64) -> Result<(), HighScoreError> {
        self.high_score = high_score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "space-runner-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        store.save(12_300).unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), 12_300);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "high score: lots").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(HighScoreError::Parse(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_submit_only_keeps_better_scores() {
        let mut store = MemoryStore::new(500);
        assert!(!store.submit(200).unwrap());
        assert!(!store.submit(500).unwrap());
        assert_eq!(store.load().unwrap(), 500);
        assert!(store.submit(900).unwrap());
        assert_eq!(store.load().unwrap(), 900);
    }
}
