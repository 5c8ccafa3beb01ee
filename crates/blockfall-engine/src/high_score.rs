//! Persistence of the single best score.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Storage for the best score across sessions.
///
/// Loading never fails: a missing or unreadable record counts as a high score
/// of zero. Saving reports I/O failures to the caller.
pub trait HighScoreStore {
    fn load_high_score(&mut self) -> u64;
    fn save_high_score(&mut self, score: u64) -> Result<(), HighScoreError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to save high score to {}", path.display())]
pub struct HighScoreError {
    path: PathBuf,
    source: io::Error,
}

impl HighScoreError {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Keeps the high score as a decimal integer in a text file.
///
/// # Example
///
/// ```
/// use blockfall_engine::{FileHighScoreStore, HighScoreStore as _};
///
/// let path = std::env::temp_dir().join("blockfall-doc-high-score.txt");
/// let mut store = FileHighScoreStore::new(&path);
/// store.save_high_score(1200).unwrap();
/// assert_eq!(store.load_high_score(), 1200);
/// # std::fs::remove_file(&path).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load_high_score(&mut self) -> u64 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), HighScoreError> {
        fs::write(&self.path, score.to_string()).map_err(|source| HighScoreError {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory store, for tests and for running without a score file.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    score: u64,
    saves: usize,
}

impl MemoryHighScoreStore {
    #[must_use]
    pub const fn new(score: u64) -> Self {
        Self { score, saves: 0 }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Number of times the score has been saved.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load_high_score(&mut self) -> u64 {
        self.score
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), HighScoreError> {
        self.score = score;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blockfall-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let mut store = FileHighScoreStore::new(temp_path("missing.txt"));
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_malformed_file_loads_zero() {
        let path = temp_path("malformed.txt");
        fs::write(&path, "not a number").unwrap();
        let mut store = FileHighScoreStore::new(&path);
        assert_eq!(store.load_high_score(), 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.txt");
        let mut store = FileHighScoreStore::new(&path);
        store.save_high_score(4200).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "4200");

        fs::write(&path, " 17\n").unwrap();
        assert_eq!(store.load_high_score(), 17);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_error_names_path() {
        let path = temp_path("no-such-dir").join("score.txt");
        let mut store = FileHighScoreStore::new(&path);
        let err = store.save_high_score(1).unwrap_err();
        assert_eq!(err.path(), path);
        assert!(err.to_string().contains("score.txt"));
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryHighScoreStore::new(10);
        assert_eq!(store.load_high_score(), 10);
        store.save_high_score(20).unwrap();
        assert_eq!((store.score(), store.saves()), (20, 1));
    }
}
