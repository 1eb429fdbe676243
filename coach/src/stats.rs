//! Progress statistics and their persistence.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

/// Progress record for the local user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub challenges_generated: u32,
    pub attempts: u32,
    pub solved: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub hints_used: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl UserStats {
    pub fn record_challenge(&mut self) {
        self.challenges_generated += 1;
    }

    /// Records a judged attempt at `at`.
    pub fn record_attempt(&mut self, passed: bool, at: DateTime<Utc>) {
        self.attempts += 1;
        if passed {
            self.solved += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        self.last_attempt_at = Some(at);
    }

    pub fn record_hint(&mut self) {
        self.hints_used += 1;
    }

    /// Fraction of attempts that passed, 0.0 with no attempts.
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.solved) / f64::from(self.attempts)
        }
    }
}

/// Persistent storage for [`UserStats`].
pub trait StatsStore: Send + Sync {
    /// Loads stats; a store with nothing saved yields the defaults.
    fn load(&self) -> Result<UserStats>;

    fn save(&self, stats: &UserStats) -> Result<()>;
}

/// Stores stats as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self) -> Result<UserStats> {
        match fs::read(&self.path) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserStats::default()),
            Err(e) => Err(CoachError::Io(e)),
        }
    }

    fn save(&self, stats: &UserStats) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(stats)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory stats store for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    data: Arc<Mutex<Option<UserStats>>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last saved stats, if any.
    pub fn saved(&self) -> Option<UserStats> {
        self.data.lock().ok().and_then(|d| d.clone())
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> Result<UserStats> {
        let data = self
            .data
            .lock()
            .map_err(|e| CoachError::Provider(format!("stats lock poisoned: {}", e)))?;
        Ok(data.clone().unwrap_or_default())
    }

    fn save(&self, stats: &UserStats) -> Result<()> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| CoachError::Provider(format!("stats lock poisoned: {}", e)))?;
        *data = Some(stats.clone());
        Ok(())
    }
}

/// Loads stats once and writes them back after every change.
pub struct StatsTracker {
    store: Box<dyn StatsStore>,
    stats: UserStats,
}

impl StatsTracker {
    pub fn open<S: StatsStore + 'static>(store: S) -> Result<Self> {
        let stats = store.load()?;
        Ok(Self {
            store: Box::new(store),
            stats,
        })
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn record_challenge(&mut self) -> Result<()> {
        self.stats.record_challenge();
        self.store.save(&self.stats)
    }

    pub fn record_attempt(&mut self, passed: bool) -> Result<()> {
        self.stats.record_attempt(passed, Utc::now());
        self.store.save(&self.stats)
    }

    pub fn record_hint(&mut self) -> Result<()> {
        self.stats.record_hint();
        self.store.save(&self.stats)
    }

    /// Clears all counters.
    pub fn reset(&mut self) -> Result<()> {
        self.stats = UserStats::default();
        self.store.save(&self.stats)
    }
}

impl std::fmt::Debug for StatsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsTracker")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // ===== UserStats =====

    #[test]
    fn test_streaks() {
        let mut stats = UserStats::default();
        let now = Utc::now();
        stats.record_attempt(true, now);
        stats.record_attempt(true, now);
        assert_eq!((stats.current_streak, stats.best_streak), (2, 2));

        stats.record_attempt(false, now);
        assert_eq!((stats.current_streak, stats.best_streak), (0, 2));

        stats.record_attempt(true, now);
        assert_eq!((stats.current_streak, stats.best_streak), (1, 2));
        assert_eq!((stats.attempts, stats.solved), (4, 3));
        assert_eq!(stats.last_attempt_at, Some(now));
    }

    #[test]
    fn test_success_rate() {
        let mut stats = UserStats::default();
        assert_eq!(stats.success_rate(), 0.0);
        stats.record_attempt(true, Utc::now());
        stats.record_attempt(false, Utc::now());
        assert!((stats.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let stats: UserStats = serde_json::from_str(r#"{"solved": 3}"#).unwrap();
        assert_eq!(stats.solved, 3);
        assert_eq!(stats.attempts, 0);
        assert!(stats.last_attempt_at.is_none());
    }

    // ===== FileStatsStore =====

    #[test]
    fn test_file_store_missing_is_default() {
        let dir = tempdir().unwrap();
        let store = FileStatsStore::new(dir.path().join("stats.json"));
        assert_eq!(store.load().unwrap(), UserStats::default());
    }

    #[test]
    fn test_file_store_creates_dirs_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/data/stats.json");
        let store = FileStatsStore::new(&path);

        let mut stats = UserStats::default();
        stats.record_hint();
        stats.record_attempt(true, Utc::now());
        store.save(&stats).unwrap();

        assert!(path.exists());
        assert_eq!(FileStatsStore::new(&path).load().unwrap(), stats);
    }

    #[test]
    fn test_file_store_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileStatsStore::new(&path).load(),
            Err(CoachError::Json(_))
        ));
    }

    // ===== StatsTracker =====

    #[test]
    fn test_tracker_saves_every_change() {
        let store = MemoryStatsStore::new();
        let mut tracker = StatsTracker::open(store.clone()).unwrap();
        assert!(store.saved().is_none());

        tracker.record_challenge().unwrap();
        assert_eq!(store.saved().unwrap().challenges_generated, 1);

        tracker.record_attempt(false).unwrap();
        tracker.record_hint().unwrap();
        let saved = store.saved().unwrap();
        assert_eq!((saved.attempts, saved.hints_used), (1, 1));

        tracker.reset().unwrap();
        assert_eq!(store.saved().unwrap(), UserStats::default());
    }

    #[test]
    fn test_tracker_loads_existing() {
        let store = MemoryStatsStore::new();
        let mut stats = UserStats::default();
        stats.best_streak = 7;
        store.save(&stats).unwrap();

        let tracker = StatsTracker::open(store).unwrap();
        assert_eq!(tracker.stats().best_streak, 7);
    }
}
