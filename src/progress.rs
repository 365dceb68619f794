//! Learner progress: favorites, completed episodes and playback positions.
//!
//! Stored as one JSON file. A missing or unreadable file starts an empty
//! record rather than failing.

use crate::error::{HarkError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Playback position of one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeProgress {
    /// Position in seconds.
    pub current_time: f64,
    /// Episode length in seconds.
    pub duration: f64,
    /// Rounded share played, 0-100.
    pub percentage: u8,
    pub last_played: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct LearnerData {
    favorites: Vec<String>,
    completed: Vec<String>,
    progress: BTreeMap<String, EpisodeProgress>,
}

/// File-backed learner progress.
pub struct ProgressStore {
    path: PathBuf,
    completion_threshold: u8,
    data: LearnerData,
}

impl ProgressStore {
    /// Open the store at `path`.
    pub fn open(path: impl Into<PathBuf>, completion_threshold: u8) -> Self {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable progress file {:?}: {}", path, e);
                LearnerData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LearnerData::default(),
            Err(e) => {
                warn!("Could not read progress file {:?}: {}", path, e);
                LearnerData::default()
            }
        };

        Self {
            path,
            completion_threshold: completion_threshold.min(100),
            data,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, content)
            .map_err(|e| HarkError::Progress(format!("{}: {}", self.path.display(), e)))?;
        debug!("Saved progress to {:?}", self.path);
        Ok(())
    }

    /// Add or remove `id` from favorites. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let now_favorite = match self.data.favorites.iter().position(|f| f == id) {
            Some(i) => {
                self.data.favorites.remove(i);
                false
            }
            None => {
                self.data.favorites.push(id.to_string());
                true
            }
        };
        self.save()?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.data.favorites.iter().any(|f| f == id)
    }

    /// Favorites in the order they were added.
    pub fn favorites(&self) -> &[String] {
        &self.data.favorites
    }

    /// Mark `id` completed. Returns false if it already was.
    pub fn mark_completed(&mut self, id: &str) -> Result<bool> {
        if self.is_completed(id) {
            return Ok(false);
        }
        self.data.completed.push(id.to_string());
        self.save()?;
        Ok(true)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.data.completed.iter().any(|c| c == id)
    }

    pub fn completed(&self) -> &[String] {
        &self.data.completed
    }

    /// Record the playback position of `id`.
    pub fn save_progress(&mut self, id: &str, current_time: f64, duration: f64) -> Result<EpisodeProgress> {
        self.save_progress_at(id, current_time, duration, Utc::now())
    }

    /// Record the playback position of `id` as of `now`. Reaching the
    /// completion threshold also marks the episode completed.
    pub fn save_progress_at(
        &mut self,
        id: &str,
        current_time: f64,
        duration: f64,
        now: DateTime<Utc>,
    ) -> Result<EpisodeProgress> {
        if !current_time.is_finite() || !duration.is_finite() || duration <= 0.0 {
            return Err(HarkError::Progress(format!(
                "invalid position {}s of {}s for episode {}",
                current_time, duration, id
            )));
        }

        let current_time = current_time.clamp(0.0, duration);
        let percentage = ((current_time / duration) * 100.0).round() as u8;
        let entry = EpisodeProgress {
            current_time,
            duration,
            percentage,
            last_played: now,
        };
        self.data.progress.insert(id.to_string(), entry.clone());

        if percentage >= self.completion_threshold && !self.is_completed(id) {
            self.data.completed.push(id.to_string());
        }
        self.save()?;
        Ok(entry)
    }

    pub fn progress(&self, id: &str) -> Option<&EpisodeProgress> {
        self.data.progress.get(id)
    }

    /// Most recently played episode that is unfinished.
    pub fn continue_learning(&self) -> Option<(&str, &EpisodeProgress)> {
        self.data
            .progress
            .iter()
            .filter(|(id, p)| !self.is_completed(id) && p.percentage < self.completion_threshold)
            .max_by_key(|(_, p)| p.last_played)
            .map(|(id, p)| (id.as_str(), p))
    }

    /// Share of `total` episodes completed, rounded, 0-100.
    pub fn overall_percentage(&self, total: usize) -> u8 {
        if total == 0 {
            return 0;
        }
        let done = self.data.completed.len().min(total);
        ((done as f64 / total as f64) * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> (tempfile::TempDir, ProgressStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::open(dir.path().join("progress.json"), 95);
        (dir, store)
    }

    #[test]
    fn test_toggle_favorite_persists() {
        let (dir, mut store) = store();
        assert!(store.toggle_favorite("12").unwrap());
        assert!(store.toggle_favorite("3").unwrap());
        assert!(!store.toggle_favorite("12").unwrap());

        let reopened = ProgressStore::open(dir.path().join("progress.json"), 95);
        assert_eq!(reopened.favorites(), ["3".to_string()]);
        assert!(!reopened.is_favorite("12"));
    }

    #[test]
    fn test_mark_completed_is_idempotent() {
        let (_dir, mut store) = store();
        assert!(store.mark_completed("1").unwrap());
        assert!(!store.mark_completed("1").unwrap());
        assert_eq!(store.completed().len(), 1);
    }

    #[test]
    fn test_progress_auto_completes_at_threshold() {
        let (_dir, mut store) = store();
        let entry = store.save_progress("5", 57.0, 60.0).unwrap();
        assert_eq!(entry.percentage, 95);
        assert!(store.is_completed("5"));

        let entry = store.save_progress("6", 30.0, 60.0).unwrap();
        assert_eq!(entry.percentage, 50);
        assert!(!store.is_completed("6"));
    }

    #[test]
    fn test_rejects_zero_duration() {
        let (_dir, mut store) = store();
        assert!(store.save_progress("1", 0.0, 0.0).is_err());
        assert!(store.save_progress("1", f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_continue_learning_picks_latest_unfinished() {
        let (_dir, mut store) = store();
        let start = Utc::now();
        store.save_progress_at("1", 10.0, 100.0, start).unwrap();
        store.save_progress_at("2", 20.0, 100.0, start + Duration::seconds(5)).unwrap();
        store.save_progress_at("3", 99.0, 100.0, start + Duration::seconds(10)).unwrap();

        let (id, progress) = store.continue_learning().unwrap();
        assert_eq!(id, "2");
        assert_eq!(progress.percentage, 20);

        store.mark_completed("2").unwrap();
        assert_eq!(store.continue_learning().unwrap().0, "1");
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = ProgressStore::open(&path, 95);
        assert!(store.favorites().is_empty());
        assert!(store.continue_learning().is_none());
    }

    #[test]
    fn test_overall_percentage() {
        let (_dir, mut store) = store();
        assert_eq!(store.overall_percentage(0), 0);
        store.mark_completed("1").unwrap();
        assert_eq!(store.overall_percentage(3), 33);
    }
}
