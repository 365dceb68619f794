//! Configuration settings for Hark.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub source: SourceSettings,
    pub index: IndexSettings,
    pub search: SearchSettings,
    pub browse: BrowseSettings,
    pub progress: ProgressSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.hark".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Where episode data is fetched from.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A local directory holding the index and chunk files.
    #[default]
    Local,
    /// A remote base URL serving the same files.
    Http,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "dir" | "file" => Ok(SourceKind::Local),
            "http" | "https" | "remote" => Ok(SourceKind::Http),
            _ => Err(format!("Unknown source kind: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Local => write!(f, "local"),
            SourceKind::Http => write!(f, "http"),
        }
    }
}

/// Episode data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Source kind (local, http).
    pub kind: SourceKind,
    /// Directory containing the index and chunk files (local source).
    pub local_dir: String,
    /// Base URL serving the index and chunk files (http source).
    pub base_url: String,
    /// File name of the episode index.
    pub index_file: String,
    /// File name pattern for chunks; `{n}` is replaced by the chunk number.
    pub chunk_file_pattern: String,
    /// Timeout for a single HTTP request.
    pub request_timeout_seconds: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Local,
            local_dir: "~/.hark/episodes".to_string(),
            base_url: "http://127.0.0.1:8080/".to_string(),
            index_file: "episodes-index.json".to_string(),
            chunk_file_pattern: "episodes-chunk-{n}.json".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl SourceSettings {
    /// Resolve the chunk file name for a chunk number.
    pub fn chunk_file(&self, chunk: u32) -> String {
        self.chunk_file_pattern.replace("{n}", &chunk.to_string())
    }
}

/// Episode index availability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Delay between polls while waiting for the index.
    pub poll_interval_ms: u64,
    /// Number of polls before giving up.
    pub max_poll_attempts: u32,
    /// Attempts made when fetching the index at startup.
    pub retry_attempts: u32,
    /// Base delay for exponential backoff between index fetch attempts.
    pub retry_base_delay_ms: u64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_poll_attempts: 50,
            retry_attempts: 5,
            retry_base_delay_ms: 200,
        }
    }
}

impl IndexSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Search engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Queries shorter than this (after trimming) clear the search.
    pub min_query_len: usize,
    /// Maximum number of unmatched episodes inspected in the detail scan.
    pub detail_scan_cap: usize,
    /// Number of cached queries kept before the oldest is evicted.
    pub cache_capacity: usize,
    /// Quiet period after the last keystroke before a search runs.
    pub debounce_ms: u64,
    /// Score for a title match.
    pub title_weight: u32,
    /// Score for a level match.
    pub level_weight: u32,
    /// Score for a vocabulary match.
    pub vocabulary_weight: u32,
    /// Score for a transcript match.
    pub transcript_weight: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            detail_scan_cap: 50,
            cache_capacity: 20,
            debounce_ms: 300,
            title_weight: 100,
            level_weight: 50,
            vocabulary_weight: 30,
            transcript_weight: 20,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Browse view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseSettings {
    /// Episodes shown per page ("load more" step).
    pub page_size: usize,
    /// Chunks loaded in the background once the index is ready.
    pub preload_chunks: Vec<u32>,
    /// Delay between successive preloads.
    pub preload_stagger_ms: u64,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            page_size: 30,
            preload_chunks: vec![1, 2],
            preload_stagger_ms: 500,
        }
    }
}

/// Learner progress settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Path of the progress file.
    pub file: String,
    /// Playback percentage at which an episode counts as completed.
    pub completion_threshold: u8,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            file: "~/.hark/progress.json".to_string(),
            completion_threshold: 95,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::HarkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hark")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded local episode directory.
    pub fn local_dir(&self) -> PathBuf {
        Self::expand_path(&self.source.local_dir)
    }

    /// Get the expanded progress file path.
    pub fn progress_path(&self) -> PathBuf {
        Self::expand_path(&self.progress.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_search_contract() {
        let settings = Settings::default();
        assert_eq!(settings.search.min_query_len, 2);
        assert_eq!(settings.search.detail_scan_cap, 50);
        assert_eq!(settings.search.cache_capacity, 20);
        assert_eq!(settings.search.debounce(), Duration::from_millis(300));
        assert_eq!(settings.browse.page_size, 30);
        assert_eq!(settings.browse.preload_chunks, vec![1, 2]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [source]
            kind = "http"
            base_url = "https://lessons.example.com/data/"

            [search]
            cache_capacity = 5
            "#,
        )
        .unwrap();

        assert_eq!(settings.source.kind, SourceKind::Http);
        assert_eq!(settings.source.index_file, "episodes-index.json");
        assert_eq!(settings.search.cache_capacity, 5);
        assert_eq!(settings.search.title_weight, 100);
    }

    #[test]
    fn test_chunk_file_pattern() {
        let source = SourceSettings::default();
        assert_eq!(source.chunk_file(7), "episodes-chunk-7.json");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.browse.page_size = 12;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.browse.page_size, 12);
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("HTTPS".parse::<SourceKind>().unwrap(), SourceKind::Http);
        assert_eq!("dir".parse::<SourceKind>().unwrap(), SourceKind::Local);
        assert!("ftp".parse::<SourceKind>().is_err());
    }
}
