//! Local directory source.

use super::EpisodeSource;
use crate::catalog::{self, EpisodeDescriptor, EpisodeRecord};
use crate::config::{Settings, SourceSettings};
use crate::error::{HarkError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Reads the index and chunk files from a directory.
pub struct LocalSource {
    dir: PathBuf,
    layout: SourceSettings,
}

impl LocalSource {
    /// Create a source over `dir` using the default file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            layout: SourceSettings::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            dir: settings.local_dir(),
            layout: settings.source.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(&self.layout.index_file)
    }

    fn chunk_path(&self, chunk: u32) -> PathBuf {
        self.dir.join(self.layout.chunk_file(chunk))
    }
}

#[async_trait]
impl EpisodeSource for LocalSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    #[instrument(skip(self))]
    async fn fetch_index(&self) -> Result<Vec<EpisodeDescriptor>> {
        let path = self.index_path();
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            HarkError::IndexUnavailable(format!("{}: {}", path.display(), e))
        })?;
        debug!("Read {} bytes of index from {:?}", bytes.len(), path);
        catalog::parse_index(&bytes)
    }

    #[instrument(skip(self))]
    async fn fetch_chunk(&self, chunk: u32) -> Result<Vec<EpisodeRecord>> {
        let path = self.chunk_path(chunk);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| HarkError::chunk_load(chunk, format!("{}: {}", path.display(), e)))?;
        debug!("Read {} bytes of chunk {} from {:?}", bytes.len(), chunk, path);
        catalog::parse_chunk(chunk, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_index_and_chunk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("episodes-index.json"),
            r#"[{"id": "1", "title": "Coffee Shop", "level": "Beginner", "chunk": 1}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("episodes-chunk-1.json"),
            r#"[{"id": "1", "title": "Coffee Shop", "level": "Beginner", "mp3": "1.mp3"}]"#,
        )
        .unwrap();

        let source = LocalSource::new(dir.path());
        let index = source.fetch_index().await.unwrap();
        assert_eq!(index[0].title, "Coffee Shop");

        let records = source.fetch_chunk(1).await.unwrap();
        assert_eq!(records[0].mp3_url, "1.mp3");
    }

    #[tokio::test]
    async fn test_missing_chunk_is_chunk_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalSource::new(dir.path());

        let err = source.fetch_chunk(5).await.unwrap_err();
        assert!(matches!(err, HarkError::ChunkLoad { chunk: 5, .. }));

        let err = source.fetch_index().await.unwrap_err();
        assert!(matches!(err, HarkError::IndexUnavailable(_)));
    }
}
