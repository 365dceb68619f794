//! Episode data sources.
//!
//! Provides a trait-based interface over the two resources the catalog is
//! published as: one episode index and a set of numbered chunks.

mod http;
mod local;
mod memory;

pub use http::HttpSource;
pub use local::LocalSource;
pub use memory::MemorySource;

use crate::catalog::{EpisodeDescriptor, EpisodeRecord};
use crate::config::{Settings, SourceKind};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for episode data providers.
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    /// Short human-readable description (path or URL).
    fn describe(&self) -> String;

    /// Fetch the ordered episode index.
    async fn fetch_index(&self) -> Result<Vec<EpisodeDescriptor>>;

    /// Fetch every record of one chunk.
    ///
    /// Any failure is reported as [`crate::HarkError::ChunkLoad`] or
    /// [`crate::HarkError::InvalidData`].
    async fn fetch_chunk(&self, chunk: u32) -> Result<Vec<EpisodeRecord>>;
}

/// Build the source selected in the settings.
pub fn create_source(settings: &Settings) -> Result<Arc<dyn EpisodeSource>> {
    match settings.source.kind {
        SourceKind::Local => Ok(Arc::new(LocalSource::from_settings(settings))),
        SourceKind::Http => Ok(Arc::new(HttpSource::from_settings(&settings.source)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_source_by_kind() {
        let mut settings = Settings::default();
        settings.source.local_dir = "/srv/lessons".to_string();
        let local = create_source(&settings).unwrap();
        assert!(local.describe().contains("/srv/lessons"));

        settings.source.kind = SourceKind::Http;
        settings.source.base_url = "https://lessons.example.com/data/".to_string();
        let remote = create_source(&settings).unwrap();
        assert!(remote.describe().starts_with("https://lessons.example.com"));
    }

    #[test]
    fn test_create_source_rejects_bad_url() {
        let mut settings = Settings::default();
        settings.source.kind = SourceKind::Http;
        settings.source.base_url = "not a url".to_string();
        assert!(create_source(&settings).is_err());
    }
}
