//! Episode store.
//!
//! Memoizes full episode records and hides chunking from callers:
//! [`EpisodeStore::get_or_load`] is the one way to obtain full content.

mod loader;
mod records;

pub use loader::ChunkLoader;
pub use records::RecordMap;

use crate::catalog::EpisodeRecord;
use crate::config::IndexSettings;
use crate::error::Result;
use crate::index::EpisodeIndex;
use crate::source::EpisodeSource;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Lazily populated store of full episode records.
pub struct EpisodeStore {
    index: Arc<EpisodeIndex>,
    records: Arc<RecordMap>,
    loader: ChunkLoader,
    polling: IndexSettings,
}

impl EpisodeStore {
    pub fn new(index: Arc<EpisodeIndex>, source: Arc<dyn EpisodeSource>, polling: IndexSettings) -> Self {
        let records = Arc::new(RecordMap::new());
        let loader = ChunkLoader::new(source, records.clone());
        Self {
            index,
            records,
            loader,
            polling,
        }
    }

    /// A record that is already loaded.
    pub fn get(&self, id: &str) -> Option<Arc<EpisodeRecord>> {
        self.records.get(id)
    }

    /// Return the record for `id`, loading its chunk first if needed.
    ///
    /// `Ok(None)` means the id is not in the index; load failures are errors.
    #[instrument(skip(self))]
    pub async fn get_or_load(&self, id: &str) -> Result<Option<Arc<EpisodeRecord>>> {
        if let Some(record) = self.records.get(id) {
            return Ok(Some(record));
        }

        let snapshot = self.index.wait_with(&self.polling).await?;
        let Some(descriptor) = snapshot.get(id) else {
            return Ok(None);
        };

        self.loader.load_chunk(descriptor.chunk).await?;

        let record = self.records.get(id);
        if record.is_none() {
            warn!(
                "Episode {} is indexed in chunk {} but the chunk does not contain it",
                id, descriptor.chunk
            );
        }
        Ok(record)
    }

    pub async fn load_chunk(&self, chunk: u32) -> Result<()> {
        self.loader.load_chunk(chunk).await
    }

    pub fn is_chunk_loaded(&self, chunk: u32) -> bool {
        self.loader.is_loaded(chunk)
    }

    pub fn loaded_chunks(&self) -> Vec<u32> {
        self.loader.loaded_chunks()
    }

    /// Number of records loaded so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::record;
    use crate::catalog::Level;
    use crate::error::HarkError;
    use crate::source::MemorySource;

    fn setup() -> (Arc<MemorySource>, Arc<EpisodeIndex>, EpisodeStore) {
        let source = Arc::new(MemorySource::from_chunks(vec![
            (
                1,
                vec![
                    record("1", "Coffee Shop", Level::Beginner),
                    record("2", "Job Interview", Level::Intermediate),
                ],
            ),
            (2, vec![record("3", "Airport", Level::Advanced)]),
        ]));
        let index = Arc::new(EpisodeIndex::new());
        let store = EpisodeStore::new(index.clone(), source.clone(), IndexSettings::default());
        (source, index, store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_load_loads_chunk_once() {
        let (source, index, store) = setup();
        index.bootstrap(source.as_ref(), &IndexSettings::default()).await.unwrap();

        assert!(store.get("2").is_none());
        let second = store.get_or_load("2").await.unwrap().unwrap();
        assert_eq!(second.title, "Job Interview");
        assert_eq!(source.chunk_fetches(1), 1);

        // Same chunk, already present: no further fetch.
        assert!(store.get("1").is_some());
        let first = store.get_or_load("1").await.unwrap().unwrap();
        assert_eq!(first.title, "Coffee Shop");
        assert_eq!(source.total_chunk_fetches(), 1);
        assert_eq!(store.loaded_chunks(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_id_is_absent_not_error() {
        let (source, index, store) = setup();
        index.bootstrap(source.as_ref(), &IndexSettings::default()).await.unwrap();

        assert!(store.get_or_load("404").await.unwrap().is_none());
        assert_eq!(source.total_chunk_fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure_is_error() {
        let (source, index, store) = setup();
        index.bootstrap(source.as_ref(), &IndexSettings::default()).await.unwrap();
        source.fail_chunk(2);

        let err = store.get_or_load("3").await.unwrap_err();
        assert!(matches!(err, HarkError::ChunkLoad { chunk: 2, .. }));
        assert!(!store.is_chunk_loaded(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_load_waits_for_index() {
        let (source, index, store) = setup();

        let late_index = index.clone();
        let late_source = source.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            late_index
                .bootstrap(late_source.as_ref(), &IndexSettings::default())
                .await
                .unwrap();
        });

        let record = store.get_or_load("3").await.unwrap().unwrap();
        assert_eq!(record.title, "Airport");
    }
}
