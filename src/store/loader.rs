//! Chunk loader.
//!
//! Each chunk is fetched at most once per session. Concurrent requests for
//! the same chunk queue on a per-chunk gate, and whoever gets through after a
//! successful load sees the chunk marked and returns without fetching.

use super::records::RecordMap;
use crate::error::Result;
use crate::source::EpisodeSource;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, instrument, warn};

/// Fetches chunks from a source into a [`RecordMap`].
pub struct ChunkLoader {
    source: Arc<dyn EpisodeSource>,
    records: Arc<RecordMap>,
    loaded: RwLock<BTreeSet<u32>>,
    gates: Mutex<HashMap<u32, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChunkLoader {
    pub fn new(source: Arc<dyn EpisodeSource>, records: Arc<RecordMap>) -> Self {
        Self {
            source,
            records,
            loaded: RwLock::new(BTreeSet::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_loaded(&self, chunk: u32) -> bool {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&chunk)
    }

    /// Chunk numbers loaded so far, ascending.
    pub fn loaded_chunks(&self) -> Vec<u32> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    fn gate(&self, chunk: u32) -> Arc<tokio::sync::Mutex<()>> {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(chunk)
            .or_default()
            .clone()
    }

    /// Load `chunk` unless it is already loaded.
    ///
    /// On failure the chunk stays unmarked and a later call fetches again.
    #[instrument(skip(self))]
    pub async fn load_chunk(&self, chunk: u32) -> Result<()> {
        if self.is_loaded(chunk) {
            return Ok(());
        }

        let gate = self.gate(chunk);
        let _guard = gate.lock().await;

        if self.is_loaded(chunk) {
            debug!("Chunk {} loaded while waiting", chunk);
            return Ok(());
        }

        let records = match self.source.fetch_chunk(chunk).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load chunk {}: {}", chunk, e);
                return Err(e);
            }
        };

        let count = self.records.insert_all(records);
        self.loaded
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chunk);

        info!("Loaded chunk {} ({} episodes)", chunk, count);
        Ok(())
    }
}
