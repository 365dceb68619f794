//! Episode library.
//!
//! Owns one instance of every piece of session state (index, loaded chunks,
//! record store, search cache) and exposes the three queries consumers use:
//! the index, full records and search.

use crate::browse;
use crate::catalog::{EpisodeDescriptor, EpisodeRecord};
use crate::config::Settings;
use crate::error::Result;
use crate::index::{EpisodeIndex, IndexSnapshot};
use crate::search::{normalize_query, DebouncedSearch, SearchEngine, SearchOutcome, SearchResult};
use crate::source::{create_source, EpisodeSource};
use crate::store::EpisodeStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Session-wide episode library.
pub struct Library {
    settings: Settings,
    source: Arc<dyn EpisodeSource>,
    index: Arc<EpisodeIndex>,
    store: Arc<EpisodeStore>,
    search: Arc<SearchEngine>,
}

impl Library {
    /// Create a library over the source selected in `settings`.
    pub fn new(settings: Settings) -> Result<Self> {
        let source = create_source(&settings)?;
        Ok(Self::with_source(settings, source))
    }

    /// Create a library over a custom source.
    pub fn with_source(settings: Settings, source: Arc<dyn EpisodeSource>) -> Self {
        let index = Arc::new(EpisodeIndex::new());
        let store = Arc::new(EpisodeStore::new(
            index.clone(),
            source.clone(),
            settings.index.clone(),
        ));
        let search = Arc::new(SearchEngine::new(
            index.clone(),
            store.clone(),
            settings.search.clone(),
            settings.index.clone(),
        ));

        Self {
            settings,
            source,
            index,
            store,
            search,
        }
    }

    /// Fetch the index, then preload the configured chunks in the background.
    pub async fn start(&self) -> Result<Arc<IndexSnapshot>> {
        info!("Loading episode index from {}", self.source.describe());
        let snapshot = self
            .index
            .bootstrap(self.source.as_ref(), &self.settings.index)
            .await?;
        self.spawn_preload();
        Ok(snapshot)
    }

    /// Load `browse.preload_chunks` one after another, spaced by the
    /// configured stagger. Failures are logged and ignored.
    pub fn spawn_preload(&self) -> JoinHandle<()> {
        let store = self.store.clone();
        let chunks = self.settings.browse.preload_chunks.clone();
        let stagger = Duration::from_millis(self.settings.browse.preload_stagger_ms);

        tokio::spawn(async move {
            for (i, chunk) in chunks.into_iter().enumerate() {
                if i > 0 && !stagger.is_zero() {
                    tokio::time::sleep(stagger).await;
                }
                match store.load_chunk(chunk).await {
                    Ok(()) => debug!("Preloaded chunk {}", chunk),
                    Err(e) => warn!("Preloading chunk {} failed: {}", chunk, e),
                }
            }
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn source(&self) -> &Arc<dyn EpisodeSource> {
        &self.source
    }

    /// The index if it is ready.
    pub fn get_index(&self) -> Option<Arc<IndexSnapshot>> {
        self.index.get_index()
    }

    /// The index, polling until it is ready.
    pub async fn index(&self) -> Result<Arc<IndexSnapshot>> {
        self.index.wait_with(&self.settings.index).await
    }

    pub async fn get_or_load(&self, id: &str) -> Result<Option<Arc<EpisodeRecord>>> {
        self.store.get_or_load(id).await
    }

    /// Search on behalf of the session's single input stream; superseded
    /// calls come back [`SearchOutcome::Stale`].
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        self.search.search(query).await
    }

    /// Ranked results for one standalone request. `None` when the query is
    /// too short to search.
    pub async fn ranked(&self, query: &str) -> Result<Option<Arc<Vec<SearchResult>>>> {
        match normalize_query(query, self.settings.search.min_query_len) {
            Some(normalized) => Ok(Some(self.search.rank(&normalized).await?)),
            None => Ok(None),
        }
    }

    /// A keystroke-driven search session sharing this library's cache.
    pub fn debounced_search(&self) -> DebouncedSearch {
        DebouncedSearch::new(self.search.clone())
    }

    pub async fn next(&self, id: &str) -> Result<Option<EpisodeDescriptor>> {
        let snapshot = self.index().await?;
        Ok(browse::next(&snapshot, id).cloned())
    }

    pub async fn previous(&self, id: &str) -> Result<Option<EpisodeDescriptor>> {
        let snapshot = self.index().await?;
        Ok(browse::previous(&snapshot, id).cloned())
    }

    pub fn store(&self) -> &Arc<EpisodeStore> {
        &self.store
    }

    pub fn search_engine(&self) -> &Arc<SearchEngine> {
        &self.search
    }
}
