//! Episode search.
//!
//! A query is scored in two passes. The index scan matches titles and levels
//! of every descriptor without loading anything. The detail scan then loads a
//! bounded number of the remaining episodes and matches their vocabulary and
//! transcript. Ranked results are cached per normalized query.
//!
//! Every call takes a ticket from a monotonic generation counter. A result
//! whose ticket is no longer the latest when its scan finishes is reported as
//! [`SearchOutcome::Stale`]; in-flight work is never cancelled.

mod cache;
mod debounce;

pub use cache::QueryCache;
pub use debounce::{DebouncedSearch, Debouncer};

use crate::catalog::EpisodeDescriptor;
use crate::config::{IndexSettings, SearchSettings};
use crate::error::Result;
use crate::index::EpisodeIndex;
use crate::store::EpisodeStore;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, instrument, warn};

/// Records loaded concurrently during the detail scan.
const DETAIL_SCAN_CONCURRENCY: usize = 4;

/// A ranked match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub descriptor: EpisodeDescriptor,
    pub score: u32,
}

/// What a search call produced.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The query was too short; the caller should show the unfiltered view.
    Cleared,
    /// Ranked results, best first.
    Results(Arc<Vec<SearchResult>>),
    /// A newer search was issued before this one finished.
    Stale,
}

impl SearchOutcome {
    /// Results if this outcome should be displayed.
    pub fn results(&self) -> Option<&[SearchResult]> {
        match self {
            SearchOutcome::Results(results) => Some(results.as_slice()),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, SearchOutcome::Stale)
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, SearchOutcome::Cleared)
    }
}

/// Trim and lower-case a query. Returns `None` below `min_len` characters.
pub fn normalize_query(query: &str, min_len: usize) -> Option<String> {
    let normalized = query.trim().to_lowercase();
    if normalized.chars().count() < min_len {
        None
    } else {
        Some(normalized)
    }
}

/// Scored search over the episode index and loaded records.
pub struct SearchEngine {
    index: Arc<EpisodeIndex>,
    store: Arc<EpisodeStore>,
    settings: SearchSettings,
    polling: IndexSettings,
    cache: Mutex<QueryCache>,
    generation: AtomicU64,
}

impl SearchEngine {
    pub fn new(
        index: Arc<EpisodeIndex>,
        store: Arc<EpisodeStore>,
        settings: SearchSettings,
        polling: IndexSettings,
    ) -> Self {
        let cache = Mutex::new(QueryCache::new(settings.cache_capacity));
        Self {
            index,
            store,
            settings,
            polling,
            cache,
            generation: AtomicU64::new(0),
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Run a search for `query` on behalf of one input stream.
    ///
    /// Only the most recent call wins: a call overtaken by a newer one
    /// reports [`SearchOutcome::Stale`] once its scan finishes.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(normalized) = normalize_query(query, self.settings.min_query_len) else {
            debug!("Query too short, clearing search");
            return Ok(SearchOutcome::Cleared);
        };

        let ranked = self.rank(&normalized).await?;

        if !self.is_current(ticket) {
            debug!("Discarding stale search result");
            return Ok(SearchOutcome::Stale);
        }

        Ok(SearchOutcome::Results(ranked))
    }

    /// Ranked results for an already normalized query, from the cache or a
    /// fresh scan. Independent callers use this directly; it never reports
    /// staleness.
    #[instrument(skip(self))]
    pub async fn rank(&self, normalized: &str) -> Result<Arc<Vec<SearchResult>>> {
        if let Some(cached) = self.cached(normalized) {
            debug!("Cache hit for {:?} ({} results)", normalized, cached.len());
            return Ok(cached);
        }

        let snapshot = self.index.wait_with(&self.polling).await?;

        let (mut ranked, unmatched) = self.index_scan(snapshot.descriptors(), normalized);
        let index_hits = ranked.len();
        ranked.extend(self.detail_scan(unmatched, normalized).await);
        debug!(
            "Query {:?}: {} index matches, {} detail matches",
            normalized,
            index_hits,
            ranked.len() - index_hits
        );

        // Stable: equal scores keep their input order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        let ranked = Arc::new(ranked);

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalized.to_string(), ranked.clone());

        Ok(ranked)
    }

    /// Cached results for an already normalized query.
    pub fn cached(&self, normalized: &str) -> Option<Arc<Vec<SearchResult>>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(normalized)
    }

    pub fn cache_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Score title and level matches. Returns the matches and the first
    /// `detail_scan_cap` remaining descriptors, both in index order.
    fn index_scan(
        &self,
        descriptors: &[EpisodeDescriptor],
        needle: &str,
    ) -> (Vec<SearchResult>, Vec<EpisodeDescriptor>) {
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for descriptor in descriptors {
            let mut score = 0;
            if descriptor.title.to_lowercase().contains(needle) {
                score += self.settings.title_weight;
            }
            if descriptor.level.as_str().to_lowercase().contains(needle) {
                score += self.settings.level_weight;
            }

            if score > 0 {
                matched.push(SearchResult {
                    descriptor: descriptor.clone(),
                    score,
                });
            } else if unmatched.len() < self.settings.detail_scan_cap {
                unmatched.push(descriptor.clone());
            }
        }

        (matched, unmatched)
    }

    /// Score vocabulary and transcript matches. Records that fail to load
    /// are skipped.
    async fn detail_scan(&self, unmatched: Vec<EpisodeDescriptor>, needle: &str) -> Vec<SearchResult> {
        let scored: Vec<Option<SearchResult>> = stream::iter(unmatched)
            .map(|descriptor: EpisodeDescriptor| async move {
                let record = match self.store.get_or_load(&descriptor.id).await {
                    Ok(Some(record)) => record,
                    Ok(None) => return None,
                    Err(e) => {
                        warn!("Skipping episode {} in detail scan: {}", descriptor.id, e);
                        return None;
                    }
                };

                let mut score = 0;
                if record.vocabulary_contains(needle) {
                    score += self.settings.vocabulary_weight;
                }
                if record.transcript_contains(needle) {
                    score += self.settings.transcript_weight;
                }

                (score > 0).then_some(SearchResult { descriptor, score })
            })
            .buffered(DETAIL_SCAN_CONCURRENCY)
            .collect()
            .await;

        scored.into_iter().flatten().collect()
    }
}
