//! In-memory episode source.
//!
//! Useful for testing: counts every fetch and can inject failures and latency.

use super::EpisodeSource;
use crate::catalog::{EpisodeDescriptor, EpisodeRecord};
use crate::error::{HarkError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// In-memory episode source.
pub struct MemorySource {
    index: Vec<EpisodeDescriptor>,
    chunks: BTreeMap<u32, Vec<EpisodeRecord>>,
    latency: Option<Duration>,
    failing_chunks: Mutex<HashSet<u32>>,
    index_failures_left: AtomicU32,
    index_fetches: AtomicUsize,
    chunk_fetches: Mutex<HashMap<u32, usize>>,
}

impl MemorySource {
    /// Create a source with an explicit index and chunk contents.
    pub fn new(index: Vec<EpisodeDescriptor>, chunks: Vec<(u32, Vec<EpisodeRecord>)>) -> Self {
        Self {
            index,
            chunks: chunks.into_iter().collect(),
            latency: None,
            failing_chunks: Mutex::new(HashSet::new()),
            index_failures_left: AtomicU32::new(0),
            index_fetches: AtomicUsize::new(0),
            chunk_fetches: Mutex::new(HashMap::new()),
        }
    }

    /// Create a source whose index lists every record in chunk order.
    pub fn from_chunks(chunks: Vec<(u32, Vec<EpisodeRecord>)>) -> Self {
        let mut ordered = chunks;
        ordered.sort_by_key(|(n, _)| *n);

        let index = ordered
            .iter()
            .flat_map(|(n, records)| {
                records.iter().map(move |r| EpisodeDescriptor {
                    id: r.id.clone(),
                    title: r.title.clone(),
                    level: r.level.clone(),
                    chunk: *n,
                })
            })
            .collect();

        Self::new(index, ordered)
    }

    /// Delay every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make fetches of `chunk` fail until [`MemorySource::heal_chunk`] is called.
    pub fn fail_chunk(&self, chunk: u32) {
        self.failing_chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chunk);
    }

    pub fn heal_chunk(&self, chunk: u32) {
        self.failing_chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&chunk);
    }

    /// Make the next `times` index fetches fail.
    pub fn fail_index_times(&self, times: u32) {
        self.index_failures_left.store(times, Ordering::SeqCst);
    }

    pub fn index_fetches(&self) -> usize {
        self.index_fetches.load(Ordering::SeqCst)
    }

    /// Number of fetches issued for `chunk`, failed ones included.
    pub fn chunk_fetches(&self, chunk: u32) -> usize {
        self.chunk_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chunk)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_chunk_fetches(&self) -> usize {
        self.chunk_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl EpisodeSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} episodes, {} chunks)", self.index.len(), self.chunks.len())
    }

    async fn fetch_index(&self) -> Result<Vec<EpisodeDescriptor>> {
        self.index_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let failing = self
            .index_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(HarkError::IndexUnavailable("injected failure".to_string()));
        }

        Ok(self.index.clone())
    }

    async fn fetch_chunk(&self, chunk: u32) -> Result<Vec<EpisodeRecord>> {
        *self
            .chunk_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(chunk)
            .or_insert(0) += 1;
        self.simulate_latency().await;

        let failing = self
            .failing_chunks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&chunk);
        if failing {
            return Err(HarkError::chunk_load(chunk, "injected failure"));
        }

        self.chunks
            .get(&chunk)
            .cloned()
            .ok_or_else(|| HarkError::chunk_load(chunk, "no such chunk"))
    }
}
