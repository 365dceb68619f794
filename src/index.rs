//! Episode index.
//!
//! The index is the authoritative, ordered list of episode descriptors. It is
//! populated once and is read-only afterwards. Until it is populated, callers
//! poll for it instead of failing.

use crate::catalog::EpisodeDescriptor;
use crate::config::IndexSettings;
use crate::error::{HarkError, Result};
use crate::source::EpisodeSource;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Immutable view of a populated index.
#[derive(Debug)]
pub struct IndexSnapshot {
    descriptors: Vec<EpisodeDescriptor>,
    positions: HashMap<String, usize>,
}

impl IndexSnapshot {
    /// A repeated id keeps its first occurrence.
    fn new(descriptors: Vec<EpisodeDescriptor>) -> Self {
        let mut positions = HashMap::with_capacity(descriptors.len());
        let mut kept = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if positions.contains_key(&descriptor.id) {
                warn!("Duplicate episode id {} in index, keeping first", descriptor.id);
                continue;
            }
            positions.insert(descriptor.id.clone(), kept.len());
            kept.push(descriptor);
        }

        Self {
            descriptors: kept,
            positions,
        }
    }

    /// All descriptors in canonical order.
    pub fn descriptors(&self) -> &[EpisodeDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, id: &str) -> Option<&EpisodeDescriptor> {
        self.position(id).map(|i| &self.descriptors[i])
    }

    /// Position of `id` in canonical order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Eventually-available episode index.
#[derive(Default)]
pub struct EpisodeIndex {
    slot: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl EpisodeIndex {
    /// Create an index that is not yet populated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an already populated index.
    pub fn from_descriptors(descriptors: Vec<EpisodeDescriptor>) -> Self {
        let index = Self::new();
        index.populate(descriptors);
        index
    }

    /// Populate the index. Returns false if it was already populated, in
    /// which case the existing contents are kept.
    pub fn populate(&self, descriptors: Vec<EpisodeDescriptor>) -> bool {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("Episode index already populated, ignoring new contents");
            return false;
        }
        info!("Episode index ready with {} episodes", descriptors.len());
        *slot = Some(Arc::new(IndexSnapshot::new(descriptors)));
        true
    }

    /// The index if it has been populated.
    pub fn get_index(&self) -> Option<Arc<IndexSnapshot>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.get_index().is_some()
    }

    /// Wait for the index, polling every `interval` up to `max_attempts` times.
    pub async fn wait_ready(&self, interval: Duration, max_attempts: u32) -> Result<Arc<IndexSnapshot>> {
        for attempt in 0..=max_attempts {
            if let Some(snapshot) = self.get_index() {
                return Ok(snapshot);
            }
            if attempt < max_attempts {
                debug!("Episode index not ready, polling again in {:?}", interval);
                tokio::time::sleep(interval).await;
            }
        }

        Err(HarkError::IndexUnavailable(format!(
            "not ready after {} polls",
            max_attempts
        )))
    }

    /// Wait for the index using the configured polling policy.
    pub async fn wait_with(&self, settings: &IndexSettings) -> Result<Arc<IndexSnapshot>> {
        self.wait_ready(settings.poll_interval(), settings.max_poll_attempts)
            .await
    }

    /// Fetch the index from `source` and populate it, retrying with
    /// exponential backoff. Fatal to search and browse when it fails.
    #[instrument(skip(self, source, settings), fields(source = %source.describe()))]
    pub async fn bootstrap(
        &self,
        source: &dyn EpisodeSource,
        settings: &IndexSettings,
    ) -> Result<Arc<IndexSnapshot>> {
        if let Some(snapshot) = self.get_index() {
            return Ok(snapshot);
        }

        let attempts = settings.retry_attempts.max(1);
        let mut delay = settings.retry_base_delay();
        let mut last_error = None;

        for attempt in 1..=attempts {
            match source.fetch_index().await {
                Ok(descriptors) => {
                    self.populate(descriptors);
                    return self
                        .get_index()
                        .ok_or_else(|| HarkError::IndexUnavailable("lost after populate".into()));
                }
                Err(e) => {
                    warn!("Index fetch attempt {}/{} failed: {}", attempt, attempts, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(delay).await;
                        delay = delay.saturating_mul(2);
                    }
                }
            }
        }

        Err(HarkError::IndexUnavailable(match last_error {
            Some(e) => format!("gave up after {} attempts: {}", attempts, e),
            None => format!("gave up after {} attempts", attempts),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::record;
    use crate::catalog::Level;
    use crate::source::MemorySource;

    fn descriptor(id: &str, chunk: u32) -> EpisodeDescriptor {
        EpisodeDescriptor {
            id: id.to_string(),
            title: format!("Episode {}", id),
            level: Level::Beginner,
            chunk,
        }
    }

    #[test]
    fn test_snapshot_lookup() {
        let index = EpisodeIndex::from_descriptors(vec![descriptor("a", 1), descriptor("b", 2)]);
        let snapshot = index.get_index().unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.position("b"), Some(1));
        assert_eq!(snapshot.get("a").unwrap().chunk, 1);
        assert!(snapshot.get("zzz").is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_first_occurrence() {
        let index = EpisodeIndex::from_descriptors(vec![
            descriptor("a", 1),
            descriptor("b", 1),
            descriptor("a", 3),
        ]);
        let snapshot = index.get_index().unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.position("a"), Some(0));
        assert_eq!(snapshot.get("a").unwrap().chunk, 1);
        assert_eq!(snapshot.position("b"), Some(1));
    }

    #[test]
    fn test_populate_only_once() {
        let index = EpisodeIndex::new();
        assert!(!index.is_ready());
        assert!(index.populate(vec![descriptor("a", 1)]));
        assert!(!index.populate(vec![descriptor("b", 1)]));
        assert_eq!(index.get_index().unwrap().descriptors()[0].id, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ready_polls_until_populated() {
        let index = Arc::new(EpisodeIndex::new());

        let late = index.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            late.populate(vec![descriptor("a", 1)]);
        });

        let snapshot = index
            .wait_ready(Duration::from_millis(100), 10)
            .await
            .unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_ready_gives_up() {
        let index = EpisodeIndex::new();
        let err = index
            .wait_ready(Duration::from_millis(10), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, HarkError::IndexUnavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_retries_with_backoff() {
        let source = MemorySource::from_chunks(vec![(1, vec![record("1", "Coffee Shop", Level::Beginner)])]);
        source.fail_index_times(2);

        let index = EpisodeIndex::new();
        let settings = IndexSettings::default();
        let snapshot = index.bootstrap(&source, &settings).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(source.index_fetches(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_fails_after_retries() {
        let source = MemorySource::from_chunks(vec![]);
        source.fail_index_times(10);

        let index = EpisodeIndex::new();
        let settings = IndexSettings {
            retry_attempts: 3,
            ..IndexSettings::default()
        };
        let err = index.bootstrap(&source, &settings).await.unwrap_err();

        assert!(matches!(err, HarkError::IndexUnavailable(_)));
        assert_eq!(source.index_fetches(), 3);
        assert!(!index.is_ready());
    }
}
