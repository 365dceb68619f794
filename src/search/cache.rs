//! Bounded query cache with first-in-first-out eviction.

use super::SearchResult;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Ranked results keyed by normalized query.
///
/// Eviction follows insertion order only; reading an entry does not refresh it.
pub struct QueryCache {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, Arc<Vec<SearchResult>>>,
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity + 1),
            entries: HashMap::with_capacity(capacity + 1),
        }
    }

    pub fn get(&self, query: &str) -> Option<Arc<Vec<SearchResult>>> {
        self.entries.get(query).cloned()
    }

    /// Store results for `query`, evicting the oldest entry past capacity.
    pub fn insert(&mut self, query: String, results: Arc<Vec<SearchResult>>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(query.clone(), results).is_some() {
            // Replacing keeps the original insertion slot.
            return;
        }
        self.order.push_back(query);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Arc<Vec<SearchResult>> {
        Arc::new(Vec::new())
    }

    #[test]
    fn test_evicts_first_inserted_not_least_recently_used() {
        let mut cache = QueryCache::new(20);
        for i in 0..20 {
            cache.insert(format!("query {}", i), empty());
        }

        // Reading the oldest entry must not protect it.
        assert!(cache.get("query 0").is_some());

        cache.insert("query 20".to_string(), empty());
        assert_eq!(cache.len(), 20);
        assert!(!cache.contains("query 0"));
        assert!(cache.contains("query 1"));
        assert!(cache.contains("query 20"));
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut cache = QueryCache::new(2);
        cache.insert("a".to_string(), empty());
        cache.insert("b".to_string(), empty());
        cache.insert("a".to_string(), empty());
        cache.insert("c".to_string(), empty());

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut cache = QueryCache::new(0);
        cache.insert("a".to_string(), empty());
        assert!(cache.is_empty());
    }
}
