//! Memo of full episode records keyed by id.

use crate::catalog::EpisodeRecord;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Insert-only map of loaded records.
#[derive(Default)]
pub struct RecordMap {
    records: RwLock<HashMap<String, Arc<EpisodeRecord>>>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<EpisodeRecord>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Insert records, overwriting any previous record with the same id.
    pub fn insert_all(&self, records: Vec<EpisodeRecord>) -> usize {
        let mut map = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let count = records.len();
        for record in records {
            map.insert(record.id.clone(), Arc::new(record));
        }
        count
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
