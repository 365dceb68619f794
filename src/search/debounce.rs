//! Input debouncing.
//!
//! A search only runs once the input has been quiet for a fixed period. The
//! delay is a tokio timer, so tests drive it with a paused clock.

use super::{SearchEngine, SearchOutcome};
use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lets only the last of a burst of calls through.
pub struct Debouncer {
    quiet: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            latest: AtomicU64::new(0),
        }
    }

    /// Wait out the quiet period. Returns false if another call arrived
    /// meanwhile, in which case the caller should drop its work.
    pub async fn settle(&self) -> bool {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quiet).await;
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// Search driven by raw keystrokes.
pub struct DebouncedSearch {
    engine: Arc<SearchEngine>,
    debouncer: Debouncer,
}

impl DebouncedSearch {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        let quiet = engine.settings().debounce();
        Self {
            engine,
            debouncer: Debouncer::new(quiet),
        }
    }

    /// Feed the current input text. Returns `None` when a newer input
    /// arrived during the quiet period.
    pub async fn input(&self, text: &str) -> Option<Result<SearchOutcome>> {
        if !self.debouncer.settle().await {
            return None;
        }
        Some(self.engine.search(text).await)
    }
}
