//! Time-boxed cache for the current document.

use std::sync::RwLock;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    document: Vec<T>,
    fetched_at: Instant,
}

/// Process-wide TTL cache holding at most one document.
///
/// The entry is replaced wholesale under the lock and never patched in
/// place: readers observe either the previous `{document, fetched_at}`
/// pair or the new one, never a mix. That atomic replacement is the only
/// concurrency guarantee the cache makes.
#[derive(Debug)]
pub struct DocumentCache<T> {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Clone> DocumentCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// The cached document, while its age is within the TTL window.
    pub fn fresh(&self) -> Option<Vec<T>> {
        let guard = self.entry.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().and_then(|entry| {
            (entry.fetched_at.elapsed() <= self.ttl).then(|| entry.document.clone())
        })
    }

    /// Replace the entry with a freshly fetched document.
    pub fn store(&self, document: &[T]) {
        let entry = CacheEntry {
            document: document.to_vec(),
            fetched_at: Instant::now(),
        };
        *self.entry.write().unwrap_or_else(|e| e.into_inner()) = Some(entry);
    }

    /// Drop the entry entirely.
    pub fn invalidate(&self) {
        *self.entry.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
