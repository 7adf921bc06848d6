//! Main Cache Module
//!
//! Thread-safe wrapper around the LRU cache used by each group.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::{ByteView, CacheStats, LruCache};

// == Main Cache ==
/// The cache a group populates from its origin.
///
/// Every access, including reads, goes through one mutex since a hit
/// reorders the recency list.
#[derive(Debug)]
pub struct MainCache {
    lru: Mutex<LruCache<ByteView>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: Arc<AtomicU64>,
}

impl MainCache {
    // == Constructor ==
    /// Creates a cache bounded to `max_bytes` (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        let evictions = Arc::new(AtomicU64::new(0));
        let counter = evictions.clone();
        let lru = LruCache::with_on_evicted(
            max_bytes,
            Box::new(move |key: &str, value: &ByteView| {
                counter.fetch_add(1, Ordering::Relaxed);
                trace!("Evicted key '{}' ({} bytes)", key, value.len());
            }),
        );

        Self {
            lru: Mutex::new(lru),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions,
        }
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let value = self.lru.lock().get(key).cloned();
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    // == Add ==
    pub fn add(&self, key: &str, value: ByteView) {
        self.lru.lock().add(key, value);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let lru = self.lru.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: lru.len(),
            bytes: lru.used_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.lru.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.lock().is_empty()
    }
}
