//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions,
//! plus per-group load counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time metrics of a single LRU cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of entries evicted due to the byte budget
    pub evictions: u64,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Bytes currently charged against the budget
    pub bytes: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Group Stats ==
/// Lock-free counters updated on every lookup through a group.
#[derive(Debug, Default)]
pub struct GroupStats {
    /// Calls to `Group::get` with a valid key
    gets: AtomicU64,
    /// Lookups answered by the local cache
    cache_hits: AtomicU64,
    /// Loads that actually ran after deduplication
    loads: AtomicU64,
    /// Values served by a peer
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    /// Values produced by the origin getter
    origin_loads: AtomicU64,
    origin_errors: AtomicU64,
}

impl GroupStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_origin_load(&self) {
        self.origin_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_origin_error(&self) {
        self.origin_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a serializable snapshot.
    pub fn snapshot(&self) -> GroupStatsSnapshot {
        GroupStatsSnapshot {
            gets: self.gets.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            origin_loads: self.origin_loads.load(Ordering::Relaxed),
            origin_errors: self.origin_errors.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`GroupStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStatsSnapshot {
    pub gets: u64,
    pub cache_hits: u64,
    pub loads: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub origin_loads: u64,
    pub origin_errors: u64,
}
