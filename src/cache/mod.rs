//! Cache Module
//!
//! Provides the byte-bounded LRU cache each group keeps in memory.

mod byteview;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byteview::ByteView;
pub use lru::{ByteSize, LruCache, OnEvicted};
pub use stats::{CacheStats, GroupStats, GroupStatsSnapshot};
pub use store::MainCache;
