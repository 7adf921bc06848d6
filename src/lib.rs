//! Peer Cache - A distributed lookaside cache node
//!
//! Serves values from a byte-bounded LRU cache, from the peer that owns the
//! key on a consistent hash ring, or from an origin data source, collapsing
//! concurrent misses for the same key into one load.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod hashring;
pub mod models;
pub mod peers;
pub mod singleflight;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{get_group, Getter, GetterFn, Group};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
