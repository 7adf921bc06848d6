//! Group Module
//!
//! A group is a named cache namespace. It answers lookups from its local
//! cache, otherwise loads the value once per burst of concurrent callers,
//! either from the peer owning the key or from its origin getter.

mod getter;
mod registry;

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, GroupStats, GroupStatsSnapshot, MainCache};
use crate::error::{CacheError, Result};
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::SingleFlight;

pub use getter::{Getter, GetterFn};
pub use registry::{get_group, group_names};

// == Group ==
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: MainCache,
    peers: OnceCell<Arc<dyn PeerPicker>>,
    loader: SingleFlight<ByteView>,
    stats: GroupStats,
}

impl Group {
    /// Starts building a group named `name`.
    pub fn builder(name: impl Into<String>) -> GroupBuilder {
        GroupBuilder {
            name: name.into(),
            cache_bytes: 0,
            getter: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Binds the peer picker. May only be called once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(peers).map_err(|_| {
            CacheError::Config(format!(
                "peers registered more than once for group '{}'",
                self.name
            ))
        })
    }

    // == Get ==
    /// Returns the value for `key`.
    ///
    /// Lookup order: local cache, then (deduplicated) the owning peer, then
    /// the origin getter. Only origin loads populate the local cache.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.stats.record_get();

        if let Some(value) = self.main_cache.get(key) {
            self.stats.record_cache_hit();
            debug!("[Group {}] cache hit for '{}'", self.name, key);
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.loader
            .work(key, || async move {
                self.stats.record_load();
                if let Some(peer) = self.peers.get().and_then(|p| p.pick_peer(key)) {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => {
                            self.stats.record_peer_load();
                            return Ok(value);
                        }
                        Err(err) => {
                            self.stats.record_peer_error();
                            warn!(
                                "[Group {}] failed to get '{}' from peer, falling back to origin: {}",
                                self.name, key, err
                            );
                        }
                    }
                }
                self.get_locally(key).await
            })
            .await
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_origin_error();
                return Err(CacheError::origin(err));
            }
        };
        self.stats.record_origin_load();

        let value = ByteView::from(bytes);
        self.main_cache.add(key, value.clone());
        Ok(value)
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        Ok(ByteView::from(bytes))
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.main_cache.stats()
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}

// == Group Builder ==
/// Collects a group's settings; [`GroupBuilder::build`] creates and
/// registers it.
pub struct GroupBuilder {
    name: String,
    cache_bytes: u64,
    getter: Option<Arc<dyn Getter>>,
}

impl GroupBuilder {
    /// Byte budget of the local cache (0 = unbounded).
    pub fn cache_bytes(mut self, cache_bytes: u64) -> Self {
        self.cache_bytes = cache_bytes;
        self
    }

    pub fn getter(mut self, getter: impl Getter + 'static) -> Self {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn shared_getter(mut self, getter: Arc<dyn Getter>) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Creates the group and registers it under its name.
    ///
    /// Fails with `CacheError::Config` if no getter was supplied.
    pub fn build(self) -> Result<Arc<Group>> {
        let getter = self.getter.ok_or_else(|| {
            CacheError::Config(format!("no getter configured for group '{}'", self.name))
        })?;

        let group = Arc::new(Group {
            name: self.name,
            getter,
            main_cache: MainCache::new(self.cache_bytes),
            peers: OnceCell::new(),
            loader: SingleFlight::new(),
            stats: GroupStats::new(),
        });
        registry::register(group.clone());
        info!(
            "Group '{}' created with a {} byte cache",
            group.name, self.cache_bytes
        );
        Ok(group)
    }
}
