//! Peers Module
//!
//! Capabilities a group uses to reach the node owning a key, plus the HTTP
//! implementation of both sides of the peer protocol.

mod client;
mod pool;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub use client::HttpGetter;
pub use pool::{HttpPool, DEFAULT_BASE_PATH};

// == Peer Picker ==
/// Chooses the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns a getter for the owning peer, or `None` when this node owns
    /// the key (or no peers are known).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value for a group from one remote node.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Bytes>;
}
