//! HTTP Peer Pool
//!
//! Picks the owning node for a key from the current peer list.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Client;
use tracing::{debug, info};

use crate::hashring::{HashRing, DEFAULT_REPLICAS};
use crate::peers::{HttpGetter, PeerGetter, PeerPicker};

/// Path prefix the peer endpoint is served under.
pub const DEFAULT_BASE_PATH: &str = "/cache/";

#[derive(Debug, Default)]
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer picker over a consistent hash ring of node base URLs.
///
/// `self_url` is this node's own entry in the peer list; keys it owns are
/// never sent over the network.
#[derive(Debug)]
pub struct HttpPool {
    self_url: String,
    base_path: String,
    replicas: usize,
    client: Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    // == Constructor ==
    pub fn new(self_url: impl Into<String>) -> Self {
        Self::with_options(self_url, DEFAULT_BASE_PATH, DEFAULT_REPLICAS)
    }

    pub fn with_options(
        self_url: impl Into<String>,
        base_path: impl Into<String>,
        replicas: usize,
    ) -> Self {
        Self {
            self_url: self_url.into(),
            base_path: base_path.into(),
            replicas,
            client: Client::new(),
            state: Mutex::new(PoolState::default()),
        }
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // == Set Peers ==
    /// Replaces the peer list. The ring is rebuilt from scratch.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers.into_iter().map(|p| p.as_ref().to_string()).collect();

        let mut ring = HashRing::new(self.replicas, None);
        ring.add(&peers);
        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    format!("{}{}", peer, self.base_path),
                    self.client.clone(),
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.state.lock() = PoolState { ring, getters };
        info!("[Server {}] peer list set to {:?}", self.self_url, peers);
    }

    /// Node owning `key`, including this node itself.
    pub fn owner(&self, key: &str) -> Option<String> {
        self.state.lock().ring.get(key).map(str::to_string)
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }
        debug!("[Server {}] Pick peer {}", self.self_url, peer);
        state
            .getters
            .get(peer)
            .map(|getter| getter.clone() as Arc<dyn PeerGetter>)
    }
}
