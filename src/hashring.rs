//! Consistent Hash Ring
//!
//! Maps keys onto a set of node identifiers. Each node is placed on the ring
//! several times ("virtual nodes") so a handful of real nodes still split
//! the key space evenly.

use std::collections::HashMap;

/// Default number of virtual nodes per real node.
pub const DEFAULT_REPLICAS: usize = 50;

/// Hash function placing keys and virtual nodes on the ring.
pub type HashFn = fn(&[u8]) -> u32;

// == Hash Ring ==
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node hashes
    ring: Vec<u32>,
    /// Virtual node hash -> real node
    nodes: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring. `hash` defaults to CRC-32 (IEEE).
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or(crc32fast::hash),
            replicas,
            ring: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for every given node on the ring.
    ///
    /// Nodes accumulate across calls; build a new ring to drop nodes.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.ring.push(hash);
                self.nodes.insert(hash, node.to_string());
            }
        }
        self.ring.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`, walking clockwise from its hash.
    ///
    /// Returns `None` only when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.ring.partition_point(|&h| h < hash);
        let virtual_hash = self.ring[idx % self.ring.len()];
        self.nodes.get(&virtual_hash).map(String::as_str)
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.ring.len())
            .finish()
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS, None)
    }
}
