//! LRU Cache Module
//!
//! Byte-bounded Least Recently Used cache with an optional eviction callback.

use std::collections::HashMap;

// == Byte Size ==
/// Anything stored in an [`LruCache`] reports how many bytes it occupies.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

/// Callback invoked with each evicted entry after it has been detached.
///
/// The callback must not call back into the cache that owns it.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Bounded key/value store evicting by recency once `used_bytes` exceeds
/// `max_bytes`.
///
/// Entries live in a slab linked into a doubly-linked list where:
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
///
/// Each entry is charged `key.len() + value.byte_size()` bytes. A `max_bytes`
/// of zero disables eviction.
pub struct LruCache<V> {
    max_bytes: u64,
    used_bytes: u64,
    nodes: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: ByteSize> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_bytes` (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            nodes: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
            on_evicted: None,
        }
    }

    /// Creates an empty cache that reports every eviction to `on_evicted`.
    pub fn with_on_evicted(max_bytes: u64, on_evicted: OnEvicted<V>) -> Self {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(on_evicted);
        cache
    }

    // == Get ==
    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Peek ==
    /// Looks up `key` without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Add ==
    /// Inserts or replaces `key`, promotes it, then evicts from the back
    /// until the byte budget holds again.
    ///
    /// Eviction callbacks run only after the budget is restored, so a
    /// panicking callback leaves the cache consistent.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if let Some(&idx) = self.index.get(&key) {
            if let Some(node) = self.nodes[idx].as_mut() {
                let old = node.value.byte_size() as u64;
                node.value = value;
                self.used_bytes = self.used_bytes - old + node.value.byte_size() as u64;
            }
            self.move_to_front(idx);
        } else {
            self.used_bytes += (key.len() + value.byte_size()) as u64;
            let node = Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            };
            let idx = match self.free.pop() {
                Some(slot) => {
                    self.nodes[slot] = Some(node);
                    slot
                }
                None => {
                    self.nodes.push(Some(node));
                    self.nodes.len() - 1
                }
            };
            self.index.insert(key, idx);
            self.push_front(idx);
        }

        let mut evicted = Vec::new();
        while self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            match self.detach_oldest() {
                Some(node) => evicted.push(node),
                None => break,
            }
        }
        for node in &evicted {
            self.notify_evicted(node);
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any, and returns it.
    ///
    /// The eviction callback runs after the entry is fully detached.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let node = self.detach_oldest()?;
        self.notify_evicted(&node);
        Some((node.key, node.value))
    }

    // == Peek Oldest ==
    /// Returns the key that would be evicted next.
    pub fn peek_oldest(&self) -> Option<&str> {
        let idx = self.tail?;
        self.nodes[idx].as_ref().map(|node| node.key.as_str())
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently charged against the budget.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.nodes[idx].as_ref() {
                Some(node) => {
                    keys.push(node.key.as_str());
                    cursor = node.next;
                }
                None => break,
            }
        }
        keys
    }

    // == List Plumbing ==
    fn detach_oldest(&mut self) -> Option<Node<V>> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        self.used_bytes -= (node.key.len() + node.value.byte_size()) as u64;
        Some(node)
    }

    fn notify_evicted(&mut self, node: &Node<V>) {
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&node.key, &node.value);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.nodes[h].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

impl<V> std::fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn s(v: &str) -> String {
        v.to_string()
    }

    #[test]
    fn test_lru_new() {
        let lru: LruCache<String> = LruCache::new(0);
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_get_hit_and_miss() {
        let mut lru = LruCache::new(0);
        lru.add("key1", s("1234"));

        assert_eq!(lru.get("key1"), Some(&s("1234")));
        assert_eq!(lru.get("key2"), None);
    }

    #[test]
    fn test_lru_add_new_keys_tracks_order() {
        let mut lru = LruCache::new(0);

        lru.add("key1", s("a"));
        lru.add("key2", s("b"));
        lru.add("key3", s("c"));

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(lru.peek_oldest(), Some("key1"));
        assert_eq!(lru.keys(), vec!["key3", "key2", "key1"]);
    }

    #[test]
    fn test_lru_replace_adjusts_bytes() {
        let mut lru = LruCache::new(0);

        lru.add("k", s("v"));
        assert_eq!(lru.used_bytes(), 2);

        lru.add("k", s("longer"));
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.used_bytes(), 7);
        assert_eq!(lru.peek("k"), Some(&s("longer")));

        lru.add("k", s(""));
        assert_eq!(lru.used_bytes(), 1);
    }

    #[test]
    fn test_lru_eviction_by_bytes() {
        let mut lru = LruCache::new(10);

        lru.add("k1", s("v1"));
        lru.add("k2", s("v2"));
        lru.add("k3", s("v3"));

        assert_eq!(lru.len(), 2);
        assert!(lru.peek("k1").is_none());
        assert!(lru.peek("k2").is_some());
        assert!(lru.peek("k3").is_some());
        assert_eq!(lru.used_bytes(), 8);
    }

    #[test]
    fn test_lru_get_promotes_entry() {
        let mut lru = LruCache::new(12);

        lru.add("k1", s("v1"));
        lru.add("k2", s("v2"));
        lru.add("k3", s("v3"));

        // Access k1 so k2 becomes the oldest
        lru.get("k1");
        lru.add("k4", s("v4"));

        assert!(lru.peek("k1").is_some());
        assert!(lru.peek("k2").is_none());
    }

    #[test]
    fn test_lru_readd_promotes_entry() {
        let mut lru = LruCache::new(12);

        lru.add("a", s("1"));
        lru.add("b", s("2"));
        lru.add("c", s("3"));
        lru.add("a", s("9"));

        assert_eq!(lru.peek_oldest(), Some("b"));
        assert_eq!(lru.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lru_remove_oldest() {
        let mut lru = LruCache::new(0);

        lru.add("key1", s("a"));
        lru.add("key2", s("b"));

        assert_eq!(lru.remove_oldest(), Some((s("key1"), s("a"))));
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.used_bytes(), 5);

        assert_eq!(lru.remove_oldest(), Some((s("key2"), s("b"))));
        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_remove_oldest_empty() {
        let mut lru: LruCache<String> = LruCache::new(0);
        assert_eq!(lru.remove_oldest(), None);
    }

    #[test]
    fn test_lru_unbounded_never_evicts() {
        let mut lru = LruCache::new(0);
        for i in 0..1000 {
            lru.add(format!("key{}", i), s("value"));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_lru_oversized_entry_evicts_everything() {
        let mut lru = LruCache::new(4);
        lru.add("k1", s("v1"));
        lru.add("big", s("too large"));

        assert!(lru.is_empty());
        assert_eq!(lru.used_bytes(), 0);
    }

    #[test]
    fn test_lru_on_evicted_callback() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = evicted.clone();
        let mut lru = LruCache::with_on_evicted(
            10,
            Box::new(move |key: &str, value: &String| {
                sink.lock().unwrap().push((key.to_string(), value.clone()));
            }),
        );

        lru.add("key1", s("123456"));
        lru.add("k2", s("k2"));
        lru.add("k3", s("k3"));
        lru.add("k4", s("k4"));

        let evicted = evicted.lock().unwrap();
        assert_eq!(
            *evicted,
            vec![(s("key1"), s("123456")), (s("k2"), s("k2"))]
        );
    }

    #[test]
    fn test_lru_panicking_callback_keeps_budget() {
        let mut lru = LruCache::with_on_evicted(
            4,
            Box::new(|key: &str, _: &String| panic!("eviction of {}", key)),
        );
        lru.add("a", s("1"));
        lru.add("b", s("2"));

        // Both entries must go to fit "cc"; the callback panics on the first
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            lru.add("cc", s("33"));
        }));

        assert!(result.is_err());
        assert!(lru.used_bytes() <= lru.max_bytes());
        assert_eq!(lru.keys(), vec!["cc"]);
        assert_eq!(lru.used_bytes(), 4);
    }

    #[test]
    fn test_lru_slots_are_reused() {
        let mut lru = LruCache::new(8);
        for i in 0..100 {
            lru.add(format!("k{}", i % 10), s("vv"));
        }
        assert!(lru.nodes.len() <= 10);
        assert!(lru.used_bytes() <= 8);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruCache::new(0);

        lru.add("a", s(""));
        lru.add("b", s(""));
        lru.add("c", s(""));

        lru.get("a");
        lru.get("c");
        lru.get("b");

        // front=[b, c, a]=back
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some(s("a")));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some(s("c")));
        assert_eq!(lru.remove_oldest().map(|(k, _)| k), Some(s("b")));
    }
}
