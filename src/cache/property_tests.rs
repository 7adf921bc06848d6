//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check byte accounting and recency ordering of the LRU cache.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::LruCache;

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,3}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,16}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Add { key: String, value: String },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Add { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

fn resident_bytes(cache: &LruCache<String>) -> u64 {
    cache
        .keys()
        .into_iter()
        .map(|k| (k.len() + cache.peek(k).map_or(0, |v| v.len())) as u64)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // used_bytes always equals the sum of resident entry sizes, and never
    // exceeds a non-zero budget.
    #[test]
    fn prop_byte_accounting(
        max_bytes in prop_oneof![Just(0u64), 1u64..64],
        ops in prop::collection::vec(cache_op_strategy(), 1..100)
    ) {
        let mut cache = LruCache::new(max_bytes);

        for op in ops {
            match op {
                CacheOp::Add { key, value } => cache.add(key, value),
                CacheOp::Get { key } => {
                    cache.get(&key);
                }
            }

            prop_assert_eq!(cache.used_bytes(), resident_bytes(&cache));
            if max_bytes != 0 {
                prop_assert!(
                    cache.used_bytes() <= max_bytes,
                    "used {} exceeds max {}",
                    cache.used_bytes(),
                    max_bytes
                );
            }
            prop_assert_eq!(cache.keys().len(), cache.len());
        }
    }

    // The most recently accessed key is the last to go among keys not
    // accessed afterwards.
    #[test]
    fn prop_recency_ordering(
        keys in prop::collection::hash_set(key_strategy(), 2..8),
        touch in any::<prop::sample::Index>()
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut cache = LruCache::new(0);
        for key in &keys {
            cache.add(key.clone(), "v".to_string());
        }

        let touched = touch.get(&keys).clone();
        cache.get(&touched);

        let mut evicted = Vec::new();
        while let Some((key, _)) = cache.remove_oldest() {
            evicted.push(key);
        }
        prop_assert_eq!(evicted.len(), keys.len());
        prop_assert_eq!(evicted.last(), Some(&touched));
    }

    // Whatever is resident holds the value most recently added for that key.
    #[test]
    fn prop_resident_values_are_latest(
        ops in prop::collection::vec((key_strategy(), value_strategy()), 1..60)
    ) {
        let mut cache = LruCache::new(48);
        let mut latest = HashMap::new();

        for (key, value) in ops {
            latest.insert(key.clone(), value.clone());
            cache.add(key, value);
        }

        for key in cache.keys() {
            prop_assert_eq!(cache.peek(key), latest.get(key));
        }
    }
}
