//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key determinism, capacity and invalidation behaviour.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{generate_key, CacheStore};

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;
const TEST_DEFAULT_TTL: u64 = 300_000;

// == Strategies ==
/// Generates cache keys in the `segment:segment` shape used by the catalog
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(:[a-zA-Z0-9_]{1,8}){0,3}".prop_map(|s| s)
}

/// Generates JSON payloads of a few shapes
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 ]{0,64}".prop_map(|s| json!(s)),
        prop::collection::vec("[a-z]{1,8}", 0..5).prop_map(|v| json!(v)),
        ("[a-z]{1,8}", any::<u32>()).prop_map(|(title, id)| json!({"title": title, "id": id})),
    ]
}

fn params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-zA-Z_]{1,10}", "[a-zA-Z0-9]{0,10}", 0..8)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Same parameter set in any order produces the same key
    #[test]
    fn prop_generate_key_order_independent(
        prefix in "[a-z]{1,8}:[a-z]{1,8}",
        params in params_strategy(),
    ) {
        let mut reversed = params.clone();
        reversed.reverse();

        prop_assert_eq!(
            generate_key(&prefix, params.clone()),
            generate_key(&prefix, reversed)
        );
    }

    // Generated keys always start with the prefix and list every parameter once
    #[test]
    fn prop_generate_key_shape(
        prefix in "[a-z]{1,8}",
        params in params_strategy(),
    ) {
        let key = generate_key(&prefix, params.clone());
        prop_assert!(key.starts_with(&prefix));

        if params.is_empty() {
            prop_assert_eq!(key, prefix);
        } else {
            let sorted: BTreeMap<_, _> = params.into_iter().collect();
            let expected: Vec<String> = sorted
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect();
            prop_assert_eq!(key, format!("{}:{}", prefix, expected.join("|")));
        }
    }

    // A value is readable right after it is written
    #[test]
    fn prop_set_then_get(
        key in key_strategy(),
        value in value_strategy(),
        ttl in 1_000u64..10_000_000,
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);

        store.set(key.clone(), value.clone(), Some(ttl));

        prop_assert!(store.has(&key));
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Entry count never exceeds the configured maximum
    #[test]
    fn prop_capacity_enforcement(
        max_size in 1usize..20,
        keys in prop::collection::vec(key_strategy(), 1..60),
    ) {
        let mut store = CacheStore::new(max_size, TEST_DEFAULT_TTL);

        for key in keys {
            store.set(key, json!(1), None);
            prop_assert!(store.len() <= max_size);
            prop_assert!(store.stats().within_capacity());
        }
    }

    // Writing max_size + 1 distinct keys evicts exactly the first one
    #[test]
    fn prop_first_inserted_is_evicted(
        keys in prop::collection::hash_set(key_strategy(), 2..30),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let max_size = keys.len() - 1;
        let mut store = CacheStore::new(max_size, TEST_DEFAULT_TTL);

        for key in &keys {
            store.set(key.clone(), json!(key), None);
        }

        prop_assert_eq!(store.len(), max_size);
        prop_assert!(!store.has(&keys[0]));
        for key in &keys[1..] {
            prop_assert!(store.has(key));
        }
    }

    // A prefix pattern removes exactly the keys carrying that prefix
    #[test]
    fn prop_delete_pattern_prefix(
        movie_keys in prop::collection::hash_set("movies:[a-z0-9:]{1,12}", 0..10),
        other_keys in prop::collection::hash_set("(theaters|reviews):[a-z0-9:]{1,12}", 0..10),
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        for key in movie_keys.iter().chain(other_keys.iter()) {
            store.set(key.clone(), json!(null), None);
        }

        let removed = store.delete_pattern("movies:*");

        prop_assert_eq!(removed, movie_keys.len());
        let remaining: HashSet<String> = store.keys().into_iter().collect();
        prop_assert_eq!(remaining, other_keys);
    }

    // Deleting twice is the same as deleting once
    #[test]
    fn prop_delete_idempotent(
        keys in prop::collection::vec(key_strategy(), 1..20),
        target in key_strategy(),
    ) {
        let mut once = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        let mut twice = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        for key in &keys {
            once.set(key.clone(), json!(1), None);
            twice.set(key.clone(), json!(1), None);
        }

        once.delete(&target);
        twice.delete(&target);
        twice.delete(&target);

        prop_assert_eq!(once.keys(), twice.keys());
    }

    // active + expired always adds up to total
    #[test]
    fn prop_stats_consistency(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..30),
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
        for (key, value) in entries {
            store.set(key, value, None);
        }

        let stats = store.stats();
        prop_assert_eq!(stats.total_entries, store.len());
        prop_assert_eq!(stats.active_entries + stats.expired_entries, stats.total_entries);
        prop_assert_eq!(stats.max_size, TEST_MAX_SIZE);
    }
}

// Time-dependent property kept out of the proptest loop so it sleeps once
#[test]
fn expired_entries_leave_active_count() {
    let mut store = CacheStore::new(TEST_MAX_SIZE, TEST_DEFAULT_TTL);
    for i in 0..10 {
        let ttl = if i % 2 == 0 { 10 } else { 60_000 };
        store.set(format!("k:{}", i), json!(i), Some(ttl));
    }

    sleep(Duration::from_millis(40));

    let stats = store.stats();
    assert_eq!(stats.total_entries, 10);
    assert_eq!(stats.expired_entries, 5);
    assert_eq!(stats.active_entries, 5);

    assert_eq!(store.get("k:0"), None);
    assert_eq!(store.stats().total_entries, 9);
}
