//! Integration tests for the Double Array Trie
//!
//! Covers the documented insert/find scenarios, the build/finalize
//! lifecycle and larger generated key sets.

use std::collections::HashSet;

use datrie::config::TrieConfig;
use datrie::{
    DatrieError, DoubleArrayTrie, DoubleArrayTrieBuilder, NodeId, StatisticsProvider, Trie,
};

// Test data generators
fn generate_sequential_keys(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("key_{:06}", i).into_bytes())
        .collect()
}

fn generate_prefix_keys() -> Vec<Vec<u8>> {
    vec![
        b"a".to_vec(),
        b"ap".to_vec(),
        b"app".to_vec(),
        b"apple".to_vec(),
        b"application".to_vec(),
        b"apply".to_vec(),
        b"apt".to_vec(),
        b"b".to_vec(),
        b"banana".to_vec(),
        b"band".to_vec(),
        b"bandana".to_vec(),
    ]
}

fn generate_collision_prone_keys() -> Vec<Vec<u8>> {
    // Short keys over the whole byte range land on each other's slots often
    let mut keys = Vec::new();
    for a in (1u8..=255).step_by(7) {
        for b in (1u8..=255).step_by(31) {
            keys.push(vec![a, b]);
            keys.push(vec![b, a, b]);
        }
    }
    keys
}

fn build(keys: &[Vec<u8>]) -> DoubleArrayTrie<u8> {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    for key in keys {
        trie.insert(key);
    }
    trie.finalize();
    trie
}

fn assert_all_found_and_distinct(trie: &DoubleArrayTrie<u8>, keys: &[Vec<u8>]) {
    let distinct: HashSet<&Vec<u8>> = keys.iter().collect();
    let mut ids = HashSet::new();
    for key in &distinct {
        let id = trie
            .find(key)
            .unwrap_or_else(|| panic!("key {:?} not found", key));
        ids.insert(id);
    }
    assert_eq!(ids.len(), distinct.len());
    assert_eq!(trie.len(), distinct.len());
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_scenario_branching_words() {
    let bachelor = [3, 2, 4, 9, 6, 13, 16, 19];
    let jar = [11, 2, 19];
    let badge = [3, 2, 5, 8, 6];
    let baby = [3, 2, 3, 26];

    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.insert(&bachelor);
    trie.insert(&jar);
    trie.insert(&badge);
    trie.insert(&baby);
    trie.finalize();

    let ids: HashSet<NodeId> = [&bachelor[..], &jar, &badge, &baby]
        .iter()
        .map(|key| trie.find(key).expect("inserted key must be found"))
        .collect();
    assert_eq!(ids.len(), 4);

    assert_eq!(trie.find(&[3, 2, 5, 8, 6, 7]), None);
    assert_eq!(trie.find(&[3, 2, 5, 8]), None);
}

#[test]
fn test_scenario_prefix_and_extension() {
    let keys: [&[u8]; 4] = [&[3, 2], &[3, 2, 4], &[3, 6], &[3, 2, 6, 6, 6]];

    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    for key in keys {
        trie.insert(key);
    }
    trie.finalize();

    let ids: HashSet<NodeId> = keys
        .iter()
        .map(|key| trie.find(key).expect("inserted key must be found"))
        .collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_scenario_shorter_key_after_longer() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.insert(&[3, 3, 3]);
    trie.insert(&[3, 3]);
    trie.finalize();

    let long = trie.find(&[3, 3, 3]).unwrap();
    let short = trie.find(&[3, 3]).unwrap();
    assert_ne!(long, short);
    assert_eq!(trie.find(&[3]), None);
    assert_eq!(trie.find(&[3, 3, 3, 3]), None);
}

#[test]
fn test_scenario_duplicate_insert() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.insert(&[5, 5, 5]);
    trie.insert(&[5, 5, 5]);
    trie.finalize();

    let queries: [&[u8]; 3] = [&[5, 5, 5], &[5, 5, 5], &[5, 5, 5]];
    let ids: HashSet<NodeId> = queries.iter().filter_map(|key| trie.find(key)).collect();
    assert_eq!(ids.len(), 1);
    assert_eq!(trie.len(), 1);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_ids_stable_after_finalize() {
    let keys = generate_prefix_keys();
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    for key in &keys {
        trie.insert(key);
    }
    trie.finalize();

    let first: Vec<Option<NodeId>> = keys.iter().map(|k| trie.find(k)).collect();
    let second: Vec<Option<NodeId>> = keys.iter().map(|k| trie.find(k)).collect();
    assert_eq!(first, second);
}

#[test]
fn test_find_during_build() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.insert(b"apple");
    assert!(trie.contains(b"apple"));
    assert!(!trie.contains(b"apply"));

    trie.insert(b"apply");
    assert!(trie.contains(b"apple"));
    assert!(trie.contains(b"apply"));
    assert!(trie.check_integrity().is_ok());
}

#[test]
fn test_empty_trie() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.finalize();
    assert!(trie.is_empty());
    assert_eq!(trie.find(b"anything"), None);
    assert_eq!(trie.find(b""), None);
}

#[test]
fn test_empty_key_never_found() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.insert(b"");
    trie.insert(b"x");
    trie.finalize();
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.find(b""), None);
}

#[test]
#[should_panic(expected = "finalized")]
fn test_insert_after_finalize_panics() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.finalize();
    trie.insert(b"late");
}

#[test]
#[should_panic(expected = "reserved end symbol")]
fn test_key_with_end_symbol_panics() {
    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    trie.insert(&[1, 0, 2]);
}

// =============================================================================
// GENERATED KEY SETS
// =============================================================================

#[test]
fn test_sequential_keys() {
    let keys = generate_sequential_keys(2000);
    let trie = build(&keys);
    assert_all_found_and_distinct(&trie, &keys);
    assert_eq!(trie.find(b"key_002000"), None);
    assert_eq!(trie.find(b"key_"), None);
}

#[test]
fn test_prefix_keys() {
    let keys = generate_prefix_keys();
    let trie = build(&keys);
    assert_all_found_and_distinct(&trie, &keys);
    for missing in [&b"appl"[..], b"ban", b"bandanas", b"c"] {
        assert_eq!(trie.find(missing), None, "{:?}", missing);
    }
}

#[test]
fn test_collision_prone_keys() {
    let keys = generate_collision_prone_keys();
    let trie = build(&keys);
    assert_all_found_and_distinct(&trie, &keys);
}

#[test]
fn test_reverse_insertion_order() {
    let mut keys = generate_prefix_keys();
    keys.reverse();
    let trie = build(&keys);
    assert_all_found_and_distinct(&trie, &keys);
}

#[test]
fn test_long_keys() {
    let keys: Vec<Vec<u8>> = (1u8..=20)
        .map(|i| {
            let mut key = vec![b'z'; 300];
            key.push(i);
            key
        })
        .collect();
    let trie = build(&keys);
    assert_all_found_and_distinct(&trie, &keys);
    assert_eq!(trie.find(&vec![b'z'; 300]), None);
}

// =============================================================================
// SYMBOL TYPES
// =============================================================================

#[test]
fn test_wide_symbols() {
    let keys: Vec<Vec<u16>> = vec![vec![1000, 2000], vec![1000, 3000, 7], vec![65535], vec![1]];
    let trie: DoubleArrayTrie<u16> = DoubleArrayTrieBuilder::new().build(&keys).unwrap();

    let ids: HashSet<NodeId> = keys.iter().map(|k| trie.find(k).unwrap()).collect();
    assert_eq!(ids.len(), keys.len());
    assert_eq!(trie.find(&[1000]), None);
}

#[test]
fn test_char_symbols() {
    let words = ["über", "übel", "日本", "日本語", "naïve"];
    let keys: Vec<Vec<char>> = words.iter().map(|w| w.chars().collect()).collect();
    let trie: DoubleArrayTrie<char> = DoubleArrayTrieBuilder::new().build(&keys).unwrap();

    for key in &keys {
        assert!(trie.contains(key));
    }
    let missing: Vec<char> = "日".chars().collect();
    assert!(!trie.contains(&missing));
}

// =============================================================================
// BUILDER, CONFIG, TRAITS
// =============================================================================

#[test]
fn test_builder_with_small_capacities() {
    let config = TrieConfig {
        initial_node_capacity: 2,
        initial_tail_capacity: 0,
        verify_on_finalize: true,
    };
    let keys = generate_sequential_keys(300);
    let trie: DoubleArrayTrie<u8> = DoubleArrayTrieBuilder::with_config(config)
        .build(&keys)
        .unwrap();
    assert_all_found_and_distinct(&trie, &keys);
}

#[test]
fn test_builder_rejects_bad_config() {
    let config = TrieConfig {
        initial_node_capacity: 0,
        ..Default::default()
    };
    let result: datrie::Result<DoubleArrayTrie<u8>> =
        DoubleArrayTrieBuilder::with_config(config).build(Vec::<Vec<u8>>::new());
    assert!(matches!(result, Err(DatrieError::Configuration { .. })));
}

#[test]
fn test_trait_object_usage() {
    fn load(trie: &mut dyn Trie<u8>, keys: &[&[u8]]) {
        for key in keys {
            trie.insert(key);
        }
    }

    let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
    load(&mut trie, &[b"one", b"two", b"three"]);
    let dyn_trie: &dyn Trie<u8> = &trie;
    assert_eq!(dyn_trie.len(), 3);
    assert!(dyn_trie.contains(b"two"));
}

#[test]
fn test_statistics() {
    let keys = generate_sequential_keys(500);
    let trie = build(&keys);
    let stats = trie.stats();

    assert_eq!(stats.num_keys, 500);
    assert!(stats.num_nodes > stats.num_keys);
    assert!(stats.node_extent >= stats.num_nodes);
    assert!(stats.tail_len > 0);
    assert!(stats.memory_usage > 0);
    assert!(stats.bits_per_key > 0.0);
}
