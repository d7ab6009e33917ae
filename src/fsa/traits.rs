//! Core trie traits and statistics

use crate::fsa::symbol::Symbol;
use crate::NodeId;

use serde::{Deserialize, Serialize};

/// Trait for tries mapping symbol sequences to stable identifiers
pub trait Trie<S: Symbol> {
    /// Insert a key during the build phase
    ///
    /// Re-inserting an existing key is a no-op; the empty key is ignored.
    fn insert(&mut self, key: &[S]);

    /// Look up a key
    ///
    /// # Returns
    /// * `Some(NodeId)` identifying the key if it is stored, `None` otherwise
    fn find(&self, key: &[S]) -> Option<NodeId>;

    /// Check if a key exists in the trie
    fn contains(&self, key: &[S]) -> bool {
        self.find(key).is_some()
    }

    /// Get the number of distinct keys in the trie
    fn len(&self) -> usize;

    /// Check if the trie is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Statistics about trie layout and memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrieStats {
    /// Occupied node slots, root included
    pub num_nodes: usize,
    /// Number of keys stored
    pub num_keys: usize,
    /// Backing extent of the node table
    pub node_extent: usize,
    /// Tail store symbols consumed, abandoned fragments included
    pub tail_len: usize,
    /// Memory usage in bytes
    pub memory_usage: usize,
    /// Space efficiency (bits per key)
    pub bits_per_key: f64,
}

impl TrieStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate bits per key
    pub fn calculate_bits_per_key(&mut self) {
        if self.num_keys > 0 {
            self.bits_per_key = (self.memory_usage * 8) as f64 / self.num_keys as f64;
        }
    }

    /// Fraction of node table slots in use
    pub fn load_factor(&self) -> f64 {
        if self.node_extent == 0 {
            0.0
        } else {
            self.num_nodes as f64 / self.node_extent as f64
        }
    }
}

/// Trait for structures that provide layout statistics
pub trait StatisticsProvider {
    /// Get detailed statistics about the trie
    fn stats(&self) -> TrieStats;

    /// Get memory usage in bytes
    fn memory_usage(&self) -> usize {
        self.stats().memory_usage
    }

    /// Get space efficiency in bits per key
    fn bits_per_key(&self) -> f64 {
        self.stats().bits_per_key
    }
}
