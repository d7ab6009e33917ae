//! Double Array Trie with tail compaction
//!
//! The whole trie lives in two parallel integer arrays plus a suffix buffer:
//! - `base`: transition offset of an internal node, or the negated tail
//!   offset of a leaf
//! - `check`: the parent owning each slot
//! - `tail`: sentinel-terminated suffixes of keys past their last branch
//!
//! For a transition from node `s` with symbol `c`:
//! ```text
//! next = base[s] + c
//! valid iff check[next] == s
//! ```
//!
//! # Lifecycle
//!
//! A trie is built by repeated [`insert`](DoubleArrayTrie::insert) calls and
//! frozen once with [`finalize`](DoubleArrayTrie::finalize). Only
//! [`find`](DoubleArrayTrie::find) is allowed afterwards. Identifiers are leaf
//! node ids: unique per key, and stable once the trie is finalized.
//!
//! # Construction
//!
//! Inserting a path can land on a slot already owned by an unrelated parent.
//! One of the two parents is then moved to a fresh base, taking its subtrees
//! along. When a key reaches a leaf whose stored suffix differs, the leaf is
//! split at the first differing symbol and both continuations become leaves.
//! Suffix space given up by a split is not reclaimed.

use crate::config::{Config, TrieConfig};
use crate::error::{DatrieError, Result};
use crate::fsa::node_table::{NodeTable, CHECK_EMPTY, ROOT_ID};
use crate::fsa::symbol::Symbol;
use crate::fsa::tail::TailStore;
use crate::fsa::traits::{StatisticsProvider, Trie, TrieStats};
use crate::NodeId;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::mem;

/// Double Array Trie mapping symbol sequences to stable node identifiers
///
/// # Examples
///
/// ```rust
/// use datrie::DoubleArrayTrie;
///
/// let mut trie: DoubleArrayTrie = DoubleArrayTrie::new();
/// trie.insert(b"bachelor");
/// trie.insert(b"badge");
/// trie.finalize();
///
/// assert!(trie.find(b"badge").is_some());
/// assert!(trie.find(b"badg").is_none());
/// ```
pub struct DoubleArrayTrie<S: Symbol = u8> {
    nodes: NodeTable,
    tail: TailStore<S>,
    /// Every symbol inserted so far; emptied by `finalize`
    inventory: BTreeSet<S>,
    finalized: bool,
    num_keys: usize,
    config: TrieConfig,
}

impl<S: Symbol> DoubleArrayTrie<S> {
    /// Create an empty trie in the build phase with the default configuration
    pub fn new() -> Self {
        Self::build_empty(TrieConfig::default())
    }

    /// Create an empty trie with a custom configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datrie::{config::TrieConfig, DoubleArrayTrie};
    ///
    /// let config = TrieConfig {
    ///     initial_node_capacity: 4096,
    ///     ..Default::default()
    /// };
    /// let trie: DoubleArrayTrie<u16> = DoubleArrayTrie::with_config(config).unwrap();
    /// assert!(trie.is_empty());
    /// ```
    pub fn with_config(config: TrieConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build_empty(config))
    }

    fn build_empty(config: TrieConfig) -> Self {
        log::debug!(
            "creating double-array trie: node capacity {}, tail capacity {}",
            config.initial_node_capacity,
            config.initial_tail_capacity
        );
        Self {
            nodes: NodeTable::with_capacity(config.initial_node_capacity),
            tail: TailStore::with_capacity(config.initial_tail_capacity),
            inventory: BTreeSet::new(),
            finalized: false,
            num_keys: 0,
            config,
        }
    }

    /// Reassemble a finalized trie from persisted parts
    pub(crate) fn from_parts(
        nodes: NodeTable,
        tail: TailStore<S>,
        num_keys: usize,
        config: TrieConfig,
    ) -> Self {
        Self {
            nodes,
            tail,
            inventory: BTreeSet::new(),
            finalized: true,
            num_keys,
            config,
        }
    }

    pub(crate) fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub(crate) fn tail(&self) -> &TailStore<S> {
        &self.tail
    }

    /// Get the configuration
    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Root node id
    pub fn root(&self) -> NodeId {
        ROOT_ID
    }

    /// True once [`finalize`](Self::finalize) has been called
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Number of distinct keys stored
    pub fn len(&self) -> usize {
        self.num_keys
    }

    /// True when no key has been stored
    pub fn is_empty(&self) -> bool {
        self.num_keys == 0
    }

    /// Insert a key
    ///
    /// The empty key is ignored and inserting an existing key is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the trie has been finalized or if `key` contains the
    /// reserved end symbol.
    pub fn insert(&mut self, key: &[S]) {
        assert!(!self.finalized, "insert called on a finalized trie");
        if key.is_empty() {
            return;
        }
        assert!(
            !key.iter().any(|s| s.is_end()),
            "key contains the reserved end symbol: {:?}",
            key
        );

        let symbols = terminated(key);
        self.inventory.extend(symbols.iter().copied());

        if self.insert_terminated(&symbols) {
            self.num_keys += 1;
        }
    }

    /// Walk `symbols` from the root, creating transitions as needed.
    /// Returns true when a new key was stored.
    fn insert_terminated(&mut self, symbols: &[S]) -> bool {
        let mut current = ROOT_ID;
        let mut claimed = false;
        let mut i = 0;

        while i < symbols.len() {
            if self.nodes.is_leaf(current) {
                return self.split_leaf(current, &symbols[i..]);
            }

            let symbol = symbols[i];
            let candidate = self.nodes.child(current, symbol);

            if candidate == current {
                self.relocate_self(current, symbol);
                continue;
            }

            if candidate == ROOT_ID || self.nodes.collides(current, candidate) {
                current = self.resolve_collision(current, candidate, symbol);
                continue;
            }

            claimed = self.nodes.is_free(candidate);
            if claimed {
                self.nodes.set_check(candidate, current);
            }
            current = candidate;
            i += 1;
        }

        // The whole key, sentinel included, was consumed by transitions
        claimed
    }

    /// Store the remainder of a key at a leaf. Returns true when a new key was stored.
    fn split_leaf(&mut self, node: NodeId, rest: &[S]) -> bool {
        let leaf_base = self.nodes.base(node);
        if leaf_base == 0 {
            let offset = self.tail.append(rest);
            self.nodes.set_base(node, -offset);
            return true;
        }

        let offset = -leaf_base;
        if self.tail.equal_to_tail(rest, offset) {
            return false;
        }

        let mismatch = self.tail.first_mismatch(rest, offset);
        let mut node = node;

        // Shared prefix becomes a chain of single-child internal nodes
        for &symbol in &rest[..mismatch] {
            let base = self.nodes.find_base(&[symbol]);
            self.nodes.set_base(node, base);
            let child = base + symbol.code();
            self.nodes.set_check(child, node);
            node = child;
        }

        let new_symbol = rest[mismatch];
        let old_symbol = self.tail.get(offset + mismatch as NodeId);
        let base = self.nodes.find_base(&[new_symbol, old_symbol]);
        self.nodes.set_base(node, base);

        let old_leaf = base + old_symbol.code();
        self.nodes.set_check(old_leaf, node);
        if old_symbol.is_end() {
            self.nodes.set_base(old_leaf, -(offset + mismatch as NodeId));
        } else {
            self.tail.compact(offset + mismatch as NodeId + 1, offset);
            self.nodes.set_base(old_leaf, -offset);
        }

        let new_leaf = base + new_symbol.code();
        self.nodes.set_check(new_leaf, node);
        if !new_symbol.is_end() {
            let new_offset = self.tail.append(&rest[mismatch + 1..]);
            self.nodes.set_base(new_leaf, -new_offset);
        }

        log::trace!(
            "split leaf after {} shared symbols: old leaf {}, new leaf {}",
            mismatch,
            old_leaf,
            new_leaf
        );
        true
    }

    /// Move `node`'s children so that `symbol` no longer lands on `node` itself
    fn relocate_self(&mut self, node: NodeId, symbol: S) {
        let children = self.nodes.children_of(node, &self.inventory);
        let mut wanted = children.clone();
        wanted.push(symbol);

        let new_base = self.nodes.find_base(&wanted);
        self.nodes.relocate(node, &children, new_base, &self.inventory);
        log::trace!("self-collision at node {} resolved", node);
    }

    /// Free `candidate` for `current` by moving one of the two competing parents.
    /// Returns the id of `current`, which changes if its own parent was moved.
    fn resolve_collision(&mut self, current: NodeId, candidate: NodeId, symbol: S) -> NodeId {
        let mut current_children = self.nodes.children_of(current, &self.inventory);
        current_children.push(symbol);

        // The root slot has no owner to move
        if candidate == ROOT_ID {
            self.move_current(current, current_children);
            return current;
        }

        let owner = self.nodes.check(candidate);
        let owner_children = self.nodes.children_of(owner, &self.inventory);

        if current_children.len() >= owner_children.len() {
            let is_son = current != ROOT_ID && self.nodes.owned_by(current, owner);
            let new_base = self.nodes.find_base(&owner_children);
            let old_base = self
                .nodes
                .relocate(owner, &owner_children, new_base, &self.inventory);

            log::trace!(
                "collision at slot {}: moved owner {} ({} children)",
                candidate,
                owner,
                owner_children.len()
            );

            if is_son {
                return current - old_base + new_base;
            }
            current
        } else {
            self.move_current(current, current_children);
            current
        }
    }

    /// Relocate `current` so that all of `wanted` (existing children plus the
    /// pending symbol, last) fit
    fn move_current(&mut self, current: NodeId, wanted: Vec<S>) {
        let new_base = self.nodes.find_base(&wanted);
        let existing = &wanted[..wanted.len() - 1];
        self.nodes.relocate(current, existing, new_base, &self.inventory);
        log::trace!(
            "collision: moved node {} ({} children)",
            current,
            existing.len()
        );
    }

    /// Look up a key, returning its identifier
    ///
    /// Valid in either phase and never mutates the trie.
    pub fn find(&self, key: &[S]) -> Option<NodeId> {
        if key.is_empty() || key.iter().any(|s| s.is_end()) {
            return None;
        }
        let symbols = terminated(key);

        let mut current = ROOT_ID;
        let mut i = 0;
        loop {
            if self.nodes.is_leaf(current) {
                let rest = &symbols[i..];
                let leaf_base = self.nodes.base(current);
                let matched = if leaf_base == 0 {
                    rest.is_empty()
                } else {
                    self.tail.equal_to_tail(rest, -leaf_base)
                };
                return matched.then_some(current);
            }

            let symbol = *symbols.get(i)?;
            let candidate = self.nodes.child(current, symbol);
            if !self.nodes.owned_by(candidate, current) {
                return None;
            }
            current = candidate;
            i += 1;
        }
    }

    /// Check if a key is stored
    pub fn contains(&self, key: &[S]) -> bool {
        self.find(key).is_some()
    }

    /// End the build phase
    ///
    /// Discards the symbol inventory; afterwards only lookups are allowed.
    /// With [`TrieConfig::verify_on_finalize`] set, the layout is verified
    /// first.
    ///
    /// # Panics
    ///
    /// Panics if called twice, or if verification finds a broken invariant.
    pub fn finalize(&mut self) {
        assert!(!self.finalized, "finalize called on a finalized trie");

        if self.config.verify_on_finalize {
            if let Err(err) = self.check_integrity() {
                panic!("double-array trie failed verification at finalize: {}", err);
            }
        }

        self.finalized = true;
        let inventory = mem::take(&mut self.inventory);
        log::debug!(
            "finalized trie: {} keys, {} distinct symbols released, node extent {}, tail {}",
            self.num_keys,
            inventory.len(),
            self.nodes.extent(),
            self.tail.cursor() - 1
        );
    }

    /// Verify the node table and tail store invariants
    ///
    /// Every occupied slot must be owned by an occupied internal node through a
    /// non-negative symbol offset (one inserted so far, during the build
    /// phase), leaf tail offsets must lie below the tail cursor, and the number
    /// of leaves must equal the number of stored keys.
    pub fn check_integrity(&self) -> Result<()> {
        if self.nodes.base(ROOT_ID) <= 0 {
            return Err(DatrieError::corrupted(ROOT_ID, "root is not an internal node"));
        }
        if self.nodes.check(ROOT_ID) != CHECK_EMPTY {
            return Err(DatrieError::corrupted(ROOT_ID, "root has an owner"));
        }
        if self.tail.cursor() < 1 {
            return Err(DatrieError::corrupted(ROOT_ID, "tail cursor below 1"));
        }

        let codes: HashSet<NodeId> = self.inventory.iter().map(|s| s.code()).collect();
        let extent = self.nodes.extent() as NodeId;
        let mut leaves = 0usize;

        for id in (ROOT_ID + 1)..extent {
            let owner = self.nodes.check(id);
            if owner == CHECK_EMPTY {
                if self.nodes.base(id) != 0 {
                    return Err(DatrieError::corrupted(id, "unused slot has a base"));
                }
                continue;
            }

            if owner < ROOT_ID || owner >= extent {
                return Err(DatrieError::corrupted(id, "owner outside the node table"));
            }
            if owner != ROOT_ID && self.nodes.is_free(owner) {
                return Err(DatrieError::corrupted(id, "owner is not occupied"));
            }
            let owner_base = self.nodes.base(owner);
            if owner_base <= 0 {
                return Err(DatrieError::corrupted(id, "owner is a leaf"));
            }
            let code = id - owner_base;
            if code < 0 {
                return Err(DatrieError::corrupted(id, "slot lies below its owner's base"));
            }
            if !self.finalized && !codes.contains(&code) {
                return Err(DatrieError::corrupted(id, "transition symbol was never inserted"));
            }

            let base = self.nodes.base(id);
            if base <= 0 {
                leaves += 1;
                if base <= -self.tail.cursor() {
                    return Err(DatrieError::corrupted(id, "tail offset past the cursor"));
                }
            } else if base >= extent {
                return Err(DatrieError::corrupted(id, "base outside the node table"));
            }
        }

        if leaves != self.num_keys {
            return Err(DatrieError::corrupted(
                ROOT_ID,
                format!("{} leaves for {} keys", leaves, self.num_keys),
            ));
        }
        Ok(())
    }
}

/// Owned copy of `key` with the end sentinel appended
fn terminated<S: Symbol>(key: &[S]) -> Vec<S> {
    let mut symbols = Vec::with_capacity(key.len() + 1);
    symbols.extend_from_slice(key);
    symbols.push(S::END);
    symbols
}

impl<S: Symbol> Default for DoubleArrayTrie<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> fmt::Debug for DoubleArrayTrie<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleArrayTrie")
            .field("num_keys", &self.num_keys)
            .field("finalized", &self.finalized)
            .field("node_extent", &self.nodes.extent())
            .field("tail_cursor", &self.tail.cursor())
            .field("inventory", &self.inventory.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Symbol> Trie<S> for DoubleArrayTrie<S> {
    fn insert(&mut self, key: &[S]) {
        DoubleArrayTrie::insert(self, key)
    }

    fn find(&self, key: &[S]) -> Option<NodeId> {
        DoubleArrayTrie::find(self, key)
    }

    fn len(&self) -> usize {
        self.num_keys
    }
}

impl<S: Symbol> StatisticsProvider for DoubleArrayTrie<S> {
    fn stats(&self) -> TrieStats {
        let extent = self.nodes.extent() as NodeId;
        let num_nodes = 1 + ((ROOT_ID + 1)..extent)
            .filter(|&id| !self.nodes.is_free(id))
            .count();

        let memory_usage = self.nodes.memory_usage()
            + self.tail.memory_usage()
            + self.inventory.len() * mem::size_of::<S>();

        let mut stats = TrieStats {
            num_nodes,
            num_keys: self.num_keys,
            node_extent: extent as usize,
            tail_len: (self.tail.cursor() - 1) as usize,
            memory_usage,
            bits_per_key: 0.0,
        };
        stats.calculate_bits_per_key();
        stats
    }
}

/// Builder producing finalized tries
///
/// # Examples
///
/// ```rust
/// use datrie::{DoubleArrayTrie, DoubleArrayTrieBuilder};
///
/// let keys = vec![b"apple".to_vec(), b"application".to_vec(), b"apply".to_vec()];
/// let trie: DoubleArrayTrie<u8> = DoubleArrayTrieBuilder::new().build(keys).unwrap();
/// assert_eq!(trie.len(), 3);
/// assert!(trie.is_finalized());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DoubleArrayTrieBuilder {
    config: TrieConfig,
}

impl DoubleArrayTrieBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder with custom configuration
    pub fn with_config(config: TrieConfig) -> Self {
        Self { config }
    }

    /// Insert every key in order, then finalize
    pub fn build<S, I, K>(self, keys: I) -> Result<DoubleArrayTrie<S>>
    where
        S: Symbol,
        I: IntoIterator<Item = K>,
        K: AsRef<[S]>,
    {
        let mut trie = DoubleArrayTrie::with_config(self.config)?;
        for key in keys {
            trie.insert(key.as_ref());
        }
        trie.finalize();
        Ok(trie)
    }
}
