//! Node table: the `base`/`check` pair of a double-array trie
//!
//! Both arrays share one node id space. `check[id]` names the parent owning
//! slot `id` (zero when the slot is unused). `base[id]` is a transition offset
//! when positive; otherwise the node is a leaf and `-base[id]` is its tail
//! offset, zero meaning no suffix has been stored yet.

use crate::containers::AutoGrowVec;
use crate::fsa::symbol::Symbol;
use crate::NodeId;
use std::collections::BTreeSet;

/// Fixed id of the root node
pub const ROOT_ID: NodeId = 1;

/// `check` value of an unused slot
pub const CHECK_EMPTY: NodeId = 0;

/// Topology of the trie
#[derive(Debug, Clone)]
pub struct NodeTable {
    base: AutoGrowVec<NodeId>,
    check: AutoGrowVec<NodeId>,
}

impl NodeTable {
    /// Create a table holding only the root
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Self {
            base: AutoGrowVec::with_capacity(capacity),
            check: AutoGrowVec::with_capacity(capacity),
        };
        table.base.set(ROOT_ID, 1);
        table.check.set(ROOT_ID, CHECK_EMPTY);
        table
    }

    /// Rebuild a table from persisted arrays
    pub fn from_parts(base: Vec<NodeId>, check: Vec<NodeId>) -> Self {
        Self {
            base: AutoGrowVec::from_vec(base),
            check: AutoGrowVec::from_vec(check),
        }
    }

    #[inline]
    pub fn base(&self, id: NodeId) -> NodeId {
        self.base.get(id)
    }

    #[inline]
    pub fn check(&self, id: NodeId) -> NodeId {
        self.check.get(id)
    }

    #[inline]
    pub fn set_base(&mut self, id: NodeId, value: NodeId) {
        self.base.set(id, value);
    }

    #[inline]
    pub fn set_check(&mut self, id: NodeId, parent: NodeId) {
        self.check.set(id, parent);
    }

    /// Slot reached from `node` by `symbol`
    #[inline]
    pub fn child<S: Symbol>(&self, node: NodeId, symbol: S) -> NodeId {
        self.base(node) + symbol.code()
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.base(id) <= 0
    }

    /// Unused slot. The root also reads as free here since its `check` is zero;
    /// callers compare against [`ROOT_ID`] where that matters.
    #[inline]
    pub fn is_free(&self, id: NodeId) -> bool {
        self.check(id) == CHECK_EMPTY
    }

    #[inline]
    pub fn owned_by(&self, id: NodeId, parent: NodeId) -> bool {
        self.check(id) == parent
    }

    /// Candidate slot is neither free nor already owned by `parent`
    #[inline]
    pub fn collides(&self, parent: NodeId, candidate: NodeId) -> bool {
        !(self.is_free(candidate) || self.owned_by(candidate, parent))
    }

    /// Slot a base search may hand out
    #[inline]
    fn is_available(&self, id: NodeId) -> bool {
        id != ROOT_ID && self.is_free(id)
    }

    /// Release a slot
    #[inline]
    pub fn free(&mut self, id: NodeId) {
        self.base.set(id, 0);
        self.check.set(id, CHECK_EMPTY);
    }

    /// Every inventory symbol whose slot back-points to `node`
    ///
    /// Leaves have no children. This scan is O(|inventory|).
    pub fn children_of<S: Symbol>(&self, node: NodeId, inventory: &BTreeSet<S>) -> Vec<S> {
        let base = self.base(node);
        if base <= 0 {
            return Vec::new();
        }
        inventory
            .iter()
            .copied()
            .filter(|s| self.check(base + s.code()) == node)
            .collect()
    }

    /// Smallest base `q >= 1` at which every symbol maps to an available slot
    pub fn find_base<S: Symbol>(&self, symbols: &[S]) -> NodeId {
        let mut q: NodeId = 1;
        loop {
            if symbols.iter().all(|s| self.is_available(q + s.code())) {
                return q;
            }
            q += 1;
        }
    }

    /// Move the children of `node` to `new_base`, carrying their subtrees along
    ///
    /// Each moved child keeps its `base`; grandchildren get their `check`
    /// re-pointed to the child's new slot. Old slots are released. Returns the
    /// previous base of `node`.
    pub fn relocate<S: Symbol>(
        &mut self,
        node: NodeId,
        children: &[S],
        new_base: NodeId,
        inventory: &BTreeSet<S>,
    ) -> NodeId {
        let old_base = self.base(node);
        for &symbol in children {
            let old_slot = old_base + symbol.code();
            let new_slot = new_base + symbol.code();
            let child_base = self.base(old_slot);

            self.set_base(new_slot, child_base);
            self.set_check(new_slot, node);

            if child_base > 0 {
                for grandchild in inventory {
                    let slot = child_base + grandchild.code();
                    if self.check(slot) == old_slot {
                        self.set_check(slot, new_slot);
                    }
                }
            }

            self.free(old_slot);
        }
        self.set_base(node, new_base);

        log::trace!(
            "relocated {} children of node {} from base {} to {}",
            children.len(),
            node,
            old_base,
            new_base
        );
        old_base
    }

    /// Node table extent; every occupied slot lies below it
    #[inline]
    pub fn extent(&self) -> usize {
        std::cmp::max(self.base.extent(), self.check.extent())
    }

    pub fn memory_usage(&self) -> usize {
        self.base.memory_usage() + self.check.memory_usage()
    }

    /// `base` without trailing unused slots
    pub fn base_slice(&self) -> &[NodeId] {
        self.base.trimmed()
    }

    /// `check` without trailing unused slots
    pub fn check_slice(&self) -> &[NodeId] {
        self.check.trimmed()
    }
}
