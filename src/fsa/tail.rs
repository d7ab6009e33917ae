//! Tail store: append-only buffer of suffix fragments
//!
//! A fragment starting at offset `t` runs up to and including the first end
//! sentinel at or after `t`. Offsets start at 1 so that a leaf `base` of zero
//! can mean "no suffix yet". The cursor only grows; fragments superseded by a
//! split are never reclaimed.

use crate::containers::AutoGrowVec;
use crate::fsa::symbol::Symbol;
use crate::NodeId;

#[derive(Debug, Clone)]
pub struct TailStore<S> {
    symbols: AutoGrowVec<S>,
    cursor: NodeId,
}

impl<S: Symbol> TailStore<S> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: AutoGrowVec::with_capacity(capacity),
            cursor: 1,
        }
    }

    pub fn from_parts(symbols: Vec<S>, cursor: NodeId) -> Self {
        Self {
            symbols: AutoGrowVec::from_vec(symbols),
            cursor,
        }
    }

    #[inline]
    pub fn get(&self, offset: NodeId) -> S {
        self.symbols.get(offset)
    }

    /// Next free offset
    #[inline]
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Write `fragment` at the cursor and return where it starts
    pub fn append(&mut self, fragment: &[S]) -> NodeId {
        let start = self.cursor;
        for (i, &symbol) in fragment.iter().enumerate() {
            self.symbols.set(start + i as NodeId, symbol);
        }
        self.cursor += fragment.len() as NodeId;
        start
    }

    /// Compare a sentinel-terminated key slice with the fragment at `start`
    ///
    /// Once the fragment reaches its sentinel, the slices are equal only if
    /// the key is at its sentinel too.
    pub fn equal_to_tail(&self, key: &[S], start: NodeId) -> bool {
        for (i, &symbol) in key.iter().enumerate() {
            let stored = self.get(start + i as NodeId);
            if stored.is_end() {
                return symbol.is_end();
            }
            if symbol != stored {
                return false;
            }
        }
        true
    }

    /// Position of the first symbol where `key` and the fragment at `start` differ
    pub fn first_mismatch(&self, key: &[S], start: NodeId) -> usize {
        key.iter()
            .enumerate()
            .position(|(i, &symbol)| symbol != self.get(start + i as NodeId))
            .unwrap_or(key.len())
    }

    /// Copy the fragment at `from` down to `to`, sentinel included
    pub fn compact(&mut self, from: NodeId, to: NodeId) {
        debug_assert!(to <= from);
        let mut i = 0;
        loop {
            let symbol = self.get(from + i);
            self.symbols.set(to + i, symbol);
            if symbol.is_end() {
                break;
            }
            i += 1;
        }
    }

    /// Fragment text at `start`, sentinel excluded
    #[cfg(test)]
    pub fn fragment(&self, start: NodeId) -> Vec<S> {
        let mut out = Vec::new();
        let mut offset = start;
        loop {
            let symbol = self.get(offset);
            if symbol.is_end() {
                return out;
            }
            out.push(symbol);
            offset += 1;
        }
    }

    /// Live portion of the buffer, `[0, cursor)`
    pub fn as_slice(&self) -> &[S] {
        let used = std::cmp::min(self.cursor as usize, self.symbols.extent());
        &self.symbols.as_slice()[..used]
    }

    pub fn memory_usage(&self) -> usize {
        self.symbols.memory_usage()
    }
}
