//! Double-array trie engine
//!
//! The engine is layered leaf-first: [`AutoGrowVec`](crate::containers::AutoGrowVec)
//! arrays back the node table (`base`/`check`) and the tail store, and
//! [`DoubleArrayTrie`] orchestrates insertion, collision resolution and lookup
//! over them.

pub mod double_array_trie;
mod node_table;
pub mod symbol;
mod tail;
pub mod traits;

// Re-export core types
pub use double_array_trie::{DoubleArrayTrie, DoubleArrayTrieBuilder};
pub use node_table::ROOT_ID;
pub use symbol::Symbol;
pub use traits::{StatisticsProvider, Trie, TrieStats};

pub(crate) use node_table::NodeTable;
pub(crate) use tail::TailStore;
