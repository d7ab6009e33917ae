//! # datrie: Double-Array Trie with Tail Compaction
//!
//! A compact, array-based index mapping variable-length symbol sequences to
//! stable integer identifiers. The trie is encoded in two parallel integer
//! arrays (`base` and `check`) plus an append-only suffix buffer, so memory
//! overhead stays close to minimal.
//!
//! ## Key Features
//!
//! - **Build then query**: keys are inserted during a build phase, which is
//!   closed once with `finalize`; lookups work in either phase
//! - **Tail compaction**: unbranching key suffixes live in a flat buffer
//!   instead of single-child node chains
//! - **Generic symbols**: `u8`, `u16` and `char` keys out of the box
//! - **Snapshots**: finalized tries persist to bytes or files
//!
//! ## Quick Start
//!
//! ```rust
//! use datrie::{DoubleArrayTrie, StatisticsProvider};
//!
//! let mut trie: DoubleArrayTrie = DoubleArrayTrie::new();
//! trie.insert(b"bachelor");
//! trie.insert(b"jar");
//! trie.insert(b"badge");
//! trie.insert(b"baby");
//! trie.finalize();
//!
//! let id = trie.find(b"badge").unwrap();
//! assert_ne!(Some(id), trie.find(b"baby"));
//! assert_eq!(trie.find(b"badges"), None);
//!
//! let bytes = trie.to_bytes().unwrap();
//! let restored: DoubleArrayTrie = DoubleArrayTrie::from_bytes(&bytes).unwrap();
//! assert_eq!(restored.find(b"badge"), Some(id));
//! assert_eq!(restored.stats().num_keys, 4);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod containers;
pub mod error;
pub mod fsa;
pub mod io;

// Re-export core types
pub use config::{Config, TrieConfig};
pub use containers::AutoGrowVec;
pub use error::{DatrieError, Result};
pub use fsa::{
    DoubleArrayTrie, DoubleArrayTrieBuilder, StatisticsProvider, Symbol, Trie, TrieStats,
};

/// Node identifier indexing both `base` and `check`; valid slots are >= 1
pub type NodeId = i32;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version; safe to call any number of times
pub fn init() {
    log::debug!("Initializing datrie v{}", VERSION);
}
