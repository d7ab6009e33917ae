//! Persistence of finalized tries
//!
//! A finalized [`DoubleArrayTrie`](crate::fsa::DoubleArrayTrie) can be written
//! as a binary snapshot and loaded back for serving, skipping the build phase.

pub mod snapshot;

pub use snapshot::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
