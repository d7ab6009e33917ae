//! Binary snapshots of finalized tries
//!
//! Layout (bincode): magic, format version, configuration, key count, tail
//! cursor, then the `base`, `check` and `tail` arrays. Node arrays are stored
//! without their trailing unused slots; the tail is stored up to its cursor,
//! abandoned fragments included.

use crate::config::{Config, TrieConfig};
use crate::error::{DatrieError, Result};
use crate::fsa::{DoubleArrayTrie, NodeTable, Symbol, TailStore};
use crate::NodeId;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Tag identifying a trie snapshot ("DATR")
pub const SNAPSHOT_MAGIC: u32 = 0x4441_5452;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a, S> {
    magic: u32,
    version: u32,
    config: &'a TrieConfig,
    num_keys: u64,
    tail_cursor: NodeId,
    base: &'a [NodeId],
    check: &'a [NodeId],
    tail: &'a [S],
}

#[derive(Deserialize)]
struct Snapshot<S> {
    magic: u32,
    version: u32,
    config: TrieConfig,
    num_keys: u64,
    tail_cursor: NodeId,
    base: Vec<NodeId>,
    check: Vec<NodeId>,
    tail: Vec<S>,
}

impl<S> DoubleArrayTrie<S>
where
    S: Symbol + Serialize + DeserializeOwned,
{
    fn snapshot(&self) -> Result<SnapshotRef<'_, S>> {
        if !self.is_finalized() {
            return Err(DatrieError::invalid_state(
                "only a finalized trie can be persisted",
            ));
        }
        Ok(SnapshotRef {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            config: self.config(),
            num_keys: self.len() as u64,
            tail_cursor: self.tail().cursor(),
            base: self.nodes().base_slice(),
            check: self.nodes().check_slice(),
            tail: self.tail().as_slice(),
        })
    }

    fn restore(snapshot: Snapshot<S>) -> Result<Self> {
        if snapshot.magic != SNAPSHOT_MAGIC {
            return Err(DatrieError::invalid_data(format!(
                "bad snapshot magic {:#010x}",
                snapshot.magic
            )));
        }
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DatrieError::invalid_data(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if snapshot.tail_cursor < 1 || snapshot.tail.len() > snapshot.tail_cursor as usize {
            return Err(DatrieError::invalid_data(format!(
                "tail of {} symbols overruns cursor {}",
                snapshot.tail.len(),
                snapshot.tail_cursor
            )));
        }
        snapshot.config.validate().map_err(|e| {
            DatrieError::invalid_data(format!("snapshot carries an invalid config: {}", e))
        })?;
        let num_keys = usize::try_from(snapshot.num_keys)
            .map_err(|_| DatrieError::invalid_data("key count out of range"))?;

        let trie = DoubleArrayTrie::from_parts(
            NodeTable::from_parts(snapshot.base, snapshot.check),
            TailStore::from_parts(snapshot.tail, snapshot.tail_cursor),
            num_keys,
            snapshot.config,
        );
        trie.check_integrity().map_err(|e| {
            DatrieError::invalid_data(format!("snapshot failed verification: {}", e))
        })?;
        Ok(trie)
    }

    /// Encode a finalized trie
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let bytes = bincode::serialize(&self.snapshot()?)?;
        log::debug!("encoded trie snapshot: {} keys, {} bytes", self.len(), bytes.len());
        Ok(bytes)
    }

    /// Decode a trie produced by [`to_bytes`](Self::to_bytes); it is finalized
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot<S> = bincode::deserialize(bytes)?;
        Self::restore(snapshot)
    }

    /// Stream a finalized trie to `writer`
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        bincode::serialize_into(writer, &self.snapshot()?)?;
        Ok(())
    }

    /// Read a trie written by [`write_to`](Self::write_to)
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let snapshot: Snapshot<S> = bincode::deserialize_from(reader)?;
        Self::restore(snapshot)
    }

    /// Save a finalized trie to `path`
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.snapshot()?;
        let mut writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
        log::debug!("saved trie snapshot with {} keys to {}", self.len(), path.display());
        Ok(())
    }

    /// Load a trie saved with [`save_to_file`](Self::save_to_file)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let trie = Self::read_from(BufReader::new(File::open(path)?))?;
        log::debug!("loaded trie snapshot with {} keys from {}", trie.len(), path.display());
        Ok(trie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> DoubleArrayTrie<u8> {
        let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
        for key in [&b"bachelor"[..], b"jar", b"badge", b"baby"] {
            trie.insert(key);
        }
        trie.finalize();
        trie
    }

    #[test]
    fn test_bytes_round_trip() {
        let trie = sample();
        let bytes = trie.to_bytes().unwrap();
        let restored: DoubleArrayTrie<u8> = DoubleArrayTrie::from_bytes(&bytes).unwrap();

        assert!(restored.is_finalized());
        assert_eq!(restored.len(), 4);
        for key in [&b"bachelor"[..], b"jar", b"badge", b"baby"] {
            assert_eq!(restored.find(key), trie.find(key));
        }
        assert_eq!(restored.find(b"bad"), None);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("words.dat");

        let trie = sample();
        trie.save_to_file(&path).unwrap();
        let restored: DoubleArrayTrie<u8> = DoubleArrayTrie::load_from_file(&path).unwrap();
        assert_eq!(restored.find(b"jar"), trie.find(b"jar"));
    }

    #[test]
    fn test_building_trie_cannot_be_saved() {
        let mut trie: DoubleArrayTrie<u8> = DoubleArrayTrie::new();
        trie.insert(b"abc");
        assert!(matches!(
            trie.to_bytes(),
            Err(DatrieError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_empty_trie_round_trip() {
        let mut trie: DoubleArrayTrie<u16> = DoubleArrayTrie::new();
        trie.finalize();
        let restored: DoubleArrayTrie<u16> =
            DoubleArrayTrie::from_bytes(&trie.to_bytes().unwrap()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.find(&[1, 2]), None);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let trie = sample();
        let mut bytes = trie.to_bytes().unwrap();
        bytes[0] ^= 0xFF;
        assert!(matches!(
            DoubleArrayTrie::<u8>::from_bytes(&bytes),
            Err(DatrieError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_truncated_snapshot_rejected() {
        let trie = sample();
        let bytes = trie.to_bytes().unwrap();
        let err = DoubleArrayTrie::<u8>::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
        assert_eq!(err.category(), "serialization");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let trie = sample();
        let config = TrieConfig {
            initial_node_capacity: 0,
            ..trie.config().clone()
        };
        let tampered = SnapshotRef {
            config: &config,
            ..trie.snapshot().unwrap()
        };
        let bytes = bincode::serialize(&tampered).unwrap();
        let err = DoubleArrayTrie::<u8>::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DatrieError::InvalidData { .. }));
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn test_tampered_key_count_rejected() {
        let trie = sample();
        let snapshot = trie.snapshot().unwrap();
        let tampered = SnapshotRef {
            num_keys: 99,
            ..snapshot
        };
        let bytes = bincode::serialize(&tampered).unwrap();
        assert!(matches!(
            DoubleArrayTrie::<u8>::from_bytes(&bytes),
            Err(DatrieError::InvalidData { .. })
        ));
    }
}
