//! Bounded append-only chunk store
//!
//! The one shared-mutable resource of the overlay: concurrent packet
//! handlers read and append while publishers write. The lock covers only
//! the map access; nothing blocking happens inside it.

use std::collections::HashMap;

use parking_lot::RwLock;

use weft_core::StorageKey;

use crate::chunk::MAX_ENTRY_SIZE;
use crate::error::StoreError;

/// Key-addressed, append-only store of bounded raw entries.
///
/// Entries are immutable once written; republication appends, it never
/// mutates. Callers only ever receive copies. Generation semantics live a
/// layer up in the coordinator; this store knows nothing about versions.
#[derive(Debug)]
pub struct ChunkStore {
    max_entry_size: usize,
    entries: RwLock<HashMap<StorageKey, Vec<Vec<u8>>>>,
}

impl ChunkStore {
    /// Store with the default entry bound of [`MAX_ENTRY_SIZE`] bytes.
    pub fn new() -> Self {
        Self::with_max_entry_size(MAX_ENTRY_SIZE)
    }

    /// Store with a custom entry bound.
    pub fn with_max_entry_size(max_entry_size: usize) -> Self {
        Self {
            max_entry_size,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The configured per-entry size bound in bytes.
    pub fn max_entry_size(&self) -> usize {
        self.max_entry_size
    }

    /// Append one raw entry under `key`.
    pub fn put(&self, key: StorageKey, entry: Vec<u8>) -> Result<(), StoreError> {
        if entry.len() > self.max_entry_size {
            return Err(StoreError::EntryTooLarge {
                len: entry.len(),
                max: self.max_entry_size,
            });
        }
        self.entries.write().entry(key).or_default().push(entry);
        Ok(())
    }

    /// All raw entries under `key`, in insertion order.
    ///
    /// An unknown key yields an empty list, not an error.
    pub fn get(&self, key: &StorageKey) -> Vec<Vec<u8>> {
        self.entries.read().get(key).cloned().unwrap_or_default()
    }

    /// Number of raw entries under `key`.
    pub fn entry_count(&self, key: &StorageKey) -> usize {
        self.entries.read().get(key).map_or(0, Vec::len)
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tag: u8) -> StorageKey {
        StorageKey::from_bytes([tag; 20])
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let store = ChunkStore::new();
        store.put(key(1), vec![1]).unwrap();
        store.put(key(1), vec![2]).unwrap();
        store.put(key(1), vec![3]).unwrap();
        assert_eq!(store.get(&key(1)), vec![vec![1], vec![2], vec![3]]);
        assert_eq!(store.entry_count(&key(1)), 3);
    }

    #[test]
    fn unknown_key_is_empty_not_an_error() {
        let store = ChunkStore::new();
        assert!(store.get(&key(9)).is_empty());
        assert_eq!(store.entry_count(&key(9)), 0);
    }

    #[test]
    fn entries_at_the_bound_are_accepted() {
        let store = ChunkStore::new();
        store.put(key(1), vec![0; MAX_ENTRY_SIZE]).unwrap();
        assert_eq!(store.entry_count(&key(1)), 1);
    }

    #[test]
    fn oversized_entries_are_rejected() {
        let store = ChunkStore::new();
        let err = store.put(key(1), vec![0; MAX_ENTRY_SIZE + 1]).unwrap_err();
        assert_eq!(
            err,
            StoreError::EntryTooLarge {
                len: MAX_ENTRY_SIZE + 1,
                max: MAX_ENTRY_SIZE,
            }
        );
        // A rejected put leaves no partial state behind.
        assert_eq!(store.entry_count(&key(1)), 0);
    }

    #[test]
    fn custom_bound_is_enforced() {
        let store = ChunkStore::with_max_entry_size(50);
        store.put(key(1), vec![0; 50]).unwrap();
        assert!(store.put(key(1), vec![0; 51]).is_err());
    }

    #[test]
    fn keys_are_isolated() {
        let store = ChunkStore::new();
        store.put(key(1), vec![1]).unwrap();
        store.put(key(2), vec![2]).unwrap();
        assert_eq!(store.get(&key(1)), vec![vec![1]]);
        assert_eq!(store.get(&key(2)), vec![vec![2]]);
    }

    #[test]
    fn callers_get_copies_not_views() {
        let store = ChunkStore::new();
        store.put(key(1), vec![7]).unwrap();
        let mut copy = store.get(&key(1));
        copy[0][0] = 0;
        assert_eq!(store.get(&key(1)), vec![vec![7]]);
    }
}
