//! Chunking, versioning and reconstruction
//!
//! One publish call writes one generation: every slice of the value, in
//! order, tagged with the same version. The store's append order is the
//! authoritative intra-generation ordering; no sequence numbers are
//! persisted, which is safe because writes to one key are serialized by the
//! per-key lock held across the whole multi-chunk write. The same lock
//! covers reads, so `fetch_latest` can never observe a half-written
//! generation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use weft_core::StorageKey;

use crate::chunk::{decode_chunk, encode_chunk, CHUNK_HEADER_SIZE};
use crate::error::StoreError;
use crate::store::ChunkStore;
use crate::version::{NumericOrder, VersionOrder};

/// Splits oversized values into versioned chunk generations and rebuilds
/// the newest generation on read.
pub struct PublishCoordinator<V = NumericOrder> {
    store: Arc<ChunkStore>,
    order: V,
    locks: Mutex<HashMap<StorageKey, Arc<Mutex<()>>>>,
}

impl PublishCoordinator<NumericOrder> {
    /// Coordinator with plain numeric version comparison.
    pub fn new(store: Arc<ChunkStore>) -> Self {
        Self::with_order(store, NumericOrder)
    }
}

impl<V: VersionOrder> PublishCoordinator<V> {
    /// Coordinator with a custom version comparison policy.
    pub fn with_order(store: Arc<ChunkStore>, order: V) -> Self {
        Self {
            store,
            order,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying raw store.
    pub fn store(&self) -> &Arc<ChunkStore> {
        &self.store
    }

    fn key_lock(&self, key: &StorageKey) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(*key).or_default())
    }

    fn max_payload(&self) -> usize {
        self.store.max_entry_size().saturating_sub(CHUNK_HEADER_SIZE)
    }

    /// Publish `value` under `key` as generation `version`.
    ///
    /// Returns the number of chunks written. Publishing two different
    /// values at the same version is a caller error: the chunks interleave
    /// by insertion order, but generations are never silently merged across
    /// versions.
    pub fn publish(
        &self,
        key: StorageKey,
        value: &[u8],
        version: u16,
    ) -> Result<usize, StoreError> {
        let lock = self.key_lock(&key);
        let _guard = lock.lock();
        self.publish_locked(key, value, version)
    }

    fn publish_locked(
        &self,
        key: StorageKey,
        value: &[u8],
        version: u16,
    ) -> Result<usize, StoreError> {
        if value.is_empty() {
            // An empty value still gets one header-only chunk so the
            // generation exists and reconstructs to an empty byte string.
            self.store.put(key, encode_chunk(version, &[]))?;
            return Ok(1);
        }
        let max_payload = self.max_payload();
        if max_payload == 0 {
            // A bound at or below the header leaves no room for payload
            // bytes, so the smallest possible entry already exceeds it.
            return Err(StoreError::EntryTooLarge {
                len: CHUNK_HEADER_SIZE + 1,
                max: self.store.max_entry_size(),
            });
        }
        let mut written = 0;
        for slice in value.chunks(max_payload) {
            self.store.put(key, encode_chunk(version, slice))?;
            written += 1;
        }
        Ok(written)
    }

    /// Reconstruct the newest generation under `key`.
    ///
    /// Entries whose header does not decode are skipped with a warning;
    /// one corrupt or foreign entry must not sink the whole reconstruction.
    /// Returns `None` when nothing is stored under the key.
    pub fn fetch_latest(&self, key: &StorageKey) -> Option<Vec<u8>> {
        let lock = self.key_lock(key);
        let _guard = lock.lock();
        self.latest_generation_locked(key).map(|(_, value)| value)
    }

    fn latest_generation_locked(&self, key: &StorageKey) -> Option<(u16, Vec<u8>)> {
        let mut generations: HashMap<u16, Vec<u8>> = HashMap::new();
        for (index, entry) in self.store.get(key).iter().enumerate() {
            let Some(view) = decode_chunk(entry) else {
                warn!(%key, index, "skipping corrupt chunk during reconstruction");
                continue;
            };
            generations
                .entry(view.version)
                .or_default()
                .extend_from_slice(view.payload);
        }
        let latest = generations
            .keys()
            .copied()
            .reduce(|best, candidate| match self.order.cmp(candidate, best) {
                Ordering::Greater => candidate,
                _ => best,
            })?;
        let value = generations.remove(&latest)?;
        Some((latest, value))
    }

    /// Publish only when `value` differs from the latest stored generation.
    ///
    /// The whole read-compare-write runs under the per-key lock, so two
    /// racing callers cannot both decide to publish. `next_version` maps
    /// the current latest version (if any) to the version to write;
    /// 16-bit wraparound is the caller's documented limitation.
    ///
    /// Returns the version written, or `None` when the stored value was
    /// already byte-identical.
    pub fn publish_if_changed<F>(
        &self,
        key: StorageKey,
        value: &[u8],
        next_version: F,
    ) -> Result<Option<u16>, StoreError>
    where
        F: FnOnce(Option<u16>) -> u16,
    {
        let lock = self.key_lock(&key);
        let _guard = lock.lock();
        let current = self.latest_generation_locked(&key);
        if let Some((_, existing)) = &current {
            if existing.as_slice() == value {
                return Ok(None);
            }
        }
        let version = next_version(current.map(|(version, _)| version));
        self.publish_locked(key, value, version)?;
        Ok(Some(version))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::chunk::MAX_CHUNK_PAYLOAD;

    use super::*;

    fn coordinator() -> PublishCoordinator {
        PublishCoordinator::new(Arc::new(ChunkStore::new()))
    }

    fn key(tag: u8) -> StorageKey {
        StorageKey::from_bytes([tag; 20])
    }

    #[test]
    fn small_value_round_trips_in_one_chunk() {
        let coordinator = coordinator();
        let written = coordinator.publish(key(1), b"tiny", 7).unwrap();
        assert_eq!(written, 1);
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(b"tiny".to_vec()));
    }

    #[test]
    fn empty_value_round_trips() {
        let coordinator = coordinator();
        coordinator.publish(key(1), &[], 7).unwrap();
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(Vec::new()));
    }

    #[test]
    fn oversized_value_is_sliced_and_reassembled() {
        let coordinator = coordinator();
        let value: Vec<u8> = (0..u8::MAX).cycle().take(MAX_CHUNK_PAYLOAD * 2 + 5).collect();
        let written = coordinator.publish(key(1), &value, 7).unwrap();
        assert_eq!(written, 3);
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(value));
    }

    #[test]
    fn bound_at_the_header_rejects_nonempty_values() {
        let store = Arc::new(ChunkStore::with_max_entry_size(CHUNK_HEADER_SIZE));
        let coordinator = PublishCoordinator::new(store);
        let err = coordinator.publish(key(1), b"x", 1).unwrap_err();
        assert_eq!(
            err,
            StoreError::EntryTooLarge {
                len: CHUNK_HEADER_SIZE + 1,
                max: CHUNK_HEADER_SIZE,
            }
        );
        // A header-only empty generation still fits exactly.
        coordinator.publish(key(1), &[], 1).unwrap();
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(Vec::new()));
    }

    #[test]
    fn unknown_key_is_absent() {
        assert_eq!(coordinator().fetch_latest(&key(9)), None);
    }

    #[test]
    fn latest_version_wins_regardless_of_publish_order() {
        let coordinator = coordinator();
        coordinator.publish(key(1), b"newer", 200).unwrap();
        coordinator.publish(key(1), b"older", 100).unwrap();
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(b"newer".to_vec()));
    }

    #[test]
    fn corrupt_entries_are_skipped_not_fatal() {
        let store = Arc::new(ChunkStore::new());
        let coordinator = PublishCoordinator::new(Arc::clone(&store));
        coordinator.publish(key(1), b"good value", 5).unwrap();
        // A foreign entry shorter than the chunk header.
        store.put(key(1), vec![0x01]).unwrap();
        assert_eq!(
            coordinator.fetch_latest(&key(1)),
            Some(b"good value".to_vec())
        );
    }

    #[test]
    fn publish_if_changed_skips_identical_value() {
        let coordinator = coordinator();
        let first = coordinator
            .publish_if_changed(key(1), b"value", |v| v.map_or(0, |v| v + 1))
            .unwrap();
        assert_eq!(first, Some(0));
        let count = coordinator.store().entry_count(&key(1));

        let second = coordinator
            .publish_if_changed(key(1), b"value", |v| v.map_or(0, |v| v + 1))
            .unwrap();
        assert_eq!(second, None);
        assert_eq!(coordinator.store().entry_count(&key(1)), count);
    }

    #[test]
    fn publish_if_changed_bumps_version_for_new_value() {
        let coordinator = coordinator();
        let next = |v: Option<u16>| v.map_or(0, |v| v.wrapping_add(1));
        assert_eq!(
            coordinator.publish_if_changed(key(1), b"one", next).unwrap(),
            Some(0)
        );
        assert_eq!(
            coordinator.publish_if_changed(key(1), b"two", next).unwrap(),
            Some(1)
        );
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(b"two".to_vec()));
    }

    #[test]
    fn custom_version_order_controls_selection() {
        struct ReverseOrder;
        impl VersionOrder for ReverseOrder {
            fn cmp(&self, a: u16, b: u16) -> Ordering {
                b.cmp(&a)
            }
        }
        let coordinator =
            PublishCoordinator::with_order(Arc::new(ChunkStore::new()), ReverseOrder);
        coordinator.publish(key(1), b"low", 1).unwrap();
        coordinator.publish(key(1), b"high", 2).unwrap();
        assert_eq!(coordinator.fetch_latest(&key(1)), Some(b"low".to_vec()));
    }

    proptest! {
        #[test]
        fn any_value_round_trips(
            value in proptest::collection::vec(any::<u8>(), 0..2048),
            version in any::<u16>(),
        ) {
            let coordinator = coordinator();
            coordinator.publish(key(1), &value, version).unwrap();
            prop_assert_eq!(coordinator.fetch_latest(&key(1)), Some(value));
        }
    }
}
