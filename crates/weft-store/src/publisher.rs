//! Record slot republication
//!
//! A node publishes its newest application record (a signed ledger block,
//! say) under a key derived from its own fingerprint. Record notifications
//! fire on events that are not always content changes, so every publication
//! goes through the changed-value guard; redundant notifications must not
//! grow the store.

use std::sync::Arc;

use tracing::debug;

use weft_core::{Mid, StorageKey};

use crate::coordinator::PublishCoordinator;
use crate::error::StoreError;
use crate::version::{NumericOrder, VersionOrder};

/// Store key purpose tag for a node's latest record.
pub const RECORD_KEY_SUFFIX: &[u8] = b"_BLOCK";

/// Publishes one node's newest record blob, skipping unchanged content.
///
/// Records are opaque bytes here; serialization belongs to the application
/// codec.
pub struct RecordPublisher<V = NumericOrder> {
    coordinator: Arc<PublishCoordinator<V>>,
    key: StorageKey,
}

impl<V: VersionOrder> RecordPublisher<V> {
    /// Publisher for the record slot of the node identified by `mid`.
    pub fn new(coordinator: Arc<PublishCoordinator<V>>, mid: &Mid) -> Self {
        Self {
            coordinator,
            key: StorageKey::for_identity(mid, RECORD_KEY_SUFFIX),
        }
    }

    /// The derived record key.
    pub fn key(&self) -> StorageKey {
        self.key
    }

    /// Publish a serialized record if it differs from the stored one.
    ///
    /// Generation numbers advance by wrapping increment; after 2^16
    /// publications the counter wraps, a documented limitation of the
    /// 16-bit header field.
    pub fn on_record(&self, record: &[u8]) -> Result<Option<u16>, StoreError> {
        let written = self.coordinator.publish_if_changed(self.key, record, |current| {
            current.map_or(0, |version| version.wrapping_add(1))
        })?;
        match written {
            Some(version) => debug!(key = %self.key, version, "published record generation"),
            None => debug!(key = %self.key, "record unchanged, skipping republish"),
        }
        Ok(written)
    }

    /// Latest stored record, reconstructed.
    pub fn latest(&self) -> Option<Vec<u8>> {
        self.coordinator.fetch_latest(&self.key)
    }
}
