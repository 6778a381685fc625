//! Content-addressed storage keys
//!
//! A storage key is the partition key of the distributed value store. Keys
//! are derived, not chosen: a node's content slot is the digest of its
//! fingerprint plus a purpose tag. Digest collisions between unrelated
//! values are store-level ambiguity, not corruption.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::identity::Mid;

/// Length in bytes of a storage key digest.
pub const STORAGE_KEY_LEN: usize = 20;

/// Fixed-length content-addressed store partition key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StorageKey([u8; STORAGE_KEY_LEN]);

impl StorageKey {
    /// Create from raw digest bytes.
    pub fn from_bytes(bytes: [u8; STORAGE_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the key a node publishes content of the given purpose under.
    ///
    /// Computed as `SHA-1(mid ++ purpose)`, so any peer that knows a node's
    /// fingerprint can locate its published content.
    pub fn for_identity(mid: &Mid, purpose: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(mid.as_bytes());
        hasher.update(purpose);
        Self(hasher.finalize().into())
    }

    /// Get the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; STORAGE_KEY_LEN] {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{}", hex::encode(self.0))
    }
}
