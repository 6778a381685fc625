//! Peer identity types and the identity-parsing capability
//!
//! Overlay packets carry raw public-key bytes from untrusted peers. An
//! [`IdentityCodec`] is the only way those bytes become an [`Identity`], so
//! every identity in the system has passed key validation exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::error::IdentityError;

/// Length in bytes of a member identifier fingerprint.
pub const MID_LEN: usize = 20;

/// SHA-1 fingerprint of a peer's public key.
///
/// Mids address peers compactly and seed content-derived storage keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Mid([u8; MID_LEN]);

impl Mid {
    /// Compute the fingerprint of raw public-key bytes.
    pub fn of(public_key: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(public_key);
        Self(hasher.finalize().into())
    }

    /// Create from raw fingerprint bytes.
    pub fn from_bytes(bytes: [u8; MID_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8; MID_LEN] {
        &self.0
    }
}

impl fmt::Display for Mid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mid:{}", hex::encode(self.0))
    }
}

/// A peer's cryptographic identity.
///
/// Immutable once constructed. Obtained through an [`IdentityCodec`], never
/// built directly from wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    public_key: Vec<u8>,
    mid: Mid,
}

impl Identity {
    /// Build an identity from validated public-key bytes.
    ///
    /// Codecs call this after the key material has been checked; the
    /// fingerprint is derived here so key and mid can never disagree.
    pub fn new(public_key: Vec<u8>) -> Self {
        let mid = Mid::of(&public_key);
        Self { public_key, mid }
    }

    /// The raw public-key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The key fingerprint.
    pub fn mid(&self) -> Mid {
        self.mid
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mid)
    }
}

/// Capability for recovering an [`Identity`] from untrusted key bytes.
pub trait IdentityCodec: Send + Sync {
    /// Parse raw public-key bytes into an identity.
    fn parse_public_key(&self, bytes: &[u8]) -> Result<Identity, IdentityError>;
}

/// Identity codec for 32-byte Ed25519 verifying keys.
///
/// Small-order points decompress fine but make no usable peer identity, so
/// weak keys are rejected alongside undecodable ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Codec;

impl IdentityCodec for Ed25519Codec {
    fn parse_public_key(&self, bytes: &[u8]) -> Result<Identity, IdentityError> {
        let raw: [u8; 32] = bytes.try_into().map_err(|_| {
            IdentityError::InvalidKey(format!("expected 32 key bytes, got {}", bytes.len()))
        })?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&raw)
            .map_err(|err| IdentityError::InvalidKey(err.to_string()))?;
        if key.is_weak() {
            return Err(IdentityError::InvalidKey(
                "small-order public key".to_string(),
            ));
        }
        Ok(Identity::new(bytes.to_vec()))
    }
}
