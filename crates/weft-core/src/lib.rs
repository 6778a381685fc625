//! # Weft Core - Foundation Types
//!
//! Foundation crate for the weft overlay network: peer identities and their
//! fingerprints, the Lamport clock that orders overlay events, and the
//! content-addressed keys the distributed value store partitions on.
//!
//! This crate depends on nothing else in the workspace. Cryptographic key
//! material is only ever consumed through the [`IdentityCodec`] capability;
//! the bundled [`Ed25519Codec`] covers the common case without closing the
//! seam.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Lamport logical clock
pub mod clock;

/// Shared foundation error types
pub mod error;

/// Peer identities and the identity-parsing capability
pub mod identity;

/// Content-addressed storage keys
pub mod key;

/// Overlay peers
pub mod peer;

pub use clock::LamportClock;
pub use error::IdentityError;
pub use identity::{Ed25519Codec, Identity, IdentityCodec, Mid, MID_LEN};
pub use key::{StorageKey, STORAGE_KEY_LEN};
pub use peer::Peer;
