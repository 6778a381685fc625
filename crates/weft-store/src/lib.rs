//! # Weft Store - Versioned Chunked Value Store
//!
//! Values too large for one network datagram are split into bounded chunks,
//! each tagged with a 16-bit generation number, and stored append-only under
//! a content-derived key. Reads reconstruct the newest complete generation;
//! republishing unchanged content is a no-op.
//!
//! Layering, bottom up:
//!
//! - [`ChunkStore`] — raw key-addressed list store bounding every entry to
//!   its configured maximum size. No versioning, no grouping.
//! - [`PublishCoordinator`] — chunking, generation tagging, reconstruction
//!   and the changed-value publish guard, on top of the raw store.
//! - [`RecordPublisher`] — the application-facing slot: one node's newest
//!   record blob, republished only when it actually changed.
//!
//! Values are opaque bytes throughout; whatever record format the
//! application uses is serialized before it gets here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Chunk header codec and size constants
pub mod chunk;

/// Chunking, versioning and reconstruction
pub mod coordinator;

/// Store error types
pub mod error;

/// Record slot republication
pub mod publisher;

/// Bounded append-only chunk store
pub mod store;

/// Generation number comparison policy
pub mod version;

pub use chunk::{
    decode_chunk, encode_chunk, ChunkView, CHUNK_HEADER_SIZE, MAX_CHUNK_PAYLOAD, MAX_ENTRY_SIZE,
};
pub use coordinator::PublishCoordinator;
pub use error::StoreError;
pub use publisher::{RecordPublisher, RECORD_KEY_SUFFIX};
pub use store::ChunkStore;
pub use version::{NumericOrder, VersionOrder};
