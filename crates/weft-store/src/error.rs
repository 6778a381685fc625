//! Store error types

/// Errors surfaced by the chunk store and publish coordinator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An entry exceeded the store bound. The coordinator slices values to
    /// fit by construction, so hitting this means a caller bug.
    #[error("entry of {len} bytes exceeds the {max}-byte store bound")]
    EntryTooLarge {
        /// Size of the rejected entry.
        len: usize,
        /// The store's configured bound.
        max: usize,
    },
}
