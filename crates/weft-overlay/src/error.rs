//! Drop reasons for inbound packets
//!
//! These never cross the dispatch boundary: a bad packet is logged and
//! dropped, exactly as if the transport had lost it.

use weft_core::IdentityError;

/// Why an inbound packet was dropped.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// The datagram could not be split into identity bytes and payload.
    #[error("malformed packet ({len} bytes)")]
    Malformed {
        /// Size of the rejected datagram.
        len: usize,
    },

    /// The identity bytes were rejected by the codec.
    #[error(transparent)]
    InvalidKey(#[from] IdentityError),
}
