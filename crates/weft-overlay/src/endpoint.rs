//! Outbound transport capability
//!
//! The overlay core never opens sockets. Whatever moves bytes between nodes
//! (UDP, a relay, a simulator) implements [`Transport`] and is handed in
//! from outside. [`MemoryTransport`] is the in-process implementation used
//! by tests and the simulator.

use async_trait::async_trait;
use parking_lot::Mutex;

use weft_core::{Mid, Peer};

/// Errors surfaced by transport implementations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer could not be reached.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// The underlying channel failed while sending.
    #[error("send failed: {0}")]
    Send(String),
}

/// Outbound delivery capability supplied by the surrounding system.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver raw bytes to a peer. Delivery is best-effort.
    async fn send(&self, peer: &Peer, bytes: &[u8]) -> Result<(), TransportError>;
}

/// In-process transport that records every send.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: Mutex<Vec<(Mid, Vec<u8>)>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order, keyed by recipient fingerprint.
    pub fn sent(&self) -> Vec<(Mid, Vec<u8>)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, peer: &Peer, bytes: &[u8]) -> Result<(), TransportError> {
        self.sent.lock().push((peer.mid(), bytes.to_vec()));
        Ok(())
    }
}
