//! Packet ingestion and overlay dispatch
//!
//! The dispatcher is the overlay base: it recovers the sender's identity
//! from each inbound datagram, hands the decoded `(peer, payload)` pair to
//! the concrete [`Overlay`], and owns the node's Lamport clock and task
//! registry.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use weft_core::{IdentityCodec, LamportClock, Peer};

use crate::config::OverlayConfig;
use crate::error::PacketError;
use crate::tasks::{TaskId, TaskRegistry};

/// One raw inbound datagram as delivered by a transport.
pub type InboundPacket = (SocketAddr, Vec<u8>);

/// Overlay-specific packet handling.
///
/// A concrete overlay supplies the two decisions the base layer cannot make:
/// where the identity bytes end, and what a payload means.
pub trait Overlay: Send + Sync {
    /// Split an inbound datagram into `(key_bytes, payload)`.
    ///
    /// Return `None` when the datagram is too short or otherwise malformed;
    /// the dispatcher drops it.
    fn split_key_data<'a>(&self, data: &'a [u8]) -> Option<(&'a [u8], &'a [u8])>;

    /// Handle a payload received from a peer.
    fn on_data(&self, peer: Peer, payload: &[u8]);
}

/// Decodes inbound packets and drives an [`Overlay`] implementation.
pub struct PacketDispatcher<C> {
    codec: C,
    clock: LamportClock,
    tasks: TaskRegistry,
    overlay: Arc<dyn Overlay>,
}

impl<C: IdentityCodec> PacketDispatcher<C> {
    /// Create a dispatcher for one overlay with a fresh clock.
    pub fn new(codec: C, overlay: Arc<dyn Overlay>) -> Self {
        Self {
            codec,
            clock: LamportClock::new(),
            tasks: TaskRegistry::new(),
            overlay,
        }
    }

    /// Feed one raw datagram into the overlay.
    ///
    /// Malformed packets and unparseable identities are dropped here: the
    /// transport guarantees nothing, so a bad packet must look exactly like
    /// a lost one.
    pub fn on_packet(&self, source: SocketAddr, data: &[u8]) {
        match self.decode(source, data) {
            Ok((peer, payload)) => self.overlay.on_data(peer, payload),
            Err(err) => debug!(%source, %err, "dropping inbound packet"),
        }
    }

    fn decode<'a>(
        &self,
        source: SocketAddr,
        data: &'a [u8],
    ) -> Result<(Peer, &'a [u8]), PacketError> {
        let (key_bytes, payload) = self
            .overlay
            .split_key_data(data)
            .ok_or(PacketError::Malformed { len: data.len() })?;
        let identity = self.codec.parse_public_key(key_bytes)?;
        Ok((Peer::new(identity, source), payload))
    }

    /// Current causal timestamp, without advancing it.
    pub fn global_time(&self) -> u64 {
        self.clock.current()
    }

    /// Claim a timestamp for an outbound clock-bearing message.
    pub fn claim_global_time(&self) -> u64 {
        self.clock.claim()
    }

    /// Fold a remote timestamp into the local clock.
    pub fn update_global_time(&self, remote: u64) {
        self.clock.observe(remote);
    }

    /// Registry for overlay background work.
    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Cancel all background work. Idempotent; the only sanctioned teardown.
    pub fn unload(&self) {
        self.tasks.shutdown();
    }
}

impl<C: IdentityCodec + 'static> PacketDispatcher<C> {
    /// Spawn the inbound loop draining transport packets into `on_packet`.
    ///
    /// Returns the channel end the transport feeds and the loop's task
    /// handle. The loop ends when the sender is dropped or on `unload`.
    pub fn spawn_inbound(
        self: &Arc<Self>,
        config: &OverlayConfig,
    ) -> (mpsc::Sender<InboundPacket>, TaskId) {
        let (tx, mut rx) = mpsc::channel::<InboundPacket>(config.inbound_capacity);
        let dispatcher = Arc::clone(self);
        let id = self.tasks.spawn(async move {
            while let Some((source, data)) = rx.recv().await {
                dispatcher.on_packet(source, &data);
            }
        });
        (tx, id)
    }
}
