//! # Weft Overlay - Overlay Base Layer
//!
//! Turns raw inbound datagrams into `(peer, payload)` pairs for a concrete
//! overlay implementation, keeps the node's Lamport clock moving, and tracks
//! every background task so teardown is deterministic.
//!
//! The overlay never initiates network I/O itself: inbound bytes arrive via
//! [`PacketDispatcher::on_packet`] (or the spawned inbound loop), outbound
//! bytes leave through the externally supplied [`Transport`] capability.
//! Hostile or corrupted packets are dropped and logged, never surfaced; an
//! overlay must keep serving well-behaved peers regardless of what arrives.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Overlay configuration
pub mod config;

/// Packet ingestion and overlay dispatch
pub mod dispatcher;

/// Outbound transport capability
pub mod endpoint;

/// Drop reasons for inbound packets
pub mod error;

/// Background task lifecycle tracking
pub mod tasks;

pub use config::OverlayConfig;
pub use dispatcher::{InboundPacket, Overlay, PacketDispatcher};
pub use endpoint::{MemoryTransport, Transport, TransportError};
pub use error::PacketError;
pub use tasks::{TaskId, TaskRegistry};
