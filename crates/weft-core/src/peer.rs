//! Overlay peers

use std::fmt;
use std::net::SocketAddr;

use crate::identity::{Identity, Mid};

/// A remote node: an identity observed at a network address.
///
/// Peers are values, rebuilt for every decoded packet; the address reflects
/// where the identity was last seen, not a stable home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    identity: Identity,
    address: SocketAddr,
}

impl Peer {
    /// Pair an identity with the address it was observed at.
    pub fn new(identity: Identity, address: SocketAddr) -> Self {
        Self { identity, address }
    }

    /// The peer's identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The peer's key fingerprint.
    pub fn mid(&self) -> Mid {
        self.identity.mid()
    }

    /// The address this peer was observed at.
    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity.mid(), self.address)
    }
}
