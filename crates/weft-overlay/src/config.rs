//! Overlay configuration

use serde::{Deserialize, Serialize};

/// Tunables for the packet dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Capacity of the inbound datagram channel.
    pub inbound_capacity: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            inbound_capacity: 256,
        }
    }
}

impl OverlayConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
