//! Generation number comparison policy
//!
//! The version field wraps modulo 2^16. How (or whether) to break ties near
//! the wrap point is deployment policy, so the comparison is pluggable
//! rather than baked into the coordinator.

use std::cmp::Ordering;

/// Strategy for ordering 16-bit generation numbers.
pub trait VersionOrder: Send + Sync {
    /// Compare two generation numbers.
    fn cmp(&self, a: u16, b: u16) -> Ordering;
}

/// Plain unsigned comparison; no wraparound handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericOrder;

impl VersionOrder for NumericOrder {
    fn cmp(&self, a: u16, b: u16) -> Ordering {
        a.cmp(&b)
    }
}
