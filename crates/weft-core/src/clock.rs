//! Lamport logical clock
//!
//! One clock per node instance. Multiple overlays in one process (tests, the
//! simulator) each own their own clock; there is deliberately no process-wide
//! counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-node Lamport counter.
///
/// `claim` and `observe` are linearizable with respect to each other: inbound
/// packet handlers fold remote timestamps in while outbound sends claim new
/// ones concurrently, and no interleaving can move the counter backwards.
#[derive(Debug, Default)]
pub struct LamportClock {
    counter: AtomicU64,
}

impl LamportClock {
    /// Create a clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock seeded with a previously held counter value.
    pub fn starting_at(value: u64) -> Self {
        Self {
            counter: AtomicU64::new(value),
        }
    }

    /// Read the counter without advancing it.
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Advance the counter by one and return the claimed value.
    ///
    /// Called before any outbound clock-bearing message is built.
    pub fn claim(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Raise the counter to `remote` if it is larger. Never lowers it.
    pub fn observe(&self, remote: u64) {
        self.counter.fetch_max(remote, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn claim_increments_by_one() {
        let clock = LamportClock::new();
        assert_eq!(clock.claim(), 1);
        assert_eq!(clock.claim(), 2);
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn observe_raises_but_never_lowers() {
        let clock = LamportClock::starting_at(10);
        clock.observe(5);
        assert_eq!(clock.current(), 10);
        clock.observe(42);
        assert_eq!(clock.current(), 42);
        clock.observe(42);
        assert_eq!(clock.current(), 42);
    }

    #[test]
    fn claim_after_observe_exceeds_remote() {
        let clock = LamportClock::new();
        clock.observe(100);
        assert_eq!(clock.claim(), 101);
    }

    #[test]
    fn concurrent_claims_are_unique() {
        let clock = Arc::new(LamportClock::new());
        let mut joins = Vec::new();
        for _ in 0..8 {
            let clock = Arc::clone(&clock);
            joins.push(std::thread::spawn(move || {
                (0..1000).map(|_| clock.claim()).collect::<Vec<_>>()
            }));
        }
        let mut all: Vec<u64> = joins
            .into_iter()
            .flat_map(|j| j.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 8000);
        assert_eq!(clock.current(), 8000);
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Claim,
        Observe(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Claim),
            (0u64..10_000).prop_map(Op::Observe),
        ]
    }

    proptest! {
        #[test]
        fn counter_is_monotone(ops in proptest::collection::vec(op_strategy(), 1..64)) {
            let clock = LamportClock::new();
            let mut last = clock.current();
            for op in ops {
                match op {
                    Op::Claim => {
                        let claimed = clock.claim();
                        prop_assert!(claimed > last);
                    }
                    Op::Observe(remote) => {
                        clock.observe(remote);
                        prop_assert!(clock.current() >= remote);
                    }
                }
                let now = clock.current();
                prop_assert!(now >= last);
                last = now;
            }
        }
    }
}
