//! Transaction id generation
//!
//! A generator is seeded once and then hands out consecutive ids. It is an
//! explicit value passed to whoever needs ids; there is no process-wide
//! counter.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Source of transaction ids
pub trait TransactionIdSource: Send + Sync {
    /// Next id. Consecutive calls on one source never repeat until the
    /// counter wraps.
    fn next_id(&self) -> u64;
}

/// Counter seeded from randomness
#[derive(Debug)]
pub struct TxIdGenerator {
    counter: AtomicU64,
}

impl TxIdGenerator {
    /// Seed from the thread rng. The seed is kept below 2^32 so a generator
    /// has plenty of room before it wraps.
    pub fn new() -> Self {
        let seed = rand::thread_rng().gen::<u32>() as u64;
        debug!(seed, "seeded transaction id generator");
        Self::with_seed(seed)
    }

    /// Start counting from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            counter: AtomicU64::new(seed),
        }
    }

    /// Id the next call will return, without consuming it
    pub fn peek(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for TxIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionIdSource for TxIdGenerator {
    fn next_id(&self) -> u64 {
        // fetch_add wraps at u64::MAX
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_consecutive_ids() {
        let ids = TxIdGenerator::with_seed(41);
        assert_eq!(ids.next_id(), 41);
        assert_eq!(ids.next_id(), 42);
        assert_eq!(ids.peek(), 43);
    }

    #[test]
    fn test_random_seed_leaves_headroom() {
        let ids = TxIdGenerator::new();
        assert!(ids.peek() <= u32::MAX as u64);
        let first = ids.next_id();
        assert_eq!(ids.next_id(), first + 1);
    }

    #[test]
    fn test_wraps_at_max() {
        let ids = TxIdGenerator::with_seed(u64::MAX);
        assert_eq!(ids.next_id(), u64::MAX);
        assert_eq!(ids.next_id(), 0);
    }

    #[test]
    fn test_shared_across_threads() {
        let ids = Arc::new(TxIdGenerator::with_seed(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(ids.peek(), 1000);
    }

    #[test]
    fn test_usable_as_trait_object() {
        let source: Box<dyn TransactionIdSource> = Box::new(TxIdGenerator::with_seed(7));
        assert_eq!(source.next_id(), 7);
    }
}
