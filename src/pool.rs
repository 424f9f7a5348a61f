// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Work distribution for parallel workers
//!
//! Two strategies hand private resources to workers:
//! - [`RoundRobin`] picks a slot index from an atomic counter, for read-only
//!   buffers shared by all workers
//! - [`WorkPool`] is a bounded queue acting as an object pool; a worker takes
//!   an item, mutates it, and puts it back

use crate::{BenchError, Result};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic round-robin slot selector
#[derive(Debug)]
pub struct RoundRobin {
    counter: AtomicUsize,
    slots: usize,
}

impl RoundRobin {
    pub fn new(slots: usize) -> Self {
        Self {
            counter: AtomicUsize::new(0),
            slots,
        }
    }

    /// Next slot index in `0..slots`
    pub fn next_slot(&self) -> usize {
        self.counter.fetch_add(1, Ordering::Relaxed) % self.slots
    }

    pub fn slots(&self) -> usize {
        self.slots
    }
}

/// Bounded object pool over an MPMC channel
///
/// The pool owns both ends of the channel, so `acquire` only fails if the
/// pool was built empty and never refilled.
#[derive(Debug)]
pub struct WorkPool<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    capacity: usize,
}

impl<T: Send> WorkPool<T> {
    /// Build a pool holding exactly `items`
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            return Err(BenchError::NoWorkers);
        }

        let capacity = items.len();
        let (tx, rx) = bounded(capacity);
        for item in items {
            tx.send(item).map_err(|_| BenchError::PoolClosed)?;
        }

        Ok(Self { tx, rx, capacity })
    }

    /// Take an item, blocking until one is returned
    pub fn acquire(&self) -> Result<T> {
        self.rx.recv().map_err(|_| BenchError::PoolClosed)
    }

    /// Return an item taken with [`WorkPool::acquire`]
    pub fn release(&self, item: T) -> Result<()> {
        self.tx.send(item).map_err(|_| BenchError::PoolClosed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items currently waiting in the pool
    pub fn available(&self) -> usize {
        self.rx.len()
    }

    /// Drain every item currently in the pool
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_cycles() {
        let rr = RoundRobin::new(3);
        assert_eq!(rr.slots(), 3);
        let picks: Vec<usize> = (0..7).map(|_| rr.next_slot()).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_pool_returns_items() {
        let pool = WorkPool::new(vec![1u32, 2, 3]).unwrap();
        assert_eq!(pool.capacity(), 3);

        let item = pool.acquire().unwrap();
        assert_eq!(pool.available(), 2);
        pool.release(item).unwrap();
        assert_eq!(pool.available(), 3);

        let mut items = pool.drain();
        items.sort();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(
            WorkPool::<u8>::new(Vec::new()),
            Err(BenchError::NoWorkers)
        ));
    }
}
