// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Timed parallel loop
//!
//! Each worker thread owns one element of the state slice and claims
//! iterations from a shared atomic budget until the budget is spent. The
//! clock starts only after every worker has been spawned and released from
//! the start barrier.

use crate::{BenchError, Result};
use parking_lot::Mutex;
use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Run `op` exactly `iters` times spread over one thread per element of
/// `workers`, returning the wall-clock time of the timed region
///
/// `op` receives the worker index and that worker's private state. The first
/// error stops all workers and is returned instead of a duration.
pub fn run_parallel<S, F>(workers: &mut [S], iters: u64, op: F) -> Result<Duration>
where
    S: Send,
    F: Fn(usize, &mut S) -> Result<()> + Sync,
{
    if workers.is_empty() {
        return Err(BenchError::NoWorkers);
    }

    let claimed = AtomicU64::new(0);
    let stop = AtomicBool::new(false);
    let failure: Mutex<Option<BenchError>> = Mutex::new(None);
    let start_line = Barrier::new(workers.len() + 1);

    let started = thread::scope(|scope| {
        for (id, state) in workers.iter_mut().enumerate() {
            let (claimed, stop, failure, start_line, op) =
                (&claimed, &stop, &failure, &start_line, &op);

            scope.spawn(move || {
                start_line.wait();
                while !stop.load(Ordering::Relaxed)
                    && claimed.fetch_add(1, Ordering::Relaxed) < iters
                {
                    if let Err(err) = op(id, state) {
                        stop.store(true, Ordering::Relaxed);
                        failure.lock().get_or_insert(err);
                        break;
                    }
                }
            });
        }

        start_line.wait();
        Instant::now()
    });
    let elapsed = started.elapsed();

    match failure.into_inner() {
        Some(err) => Err(err),
        None => Ok(elapsed),
    }
}
