// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Core trait for benchmark workloads

use crate::Result;
use std::time::Duration;

/// A fully prepared benchmark case
///
/// Construction performs all setup (buffers, keys, encoders). `run` is the
/// timed region and must not allocate per iteration.
pub trait Workload: Send {
    /// Name of the primitive being measured
    fn name(&self) -> &'static str;

    /// Bytes processed by one iteration, used for throughput
    fn bytes_per_iter(&self) -> u64;

    /// Number of parallel workers
    fn concurrency(&self) -> usize;

    /// Run `iters` iterations across all workers and return elapsed time
    fn run(&mut self, iters: u64) -> Result<Duration>;

    /// Single iteration, for smoke testing a configuration
    fn smoke(&mut self) -> Result<()> {
        self.run(1).map(|_| ())
    }
}
