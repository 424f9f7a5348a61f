// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reed-Solomon encode throughput workload
//!
//! Each worker set owns a full shard set (data followed by parity) and its
//! own encoder. Sets circulate through a bounded pool: a worker takes one,
//! recomputes the parity in place and hands it back.

use crate::{
    BenchError, Result, Workload, input, parallel::run_parallel, pool::WorkPool, size_label,
};
use reed_solomon_simd::ReedSolomonEncoder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Number of data and parity shards in a shard set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShardSplit {
    /// Number of data shards
    pub data: usize,
    /// Number of parity shards
    pub parity: usize,
}

impl ShardSplit {
    pub fn new(data: usize, parity: usize) -> Self {
        Self { data, parity }
    }

    /// Total shards in a set
    pub fn total(&self) -> usize {
        self.data + self.parity
    }

    /// Check the split against a shard size before touching the encoder
    pub fn validate(&self, shard_size: usize) -> Result<()> {
        if self.data == 0 || self.parity == 0 {
            return Err(BenchError::InvalidParameters(format!(
                "shard split {} needs at least one data and one parity shard",
                self
            )));
        }
        // reed-solomon-simd works on 16-bit symbols
        if shard_size == 0 || shard_size % 2 != 0 {
            return Err(BenchError::InvalidParameters(format!(
                "shard size {} must be non-zero and even",
                shard_size
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ShardSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.data, self.parity)
    }
}

/// Data shards followed by parity shards, plus the encoder that fills them
pub struct ShardSet {
    shards: Vec<Vec<u8>>,
    data_count: usize,
    shard_size: usize,
    encoder: ReedSolomonEncoder,
}

impl ShardSet {
    /// Build the shard set for `worker`, data shards filled from a generator
    /// seeded with the worker index
    pub fn new(worker: usize, split: ShardSplit, shard_size: usize) -> Result<Self> {
        split.validate(shard_size)?;
        let encoder = ReedSolomonEncoder::new(split.data, split.parity, shard_size)?;

        let mut shards = input::worker_shards(worker, split.data, shard_size);
        shards.extend((0..split.parity).map(|_| vec![0u8; shard_size]));

        Ok(Self {
            shards,
            data_count: split.data,
            shard_size,
            encoder,
        })
    }

    /// Recompute the parity shards from the data shards
    ///
    /// The encoder owns its recovery output, so the measured cost includes
    /// copying each recovery shard into its parity buffer.
    pub fn encode(&mut self) -> Result<()> {
        let (data, parity) = self.shards.split_at_mut(self.data_count);

        self.encoder
            .reset(data.len(), parity.len(), self.shard_size)?;
        for shard in data.iter() {
            self.encoder.add_original_shard(shard)?;
        }

        let result = self.encoder.encode()?;
        for (out, recovery) in parity.iter_mut().zip(result.recovery_iter()) {
            out.copy_from_slice(recovery);
        }
        Ok(())
    }

    /// All shards, data first
    pub fn shards(&self) -> &[Vec<u8>] {
        &self.shards
    }

    pub fn data(&self) -> &[Vec<u8>] {
        &self.shards[..self.data_count]
    }

    pub fn parity(&self) -> &[Vec<u8>] {
        &self.shards[self.data_count..]
    }

    pub fn shard_size(&self) -> usize {
        self.shard_size
    }

    pub fn split(&self) -> ShardSplit {
        ShardSplit::new(self.data_count, self.shards.len() - self.data_count)
    }
}

impl fmt::Debug for ShardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardSet")
            .field("data", &self.data_count)
            .field("parity", &(self.shards.len() - self.data_count))
            .field("shard_size", &self.shard_size)
            .finish()
    }
}

/// Parallel Reed-Solomon encode benchmark
#[derive(Debug)]
pub struct ReedSolomonWorkload {
    pool: WorkPool<ShardSet>,
    split: ShardSplit,
    shard_size: usize,
}

impl ReedSolomonWorkload {
    /// Build one shard set per worker and load them into the pool
    pub fn new(split: ShardSplit, shard_size: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(BenchError::NoWorkers);
        }

        let sets = (0..workers)
            .map(|worker| ShardSet::new(worker, split, shard_size))
            .collect::<Result<Vec<_>>>()?;
        Self::from_shard_sets(sets)
    }

    /// Load prepared shard sets into the pool, one per worker
    ///
    /// Every set must share the same split and shard size.
    pub fn from_shard_sets(sets: Vec<ShardSet>) -> Result<Self> {
        let first = sets.first().ok_or(BenchError::NoWorkers)?;
        let split = first.split();
        let shard_size = first.shard_size();

        if let Some(other) = sets
            .iter()
            .find(|set| set.split() != split || set.shard_size() != shard_size)
        {
            return Err(BenchError::InvalidParameters(format!(
                "shard set {} of {} does not match {} of {}",
                other.split(),
                size_label(other.shard_size()),
                split,
                size_label(shard_size)
            )));
        }

        debug!(
            split = %split,
            shard_size = %size_label(shard_size),
            workers = sets.len(),
            "reed-solomon workload ready"
        );

        Ok(Self {
            pool: WorkPool::new(sets)?,
            split,
            shard_size,
        })
    }

    pub fn split(&self) -> ShardSplit {
        self.split
    }

    /// Take every shard set out of the pool
    pub fn into_shard_sets(self) -> Vec<ShardSet> {
        self.pool.drain()
    }
}

impl Workload for ReedSolomonWorkload {
    fn name(&self) -> &'static str {
        "reedsolomon"
    }

    fn bytes_per_iter(&self) -> u64 {
        (self.shard_size * self.split.data) as u64
    }

    fn concurrency(&self) -> usize {
        self.pool.capacity()
    }

    fn run(&mut self, iters: u64) -> Result<Duration> {
        let mut workers = vec![(); self.pool.capacity()];
        let pool = &self.pool;

        run_parallel(&mut workers, iters, |_, _| {
            let mut set = pool.acquire()?;
            let encoded = set.encode();
            pool.release(set)?;
            encoded
        })
    }
}
