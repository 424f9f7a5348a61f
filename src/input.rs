// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Deterministic input buffers
//!
//! Buffers are filled from a seeded `StdRng` so that two runs with the same
//! seed hash, encode and seal exactly the same bytes. The contents carry no
//! meaning beyond being reproducible filler.

use rand::{RngCore, SeedableRng, rngs::StdRng};
use tracing::debug;

/// Create a generator for the given seed
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Allocate a buffer of exactly `size` bytes and fill it from `rng`
pub fn random_buffer(rng: &mut impl RngCore, size: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; size];
    rng.fill_bytes(&mut buffer);
    buffer
}

/// One independent buffer per worker, all drawn from a single seeded stream
pub fn worker_buffers(workers: usize, size: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = seeded_rng(seed);
    let buffers: Vec<Vec<u8>> = (0..workers).map(|_| random_buffer(&mut rng, size)).collect();
    debug!(workers, size, seed, "generated worker buffers");
    buffers
}

/// Fill `count` shards for one worker from a generator reseeded with the
/// worker index
pub fn worker_shards(worker: usize, count: usize, shard_size: usize) -> Vec<Vec<u8>> {
    let mut rng = seeded_rng(worker as u64);
    (0..count)
        .map(|_| random_buffer(&mut rng, shard_size))
        .collect()
}
