// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HighwayHash throughput workload
//!
//! Every worker hashes one of the pre-generated buffers, chosen round-robin,
//! with a fixed 256-bit key. Digests are discarded.

use crate::{
    BenchError, Result, Workload, input,
    parallel::run_parallel,
    pool::RoundRobin,
};
use highway::{HighwayHash, HighwayHasher, Key};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Duration;
use tracing::debug;

/// Key used when none is configured: bytes 0x00..=0x1f
pub const DEFAULT_KEY_HEX: &str =
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// HighwayHash keys are 256 bits
pub const KEY_LEN: usize = 32;

/// Output width of the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestWidth {
    Bits64,
    Bits128,
    #[default]
    Bits256,
}

impl DigestWidth {
    pub fn label(&self) -> &'static str {
        match self {
            DigestWidth::Bits64 => "64",
            DigestWidth::Bits128 => "128",
            DigestWidth::Bits256 => "256",
        }
    }
}

/// Decode a hex key, rejecting anything that is not exactly 32 bytes
pub fn parse_key(hex_key: &str) -> Result<[u8; KEY_LEN]> {
    let bytes = hex::decode(hex_key)?;
    <[u8; KEY_LEN]>::try_from(bytes.as_slice()).map_err(|_| BenchError::InvalidKey {
        expected: KEY_LEN,
        actual: bytes.len(),
    })
}

fn key_words(key: &[u8; KEY_LEN]) -> [u64; 4] {
    let mut words = [0u64; 4];
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(8)) {
        let mut le = [0u8; 8];
        le.copy_from_slice(chunk);
        *word = u64::from_le_bytes(le);
    }
    words
}

/// Hash `data` at the given width; narrower digests are zero-padded
pub fn digest(data: &[u8], key: &[u8; KEY_LEN], width: DigestWidth) -> [u64; 4] {
    digest_words(data, key_words(key), width)
}

fn digest_words(data: &[u8], words: [u64; 4], width: DigestWidth) -> [u64; 4] {
    let hasher = HighwayHasher::new(Key(words));
    match width {
        DigestWidth::Bits64 => [hasher.hash64(data), 0, 0, 0],
        DigestWidth::Bits128 => {
            let h = hasher.hash128(data);
            [h[0], h[1], 0, 0]
        }
        DigestWidth::Bits256 => hasher.hash256(data),
    }
}

/// Parallel HighwayHash benchmark over per-worker buffers
#[derive(Debug)]
pub struct HighwayWorkload {
    buffers: Vec<Vec<u8>>,
    key: [u8; KEY_LEN],
    words: [u64; 4],
    width: DigestWidth,
    selector: RoundRobin,
    size: usize,
}

impl HighwayWorkload {
    /// Allocate one buffer of `size` bytes per worker, filled from `seed`
    pub fn new(
        size: usize,
        workers: usize,
        key: [u8; KEY_LEN],
        width: DigestWidth,
        seed: u64,
    ) -> Result<Self> {
        if workers == 0 {
            return Err(BenchError::NoWorkers);
        }
        if size == 0 {
            return Err(BenchError::InvalidParameters(
                "hash payload size must be greater than 0".into(),
            ));
        }

        let buffers = input::worker_buffers(workers, size, seed);
        debug!(size, workers, width = width.label(), "highwayhash workload ready");

        Ok(Self {
            buffers,
            key,
            words: key_words(&key),
            width,
            selector: RoundRobin::new(workers),
            size,
        })
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn buffers(&self) -> &[Vec<u8>] {
        &self.buffers
    }

    pub fn width(&self) -> DigestWidth {
        self.width
    }
}

impl Workload for HighwayWorkload {
    fn name(&self) -> &'static str {
        "highwayhash"
    }

    fn bytes_per_iter(&self) -> u64 {
        self.size as u64
    }

    fn concurrency(&self) -> usize {
        self.selector.slots()
    }

    fn run(&mut self, iters: u64) -> Result<Duration> {
        let mut workers = vec![(); self.buffers.len()];
        let (buffers, selector, words, width) =
            (&self.buffers, &self.selector, self.words, self.width);

        run_parallel(&mut workers, iters, |_, _| {
            let data = &buffers[selector.next_slot()];
            black_box(digest_words(data, words, width));
            Ok(())
        })
    }
}
