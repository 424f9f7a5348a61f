// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Saorsa Throughput - Parallel primitive benchmarks
//!
//! This crate measures the throughput of three external primitives under
//! contention: HighwayHash, Reed-Solomon erasure coding and AES-GCM sealing.
//! The primitives themselves come from their crates; this crate only prepares
//! the inputs and drives them from a timed parallel loop.
//!
//! ## Features
//! - Deterministic, seeded input buffers, one per worker
//! - Per-worker cipher/encoder state built outside the timed region
//! - Round-robin and object-pool work distribution
//! - Size x concurrency sweeps for criterion and a stand-alone runner

use std::fmt;
use thiserror::Error;

pub mod config;
pub mod input;
pub mod parallel;
pub mod pool;
pub mod report;
pub mod sweep;
pub mod traits;
pub mod workloads;

pub use config::Config;
pub use sweep::{BenchCase, WorkloadKind};
pub use traits::Workload;

/// One mebibyte, the unit every payload size in the sweeps is expressed in
pub const MIB: usize = 1024 * 1024;

/// Seed used for every generated input buffer unless configured otherwise
pub const DEFAULT_SEED: u64 = 0xabad_c0ca_c01a;

/// Errors that can occur while setting up or running a benchmark
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    #[error("Key is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Reed-Solomon error: {0}")]
    ReedSolomon(#[from] reed_solomon_simd::Error),

    #[error("AEAD seal failed")]
    Seal,

    #[error("Benchmark needs at least one worker")]
    NoWorkers,

    #[error("Work pool closed")]
    PoolClosed,
}

pub type Result<T> = std::result::Result<T, BenchError>;

/// Number of concurrent workers a benchmark case runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concurrency {
    /// A single worker, the serial baseline
    Serial,
    /// One worker per available CPU
    AllCores,
    /// An explicit worker count
    Fixed(usize),
}

impl Concurrency {
    /// Resolve to a worker count on this machine
    pub fn workers(&self) -> usize {
        match self {
            Concurrency::Serial => 1,
            Concurrency::AllCores => num_cpus::get().max(1),
            Concurrency::Fixed(n) => *n,
        }
    }

    /// Short label used in benchmark ids
    pub fn label(&self) -> String {
        match self {
            Concurrency::Serial => "serial".to_string(),
            Concurrency::AllCores => "all".to_string(),
            Concurrency::Fixed(n) => format!("x{}", n),
        }
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} workers)", self.label(), self.workers())
    }
}

/// Human label for a payload size: `1M`, `64K` or `100B`
pub fn size_label(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}M", bytes / MIB)
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{}K", bytes / 1024)
    } else {
        format!("{}B", bytes)
    }
}
