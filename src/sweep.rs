// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parameter sweep driver
//!
//! Expands a [`Config`] into the full matrix of benchmark cases. Both the
//! criterion bench target and the `sweep` binary iterate the same plan, so
//! their case names line up.

use crate::workloads::{self, CipherSuite, DigestWidth, ShardSplit};
use crate::{Concurrency, Result, Workload, config::Config, report::Measurement, size_label};
use std::fmt;
use tracing::info;

/// Which primitive a case measures, with its primitive-specific parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    Highway { width: DigestWidth },
    ReedSolomon { split: ShardSplit },
    Aead { suite: CipherSuite },
}

impl WorkloadKind {
    /// Benchmark group the kind reports under
    pub fn group(&self) -> &'static str {
        match self {
            WorkloadKind::Highway { .. } => "highwayhash",
            WorkloadKind::ReedSolomon { .. } => "reedsolomon",
            WorkloadKind::Aead { .. } => "aesgcm",
        }
    }

    pub fn label(&self) -> String {
        match self {
            WorkloadKind::Highway { width } => format!("hash{}", width.label()),
            WorkloadKind::ReedSolomon { split } => split.to_string(),
            WorkloadKind::Aead { suite } => suite.label().to_string(),
        }
    }
}

/// One point of the sweep: a primitive at a payload size and concurrency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BenchCase {
    pub kind: WorkloadKind,
    /// Payload size, or per-shard size for erasure coding
    pub size: usize,
    pub concurrency: Concurrency,
}

impl BenchCase {
    pub fn group(&self) -> &'static str {
        self.kind.group()
    }

    /// Function part of the benchmark id, e.g. `8x8/serial`
    pub fn function_id(&self) -> String {
        format!("{}/{}", self.kind.label(), self.concurrency.label())
    }

    /// Parameter part of the benchmark id, e.g. `25M`
    pub fn parameter(&self) -> String {
        size_label(self.size)
    }

    /// Full id within the group
    pub fn id(&self) -> String {
        format!("{}/{}", self.function_id(), self.parameter())
    }

    pub fn workers(&self) -> usize {
        self.concurrency.workers()
    }

    /// Bytes one iteration processes
    pub fn bytes_per_iter(&self) -> u64 {
        match self.kind {
            WorkloadKind::ReedSolomon { split } => (self.size * split.data) as u64,
            _ => self.size as u64,
        }
    }

    /// Run the untimed setup for this case
    pub fn build(&self, config: &Config) -> Result<Box<dyn Workload>> {
        workloads::create_workload(self.kind, self.size, self.workers(), config)
    }
}

impl fmt::Display for BenchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group(), self.id())
    }
}

/// Every case the configuration describes, grouped by primitive
pub fn plan(config: &Config) -> Vec<BenchCase> {
    let mut cases = Vec::new();

    let mut push = |kind: WorkloadKind, sizes: &[usize]| {
        for &concurrency in &config.concurrency {
            for &size in sizes {
                cases.push(BenchCase {
                    kind,
                    size,
                    concurrency,
                });
            }
        }
    };

    for &width in &config.hash.widths {
        push(WorkloadKind::Highway { width }, &config.hash.sizes);
    }
    for &split in &config.erasure.splits {
        push(WorkloadKind::ReedSolomon { split }, &config.erasure.shard_sizes);
    }
    for &suite in &config.aead.suites {
        push(WorkloadKind::Aead { suite }, &config.aead.sizes);
    }

    cases
}

/// Set up `case` and time `iterations` runs of it outside criterion
pub fn measure(case: &BenchCase, config: &Config, iterations: u64) -> Result<Measurement> {
    let mut workload = case.build(config)?;
    let elapsed = workload.run(iterations)?;
    info!(case = %case, iterations, ?elapsed, "case measured");

    Ok(Measurement {
        group: case.group().to_string(),
        id: case.id(),
        workers: workload.concurrency(),
        bytes_per_iter: workload.bytes_per_iter(),
        iterations,
        elapsed,
    })
}

/// Cases whose full name contains `filter`
pub fn filter_cases(cases: Vec<BenchCase>, filter: &str) -> Vec<BenchCase> {
    cases
        .into_iter()
        .filter(|case| case.to_string().contains(filter))
        .collect()
}
