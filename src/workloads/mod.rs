// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workload implementations, one per measured primitive

use crate::{Result, Workload, config::Config, sweep::WorkloadKind};

pub mod aead;
pub mod highwayhash;
pub mod reed_solomon;

pub use aead::{AeadSlot, AeadWorkload, CipherSuite};
pub use highwayhash::{DigestWidth, HighwayWorkload};
pub use reed_solomon::{ReedSolomonWorkload, ShardSet, ShardSplit};

/// Set up the workload for one case of a sweep
///
/// `size` is the payload size, or the per-shard size for erasure coding.
pub fn create_workload(
    kind: WorkloadKind,
    size: usize,
    workers: usize,
    config: &Config,
) -> Result<Box<dyn Workload>> {
    match kind {
        WorkloadKind::Highway { width } => {
            let key = highwayhash::parse_key(&config.hash.key_hex)?;
            Ok(Box::new(HighwayWorkload::new(
                size,
                workers,
                key,
                width,
                config.seed,
            )?))
        }
        WorkloadKind::ReedSolomon { split } => {
            Ok(Box::new(ReedSolomonWorkload::new(split, size, workers)?))
        }
        WorkloadKind::Aead { suite } => {
            let key = config
                .aead
                .key_hex
                .as_deref()
                .map(hex::decode)
                .transpose()?;
            aead::create_aead_workload(suite, size, workers, config.seed, key.as_deref())
        }
    }
}
