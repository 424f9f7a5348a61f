// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Property-based tests for benchmark setup

use aes_gcm::Aes128Gcm;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use saorsa_throughput::{
    DEFAULT_SEED, Workload, input,
    workloads::{
        AeadWorkload, DigestWidth, HighwayWorkload, ReedSolomonWorkload, ShardSet, ShardSplit,
        highwayhash,
    },
};
use std::collections::HashSet;

/// Generate valid data/parity splits
fn shard_split_strategy() -> impl Strategy<Value = ShardSplit> {
    (1usize..=16, 1usize..=8).prop_map(|(data, parity)| ShardSplit::new(data, parity))
}

/// Even shard sizes, as reed-solomon-simd requires
fn shard_size_strategy() -> impl Strategy<Value = usize> {
    (1usize..=512).prop_map(|half| half * 2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn buffers_have_requested_length(
        workers in 1usize..=8,
        size in 0usize..=100_000,
    ) {
        let buffers = input::worker_buffers(workers, size, DEFAULT_SEED);
        prop_assert_eq!(buffers.len(), workers);
        prop_assert!(buffers.iter().all(|b| b.len() == size));
    }

    #[test]
    fn same_seed_same_buffers(
        seed in any::<u64>(),
        size in 1usize..=4096,
    ) {
        let first = input::worker_buffers(2, size, seed);
        let second = input::worker_buffers(2, size, seed);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn shard_sets_have_uniform_shards(
        split in shard_split_strategy(),
        shard_size in shard_size_strategy(),
        worker in 0usize..64,
    ) {
        let set = ShardSet::new(worker, split, shard_size).unwrap();

        prop_assert_eq!(set.shards().len(), split.total());
        prop_assert!(set.shards().iter().all(|s| s.len() == shard_size));
    }

    #[test]
    fn encode_in_place_matches_library(
        split in shard_split_strategy(),
        shard_size in shard_size_strategy(),
    ) {
        let mut set = ShardSet::new(0, split, shard_size).unwrap();
        let data_before = set.data().to_vec();

        set.encode().unwrap();

        // Data shards are inputs only
        prop_assert_eq!(set.data(), data_before.as_slice());
        let expected = reed_solomon_simd::encode(split.data, split.parity, set.data()).unwrap();
        prop_assert_eq!(set.parity(), expected.as_slice());
    }

    #[test]
    fn odd_shard_sizes_rejected(
        split in shard_split_strategy(),
        half in 0usize..512,
    ) {
        let shard_size = half * 2 + 1;
        prop_assert!(ShardSet::new(0, split, shard_size).is_err());
    }
}

#[test]
fn highway_buffers_do_not_alias() {
    let key = highwayhash::parse_key(highwayhash::DEFAULT_KEY_HEX).unwrap();
    let workload = HighwayWorkload::new(4096, 6, key, DigestWidth::Bits256, DEFAULT_SEED).unwrap();

    let addresses: HashSet<*const u8> = workload.buffers().iter().map(|b| b.as_ptr()).collect();
    assert_eq!(addresses.len(), 6);
}

#[test]
fn aead_slots_do_not_alias() {
    let workload = AeadWorkload::<Aes128Gcm>::new(4096, 5, DEFAULT_SEED).unwrap();

    let plaintexts: HashSet<*const u8> = workload
        .slots()
        .iter()
        .map(|slot| slot.plaintext().as_ptr())
        .collect();
    let contexts: HashSet<*const Aes128Gcm> = workload
        .slots()
        .iter()
        .map(|slot| slot.cipher() as *const Aes128Gcm)
        .collect();

    assert_eq!(plaintexts.len(), 5);
    assert_eq!(contexts.len(), 5);
}

#[test]
fn shard_sets_do_not_alias() {
    let split = ShardSplit::new(4, 2);
    let sets = (0..4)
        .map(|worker| ShardSet::new(worker, split, 1024).unwrap())
        .collect::<Vec<_>>();
    let before: HashSet<*const u8> = sets
        .iter()
        .flat_map(|set| set.shards().iter().map(|s| s.as_ptr()))
        .collect();
    assert_eq!(before.len(), 4 * 6);

    let mut workload = ReedSolomonWorkload::from_shard_sets(sets).unwrap();
    assert_eq!(workload.split(), split);
    workload.run(8).unwrap();

    let sets = workload.into_shard_sets();
    assert_eq!(sets.len(), 4);

    // Encoding rewrites parity in place, so no shard moves
    let after: HashSet<*const u8> = sets
        .iter()
        .flat_map(|set| set.shards().iter().map(|s| s.as_ptr()))
        .collect();
    assert_eq!(after, before);
}

#[test]
fn shard_sets_filled_per_worker() {
    let a = ShardSet::new(0, ShardSplit::new(2, 1), 64).unwrap();
    let b = ShardSet::new(1, ShardSplit::new(2, 1), 64).unwrap();
    assert_eq!(a.data(), input::worker_shards(0, 2, 64).as_slice());
    assert_ne!(a.data(), b.data());
}
