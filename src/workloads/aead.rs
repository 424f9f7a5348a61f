// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! AES-GCM sealing throughput workload
//!
//! Each worker owns an [`AeadSlot`]: a cipher context built once, its
//! plaintext, a fixed nonce and associated data, and an output buffer that
//! is overwritten on every seal. Nonces are never rotated; nothing here is
//! ever decrypted outside of tests.

use crate::{BenchError, Result, Workload, input, parallel::run_parallel, size_label};
use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::{AeadCore, AeadInPlace, Key, KeyInit, KeySizeUser, Nonce};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Length of the associated data sealed alongside every payload
pub const ASSOCIATED_DATA_LEN: usize = 13;

/// Supported AES-GCM variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherSuite {
    Aes128Gcm,
    Aes256Gcm,
}

impl CipherSuite {
    pub fn label(&self) -> &'static str {
        match self {
            CipherSuite::Aes128Gcm => "aes128",
            CipherSuite::Aes256Gcm => "aes256",
        }
    }

    /// Key length in bytes
    pub fn key_len(&self) -> usize {
        match self {
            CipherSuite::Aes128Gcm => <Aes128Gcm as KeySizeUser>::key_size(),
            CipherSuite::Aes256Gcm => <Aes256Gcm as KeySizeUser>::key_size(),
        }
    }
}

/// Per-worker cipher context and buffers
pub struct AeadSlot<C: AeadCore> {
    cipher: C,
    plaintext: Vec<u8>,
    nonce: Nonce<C>,
    associated_data: [u8; ASSOCIATED_DATA_LEN],
    out: Vec<u8>,
}

impl<C: AeadInPlace> AeadSlot<C> {
    /// Seal the plaintext into the output buffer, reusing its allocation
    pub fn seal(&mut self) -> Result<()> {
        self.out.clear();
        self.out.extend_from_slice(&self.plaintext);
        self.cipher
            .encrypt_in_place(&self.nonce, &self.associated_data, &mut self.out)
            .map_err(|_| BenchError::Seal)
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    pub fn plaintext(&self) -> &[u8] {
        &self.plaintext
    }

    /// Ciphertext followed by the tag, as of the last seal
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    pub fn output_capacity(&self) -> usize {
        self.out.capacity()
    }

    pub fn nonce(&self) -> &Nonce<C> {
        &self.nonce
    }

    pub fn associated_data(&self) -> &[u8] {
        &self.associated_data
    }
}

/// Parallel AES-GCM seal benchmark
pub struct AeadWorkload<C: AeadCore> {
    slots: Vec<AeadSlot<C>>,
    size: usize,
}

impl<C> AeadWorkload<C>
where
    C: AeadInPlace + KeyInit + Send,
{
    /// Build one slot per worker with an all-zero key
    pub fn new(size: usize, workers: usize, seed: u64) -> Result<Self> {
        let key = Key::<C>::default();
        Self::with_key(size, workers, seed, key.as_slice())
    }

    /// Build one slot per worker with the given raw key
    pub fn with_key(size: usize, workers: usize, seed: u64, key: &[u8]) -> Result<Self> {
        if workers == 0 {
            return Err(BenchError::NoWorkers);
        }

        let tag_len = <C as AeadCore>::TagSize::USIZE;
        let slots = input::worker_buffers(workers, size, seed)
            .into_iter()
            .map(|plaintext| {
                let cipher = C::new_from_slice(key).map_err(|_| BenchError::InvalidKey {
                    expected: <C as KeySizeUser>::key_size(),
                    actual: key.len(),
                })?;
                Ok(AeadSlot {
                    cipher,
                    plaintext,
                    nonce: Nonce::<C>::default(),
                    associated_data: [0u8; ASSOCIATED_DATA_LEN],
                    out: Vec::with_capacity(size + tag_len),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(size = %size_label(size), workers, "aes-gcm workload ready");

        Ok(Self { slots, size })
    }

    pub fn slots(&self) -> &[AeadSlot<C>] {
        &self.slots
    }
}

impl<C> Workload for AeadWorkload<C>
where
    C: AeadInPlace + KeyInit + Send,
{
    fn name(&self) -> &'static str {
        "aesgcm"
    }

    fn bytes_per_iter(&self) -> u64 {
        self.size as u64
    }

    fn concurrency(&self) -> usize {
        self.slots.len()
    }

    fn run(&mut self, iters: u64) -> Result<Duration> {
        run_parallel(&mut self.slots, iters, |_, slot| slot.seal())
    }
}

/// Build an AES-GCM workload for `suite`, optionally with an explicit key
pub fn create_aead_workload(
    suite: CipherSuite,
    size: usize,
    workers: usize,
    seed: u64,
    key: Option<&[u8]>,
) -> Result<Box<dyn Workload>> {
    fn build<C: AeadInPlace + KeyInit + Send + 'static>(
        size: usize,
        workers: usize,
        seed: u64,
        key: Option<&[u8]>,
    ) -> Result<Box<dyn Workload>> {
        let workload = match key {
            Some(key) => AeadWorkload::<C>::with_key(size, workers, seed, key)?,
            None => AeadWorkload::<C>::new(size, workers, seed)?,
        };
        Ok(Box::new(workload))
    }

    match suite {
        CipherSuite::Aes128Gcm => build::<Aes128Gcm>(size, workers, seed, key),
        CipherSuite::Aes256Gcm => build::<Aes256Gcm>(size, workers, seed, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SEED;
    use aes_gcm::aead::Aead;
    use aes_gcm::aead::Payload;

    #[test]
    fn test_key_lengths() {
        assert_eq!(CipherSuite::Aes128Gcm.key_len(), 16);
        assert_eq!(CipherSuite::Aes256Gcm.key_len(), 32);
    }

    #[test]
    fn test_seal_output_size_and_reuse() {
        let mut workload = AeadWorkload::<Aes128Gcm>::new(4096, 1, DEFAULT_SEED).unwrap();
        let reserved = workload.slots()[0].output().as_ptr();
        workload.run(1).unwrap();
        let first = workload.slots()[0].output().as_ptr();
        assert_eq!(first, reserved);

        workload.run(5).unwrap();

        let slot = &workload.slots()[0];
        assert_eq!(slot.output().as_ptr(), first);
        assert_eq!(slot.output().len(), 4096 + 16);
        assert!(slot.output_capacity() >= 4096 + 16);
        assert_ne!(&slot.output()[..4096], slot.plaintext());
    }

    #[test]
    fn test_sealed_output_opens() {
        let mut workload = AeadWorkload::<Aes256Gcm>::new(1000, 2, DEFAULT_SEED).unwrap();
        workload.run(10).unwrap();

        for slot in workload.slots() {
            if slot.output().is_empty() {
                continue;
            }
            let opened = slot
                .cipher()
                .decrypt(
                    slot.nonce(),
                    Payload {
                        msg: slot.output(),
                        aad: slot.associated_data(),
                    },
                )
                .unwrap();
            assert_eq!(opened, slot.plaintext());
        }
    }

    #[test]
    fn test_wrong_key_length_is_setup_error() {
        let result = AeadWorkload::<Aes128Gcm>::with_key(64, 1, DEFAULT_SEED, &[0u8; 7]);
        assert!(matches!(
            result,
            Err(BenchError::InvalidKey { expected: 16, actual: 7 })
        ));
    }

    #[test]
    fn test_create_by_suite() {
        for suite in [CipherSuite::Aes128Gcm, CipherSuite::Aes256Gcm] {
            let mut workload = create_aead_workload(suite, 256, 2, DEFAULT_SEED, None).unwrap();
            assert_eq!(workload.name(), "aesgcm");
            assert_eq!(workload.concurrency(), 2);
            workload.smoke().unwrap();
        }
    }
}
