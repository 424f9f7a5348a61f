//! Configuration for the benchmark sweeps
//!
//! This module describes which payload sizes, concurrency levels, shard
//! splits and cipher suites a sweep covers, plus the seed and keys used to
//! build inputs. Presets cover the full sweep and a quick smoke profile.

use crate::workloads::{CipherSuite, DigestWidth, ShardSplit, highwayhash};
use crate::{Concurrency, DEFAULT_SEED, MIB};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable selecting a preset (`full` or `smoke`)
pub const PROFILE_ENV: &str = "SAORSA_BENCH_PROFILE";

/// Environment variable pointing at a JSON configuration file
pub const CONFIG_ENV: &str = "SAORSA_BENCH_CONFIG";

/// Main configuration for a benchmark sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seed for generated input buffers
    pub seed: u64,
    /// Concurrency levels every case is run at
    pub concurrency: Vec<Concurrency>,
    /// HighwayHash settings
    pub hash: HashConfig,
    /// Reed-Solomon settings
    pub erasure: ErasureConfig,
    /// AES-GCM settings
    pub aead: AeadConfig,
    /// Criterion sampling settings
    pub sampling: SamplingConfig,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Small payloads at every concurrency level, for smoke runs and tests
    pub fn smoke() -> Self {
        Self {
            seed: DEFAULT_SEED,
            concurrency: vec![Concurrency::Serial, Concurrency::AllCores],
            hash: HashConfig {
                sizes: vec![64 * 1024, 256 * 1024],
                ..HashConfig::default()
            },
            erasure: ErasureConfig {
                shard_sizes: vec![16 * 1024],
                splits: vec![ShardSplit::new(4, 2), ShardSplit::new(8, 8)],
            },
            aead: AeadConfig {
                sizes: vec![64 * 1024, 256 * 1024],
                ..AeadConfig::default()
            },
            sampling: SamplingConfig {
                sample_size: 10,
                measurement_time: Duration::from_secs(1),
                warm_up_time: Duration::from_millis(200),
            },
        }
    }

    /// Resolve a preset by name
    pub fn from_profile(name: &str) -> anyhow::Result<Self> {
        match name {
            "full" | "default" => Ok(Self::default()),
            "smoke" => Ok(Self::smoke()),
            other => anyhow::bail!("Unknown benchmark profile: {}", other),
        }
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration from the environment: a config file if one is named,
    /// otherwise the named profile, otherwise the full sweep
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_json_file(path);
        }
        match std::env::var(PROFILE_ENV) {
            Ok(profile) => Self::from_profile(&profile),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.concurrency.is_empty() {
            anyhow::bail!("At least one concurrency level is required");
        }
        if self.concurrency.contains(&Concurrency::Fixed(0)) {
            anyhow::bail!("Fixed concurrency must be greater than 0");
        }
        if self.hash.sizes.contains(&0) || self.aead.sizes.contains(&0) {
            anyhow::bail!("Payload sizes must be greater than 0");
        }
        highwayhash::parse_key(&self.hash.key_hex).context("Invalid HighwayHash key")?;
        if let Some(key_hex) = &self.aead.key_hex {
            let key = hex::decode(key_hex).context("AES-GCM key is not valid hex")?;
            for suite in &self.aead.suites {
                if key.len() != suite.key_len() {
                    anyhow::bail!(
                        "AES-GCM key is {} bytes, {} needs {}",
                        key.len(),
                        suite.label(),
                        suite.key_len()
                    );
                }
            }
        }
        for split in &self.erasure.splits {
            for &shard_size in &self.erasure.shard_sizes {
                split
                    .validate(shard_size)
                    .with_context(|| format!("Invalid erasure case {}", split))?;
            }
        }
        if self.sampling.sample_size < 10 {
            anyhow::bail!("Criterion needs a sample size of at least 10");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            concurrency: vec![Concurrency::Serial, Concurrency::AllCores],
            hash: HashConfig::default(),
            erasure: ErasureConfig::default(),
            aead: AeadConfig::default(),
            sampling: SamplingConfig::default(),
        }
    }
}

/// HighwayHash configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashConfig {
    /// Payload sizes in bytes
    pub sizes: Vec<usize>,
    /// 32-byte key, hex encoded
    pub key_hex: String,
    /// Digest widths to measure
    pub widths: Vec<DigestWidth>,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            sizes: vec![MIB, 5 * MIB, 10 * MIB, 25 * MIB, 50 * MIB, 100 * MIB],
            key_hex: highwayhash::DEFAULT_KEY_HEX.to_string(),
            widths: vec![DigestWidth::Bits256],
        }
    }
}

/// Reed-Solomon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErasureConfig {
    /// Size of each shard in bytes
    pub shard_sizes: Vec<usize>,
    /// Data/parity splits to measure
    pub splits: Vec<ShardSplit>,
}

impl Default for ErasureConfig {
    fn default() -> Self {
        Self {
            shard_sizes: vec![MIB, 5 * MIB, 10 * MIB, 25 * MIB],
            splits: vec![ShardSplit::new(8, 8), ShardSplit::new(12, 4)],
        }
    }
}

/// AES-GCM configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeadConfig {
    /// Payload sizes in bytes
    pub sizes: Vec<usize>,
    /// Cipher suites to measure
    pub suites: Vec<CipherSuite>,
    /// Optional hex key; all-zero keys are used when absent
    pub key_hex: Option<String>,
}

impl Default for AeadConfig {
    fn default() -> Self {
        Self {
            sizes: vec![MIB, 5 * MIB, 10 * MIB, 25 * MIB, 50 * MIB],
            suites: vec![CipherSuite::Aes128Gcm, CipherSuite::Aes256Gcm],
            key_hex: None,
        }
    }
}

/// Criterion sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Samples per benchmark
    pub sample_size: usize,
    /// Target measurement time per benchmark
    pub measurement_time: Duration,
    /// Warm-up time per benchmark
    pub warm_up_time: Duration,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_size: 10,
            measurement_time: Duration::from_secs(5),
            warm_up_time: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::new();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.hash.sizes.len(), 6);
        assert_eq!(config.erasure.splits.len(), 2);
    }

    #[test]
    fn test_config_smoke() {
        let config = Config::smoke();
        assert!(config.validate().is_ok());
        assert!(config.hash.sizes.iter().all(|&s| s < MIB));
    }

    #[test]
    fn test_from_profile() {
        assert_eq!(Config::from_profile("full").unwrap(), Config::default());
        assert_eq!(Config::from_profile("smoke").unwrap(), Config::smoke());
        assert!(Config::from_profile("huge").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.concurrency.clear();
        assert!(config.validate().is_err());

        config.concurrency = vec![Concurrency::Fixed(0)];
        assert!(config.validate().is_err());

        config.concurrency = vec![Concurrency::Serial];
        config.erasure.shard_sizes = vec![1023];
        assert!(config.validate().is_err());

        config.erasure.shard_sizes = vec![1024];
        config.hash.key_hex = "0011".into();
        assert!(config.validate().is_err());

        config.hash.key_hex = highwayhash::DEFAULT_KEY_HEX.into();
        config.aead.key_hex = Some("00".repeat(16));
        // 16 bytes fits AES-128 but not AES-256
        assert!(config.validate().is_err());

        config.aead.suites = vec![CipherSuite::Aes128Gcm];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_file() {
        let config = Config::smoke();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bench.json");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(Config::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn test_json_file_missing() {
        assert!(Config::from_json_file("/nonexistent/bench.json").is_err());
    }
}
