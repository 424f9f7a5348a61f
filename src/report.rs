//! Throughput measurements produced by the stand-alone sweep runner

use crate::MIB;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result of running one case for a fixed number of iterations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub group: String,
    pub id: String,
    pub workers: usize,
    pub bytes_per_iter: u64,
    pub iterations: u64,
    pub elapsed: Duration,
}

impl Measurement {
    /// Total bytes processed
    pub fn total_bytes(&self) -> u128 {
        self.bytes_per_iter as u128 * self.iterations as u128
    }

    /// Throughput in MiB/s; zero when nothing was timed
    pub fn mib_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.total_bytes() as f64 / MIB as f64 / secs
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{:<24} {:>4} workers {:>10.2} MiB/s ({} iters in {:.3}s)",
            self.group,
            self.id,
            self.workers,
            self.mib_per_sec(),
            self.iterations,
            self.elapsed.as_secs_f64()
        )
    }
}
