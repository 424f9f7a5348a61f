// Copyright 2024 Saorsa Labs
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Stand-alone throughput sweep
//!
//! Runs every case of a profile for a fixed number of iterations and prints
//! MiB/s per case, without criterion's statistics.
//!
//! ```bash
//! sweep --profile smoke
//! sweep --filter reedsolomon/8x8 --iterations 20 --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use saorsa_throughput::{Config, sweep};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "sweep")]
#[command(about = "Parallel throughput sweep for HighwayHash, Reed-Solomon and AES-GCM", long_about = None)]
struct Cli {
    /// Preset to run (full or smoke)
    #[arg(short, long, default_value = "full")]
    profile: String,

    /// JSON configuration file, overrides --profile
    #[arg(short, long)]
    config: Option<String>,

    /// Iterations per case
    #[arg(short, long, default_value = "10")]
    iterations: u64,

    /// Only run cases whose name contains this substring
    #[arg(short, long)]
    filter: Option<String>,

    /// Print measurements as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::from_profile(&cli.profile)?,
    };
    config.validate()?;

    let mut cases = sweep::plan(&config);
    if let Some(filter) = &cli.filter {
        cases = sweep::filter_cases(cases, filter);
    }
    info!(cases = cases.len(), iterations = cli.iterations, "starting sweep");

    let mut measurements = Vec::with_capacity(cases.len());
    for case in &cases {
        let measurement = sweep::measure(case, &config, cli.iterations)
            .with_context(|| format!("Benchmark {} failed", case))?;
        if !cli.json {
            println!("{}", measurement);
        }
        measurements.push(measurement);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&measurements)?);
    }

    Ok(())
}
