// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `perfcmp run` command - Benchmark every backend and report.
//!
//! Configuration file values are the base; flags and environment variables
//! override them. Setup errors abort; per-backend failures are reported in
//! the results and do not change the exit status.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use perfcmp_bench::{
    BenchmarkHarness, BenchmarkReport, JsonReporter, ResultsTable, RunSettings, Suite,
    SummaryTable,
};
use perfcmp_core::{
    Backend, BenchmarkName, CBackend, CcProfile, Config, ConfigLoader, HostRunnerLocator,
    MemoryProbe, ProgramsDir, RustBackend, X07Backend, X07Mode,
};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the x07-host-runner executable
    #[arg(long, env = "X07_HOST_RUNNER")]
    pub x07_host_runner: Option<PathBuf>,

    /// Extracted X07 toolchain directory containing x07-host-runner
    #[arg(long, env = "X07_TOOLCHAIN")]
    pub x07_toolchain: Option<PathBuf>,

    /// Directory holding the x07/, c/, rust/ program trees
    #[arg(long)]
    pub programs_dir: Option<PathBuf>,

    /// Input size in KB (default: 100)
    #[arg(long)]
    pub size: Option<u32>,

    /// Number of measured iterations (default: 5)
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Warmup iterations (default: 2)
    #[arg(long)]
    pub warmup: Option<u32>,

    /// Input generator seed (default: 42)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Specific benchmarks to run (default: sum_bytes word_count rle_encode byte_freq fibonacci)
    #[arg(long, num_args = 1..)]
    pub benchmarks: Vec<BenchmarkName>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Run X07 binaries directly (no host runner overhead)
    #[arg(long)]
    pub direct: bool,

    /// Pass through to x07-host-runner --cc-profile (default, size)
    #[arg(long, env = "X07_CC_PROFILE")]
    pub x07_cc_profile: Option<CcProfile>,

    /// Also save the JSON report to a timestamped file in this directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// C compiler
    #[arg(long)]
    pub cc: Option<PathBuf>,

    /// Rust compiler
    #[arg(long)]
    pub rustc: Option<PathBuf>,

    /// Cargo executable for projects with external crates
    #[arg(long)]
    pub cargo: Option<PathBuf>,

    /// Configuration file path (default: perfcmp.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Override configuration values with the ones given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.programs_dir {
            config.programs_dir = dir.clone();
        }
        if let Some(size) = self.size {
            config.run.size_kb = size;
        }
        if let Some(iterations) = self.iterations {
            config.run.iterations = iterations;
        }
        if let Some(warmup) = self.warmup {
            config.run.warmup = warmup;
        }
        if let Some(seed) = self.seed {
            config.run.seed = seed;
        }
        if !self.benchmarks.is_empty() {
            config.run.benchmarks = self.benchmarks.clone();
        }
        if self.direct {
            config.run.mode = X07Mode::Direct;
        }
        if let Some(profile) = self.x07_cc_profile {
            config.toolchain.cc_profile = profile;
        }
        if self.x07_toolchain.is_some() {
            config.toolchain.toolchain_dir = self.x07_toolchain.clone();
            // An explicit runner path would otherwise win over the new toolchain
            config.toolchain.host_runner = None;
        }
        if self.x07_host_runner.is_some() {
            config.toolchain.host_runner = self.x07_host_runner.clone();
        }
        if let Some(cc) = &self.cc {
            config.toolchain.cc = cc.clone();
        }
        if let Some(rustc) = &self.rustc {
            config.toolchain.rustc = rustc.clone();
        }
        if let Some(cargo) = &self.cargo {
            config.toolchain.cargo = cargo.clone();
        }
    }
}

pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut config = ConfigLoader::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid settings")?;

    // The host runner compiles from its own directory, so sources need absolute paths
    let programs_dir = config.programs_dir.canonicalize().with_context(|| {
        format!(
            "Programs directory not found: {}",
            config.programs_dir.display()
        )
    })?;

    let host_runner = HostRunnerLocator::new()
        .explicit(config.toolchain.host_runner.clone())
        .toolchain_dir(config.toolchain.toolchain_dir.clone())
        .fallback_dir(&programs_dir)
        .resolve()?;

    let reporter = args
        .save_dir
        .as_ref()
        .map(JsonReporter::new)
        .transpose()
        .context("Failed to prepare report directory")?;

    let backends: Vec<Box<dyn Backend>> = vec![
        Box::new(X07Backend::new(host_runner, config.x07_settings())),
        Box::new(CBackend::new(&config.toolchain.cc).optimize(config.toolchain.optimize)),
        Box::new(
            RustBackend::new(&config.toolchain.rustc, &config.toolchain.cargo)
                .optimize(config.toolchain.optimize),
        ),
    ];

    let probe = MemoryProbe::detect();
    if !probe.is_enabled() {
        tracing::warn!("No time utility found, peak RSS will be reported as 0");
    }

    let suite = Suite::new(ProgramsDir::new(programs_dir), backends)?
        .harness(
            BenchmarkHarness::new()
                .warmup(config.run.warmup)
                .iterations(config.run.iterations),
        )
        .probe(probe);

    tracing::info!(
        benchmarks = config.run.benchmarks.len(),
        size_kb = config.run.size_kb,
        mode = %config.run.mode,
        "Starting benchmarks"
    );
    let runs = suite.run_all(&config.run.benchmarks, config.run.size_kb, config.run.seed);

    let settings = RunSettings {
        input_size_kb: config.run.size_kb,
        iterations: config.run.iterations,
        warmup: config.run.warmup,
        seed: config.run.seed,
        x07_mode: config.run.mode,
        x07_cc_profile: config.toolchain.cc_profile,
    };

    if args.json || reporter.is_some() {
        let report = BenchmarkReport::from_runs(settings, &runs);
        if args.json {
            JsonReporter::write(io::stdout().lock(), &report)?;
        }
        if let Some(reporter) = &reporter {
            let path = reporter.save(&report)?;
            tracing::info!(path = %path.display(), "Benchmark report saved");
        }
    }

    if !args.json {
        print!("{}", ResultsTable::new(&runs, &settings));
        print!("{}", SummaryTable::new(&runs));
    }

    Ok(())
}
