// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Result types and statistics for benchmark runs.
//!
//! `BenchmarkResult` is the working record filled in while a backend is
//! measured. `BenchmarkReport` is the serializable view written as JSON.

use std::time::Duration;

use chrono::{DateTime, Utc};
use perfcmp_core::{BenchmarkName, CcProfile, InputData, Language, X07Mode};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use uuid::Uuid;

/// Message recorded when a backend's output differs from the reference.
pub const OUTPUT_MISMATCH: &str = "Output mismatch with reference";

/// Mean, minimum and sample standard deviation in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub mean_ms: f64,
    pub min_ms: f64,
    pub stddev_ms: f64,
}

impl TimingStats {
    /// Compute statistics over run durations.
    ///
    /// Empty input yields zeros; stddev is zero with fewer than two samples.
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let millis: Vec<f64> = samples.iter().map(duration_ms).collect();
        let len = millis.len() as f64;
        let mean_ms = millis.iter().sum::<f64>() / len;
        let min_ms = millis.iter().copied().fold(f64::INFINITY, f64::min);

        let stddev_ms = if millis.len() < 2 {
            0.0
        } else {
            let variance = millis
                .iter()
                .map(|&x| {
                    let diff = x - mean_ms;
                    diff * diff
                })
                .sum::<f64>()
                / (len - 1.0);
            variance.sqrt()
        };

        Self {
            mean_ms,
            min_ms,
            stddev_ms,
        }
    }
}

/// Convert a duration to fractional milliseconds.
pub fn duration_ms(duration: &Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Measurements of one backend on one benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    pub language: Language,
    pub benchmark: BenchmarkName,
    /// Durations of the measured iterations.
    pub times: Vec<Duration>,
    /// Peak RSS in KiB from the probe run.
    pub peak_rss_kb: u64,
    /// Artifact size in bytes.
    pub build_size_bytes: u64,
    /// Output of the most recent run.
    pub output: Vec<u8>,
    pub compile_time: Duration,
    pub success: bool,
    /// Failure reason, or a warning when `success` is still true.
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// An empty, successful result.
    pub fn new(language: Language, benchmark: BenchmarkName) -> Self {
        Self {
            language,
            benchmark,
            times: Vec::new(),
            peak_rss_kb: 0,
            build_size_bytes: 0,
            output: Vec::new(),
            compile_time: Duration::ZERO,
            success: true,
            error: None,
        }
    }

    /// Mark the result as failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = false;
        self.error = Some(message.into());
    }

    /// Record that the output differs from the reference.
    pub fn flag_mismatch(&mut self) {
        self.error = Some(OUTPUT_MISMATCH.to_string());
    }

    /// Successful, but with a recorded warning.
    pub fn is_warning(&self) -> bool {
        self.success && self.error.is_some()
    }

    pub fn stats(&self) -> TimingStats {
        TimingStats::from_samples(&self.times)
    }

    pub fn mean_time_ms(&self) -> f64 {
        self.stats().mean_ms
    }

    pub fn min_time_ms(&self) -> f64 {
        self.stats().min_ms
    }

    pub fn stddev_time_ms(&self) -> f64 {
        self.stats().stddev_ms
    }

    pub fn compile_time_ms(&self) -> f64 {
        duration_ms(&self.compile_time)
    }

    pub fn build_size_kib(&self) -> f64 {
        self.build_size_bytes as f64 / 1024.0
    }
}

/// Results of all backends for one benchmark, in backend order.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    pub benchmark: BenchmarkName,
    pub input_name: String,
    pub input_bytes: usize,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkRun {
    pub fn new(benchmark: BenchmarkName, input: &InputData) -> Self {
        Self {
            benchmark,
            input_name: input.name.clone(),
            input_bytes: input.data.len(),
            results: Vec::new(),
        }
    }

    /// Mean time of the first successful X07 result, if any.
    pub fn x07_mean_ms(&self) -> Option<f64> {
        self.results
            .iter()
            .find(|r| r.language == Language::X07 && r.success)
            .map(BenchmarkResult::mean_time_ms)
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Settings a report was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    pub input_size_kb: u32,
    pub iterations: u32,
    pub warmup: u32,
    pub seed: u64,
    pub x07_mode: X07Mode,
    pub x07_cc_profile: CcProfile,
}

/// Serializable view of one `BenchmarkResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub language: Language,
    pub mean_time_ms: f64,
    pub min_time_ms: f64,
    pub stddev_time_ms: f64,
    pub times_ms: Vec<f64>,
    pub compile_time_ms: f64,
    pub build_size_bytes: u64,
    pub peak_rss_kb: u64,
    pub success: bool,
    /// Empty when there is nothing to report.
    pub error: String,
    pub output_bytes: usize,
    pub output_crc32: u32,
    /// Only set on X07 rows.
    pub x07_cc_profile: Option<CcProfile>,
}

impl ResultSummary {
    pub fn from_result(result: &BenchmarkResult, cc_profile: CcProfile) -> Self {
        let stats = result.stats();
        Self {
            language: result.language,
            mean_time_ms: stats.mean_ms,
            min_time_ms: stats.min_ms,
            stddev_time_ms: stats.stddev_ms,
            times_ms: result.times.iter().map(duration_ms).collect(),
            compile_time_ms: result.compile_time_ms(),
            build_size_bytes: result.build_size_bytes,
            peak_rss_kb: result.peak_rss_kb,
            success: result.success,
            error: result.error.clone().unwrap_or_default(),
            output_bytes: result.output.len(),
            output_crc32: crc32fast::hash(&result.output),
            x07_cc_profile: (result.language == Language::X07).then_some(cc_profile),
        }
    }
}

/// Serializable view of one `BenchmarkRun`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub benchmark: BenchmarkName,
    pub input: String,
    pub input_bytes: usize,
    pub results: Vec<ResultSummary>,
}

/// Complete benchmark suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Tool version
    pub version: String,
    /// Unique id of this invocation
    pub run_id: Uuid,
    /// Timestamp when benchmarks were run
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    pub settings: RunSettings,
    pub benchmarks: Vec<BenchmarkSummary>,
}

impl BenchmarkReport {
    /// Create an empty report for `settings`.
    pub fn new(settings: RunSettings) -> Self {
        Self {
            benchmark_suite: "perfcmp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            settings,
            benchmarks: Vec::new(),
        }
    }

    /// Add a finished benchmark to the report.
    pub fn add_run(&mut self, run: &BenchmarkRun) {
        let cc_profile = self.settings.x07_cc_profile;
        self.benchmarks.push(BenchmarkSummary {
            benchmark: run.benchmark.clone(),
            input: run.input_name.clone(),
            input_bytes: run.input_bytes,
            results: run
                .results
                .iter()
                .map(|r| ResultSummary::from_result(r, cc_profile))
                .collect(),
        });
    }

    /// Build a report from finished runs.
    pub fn from_runs(settings: RunSettings, runs: &[BenchmarkRun]) -> Self {
        let mut report = Self::new(settings);
        for run in runs {
            report.add_run(run);
        }
        report
    }
}
