// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! perfcmp Benchmarking Framework
//!
//! Measures X07, C and Rust programs side by side on identical inputs.
//!
//! # Pipeline
//!
//! - **Suite**: compile each backend's program, probe peak RSS, compare
//!   outputs against the reference, then time warmup and measured runs
//! - **Metrics**: per-backend results with mean/min/stddev statistics
//! - **Reporting**: fixed-width tables for terminals, JSON for tooling
//!
//! # Data Output
//!
//! JSON reports carry system information, run settings and a CRC32 of
//! every backend's output so runs can be compared later.

pub mod harness;
pub mod metrics;
pub mod reporter;
pub mod suite;
pub mod table;

pub use harness::{BenchmarkHarness, Interrupted, Measurement};
pub use metrics::{
    BenchmarkReport, BenchmarkResult, BenchmarkRun, BenchmarkSummary, ResultSummary, RunSettings,
    SystemInfo, TimingStats, OUTPUT_MISMATCH,
};
pub use reporter::{JsonReporter, ReporterError};
pub use suite::Suite;
pub use table::{ResultsTable, SummaryTable};
