// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Human-readable result tables.

use std::fmt;

use perfcmp_core::Language;

use crate::metrics::{BenchmarkResult, BenchmarkRun, RunSettings};

const WIDE_RULE: usize = 80;
const RULE: usize = 70;
const SUMMARY_RULE: usize = 60;

/// Per-benchmark result tables followed by a legend.
pub struct ResultsTable<'a> {
    runs: &'a [BenchmarkRun],
    settings: &'a RunSettings,
}

impl<'a> ResultsTable<'a> {
    pub fn new(runs: &'a [BenchmarkRun], settings: &'a RunSettings) -> Self {
        Self { runs, settings }
    }
}

impl fmt::Display for ResultsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(
            f,
            "Performance Benchmark Results (input size: {} KB, X07 mode: {}, cc-profile: {})",
            self.settings.input_size_kb, self.settings.x07_mode, self.settings.x07_cc_profile
        )?;
        writeln!(f, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(f)?;

        for run in self.runs {
            writeln!(f, "Benchmark: {}", run.benchmark)?;
            writeln!(f, "{}", "-".repeat(RULE))?;
            writeln!(
                f,
                "{:<12} {:<12} {:<12} {:<10} {:<12} {:<12} {:<10} Status",
                "Language",
                "Mean (ms)",
                "Min (ms)",
                "StdDev",
                "Compile (ms)",
                "Build (KiB)",
                "RSS (KiB)"
            )?;
            writeln!(f, "{}", "-".repeat(RULE))?;

            let x07_mean = run.x07_mean_ms();
            for result in &run.results {
                let speedup = match x07_mean {
                    Some(x07)
                        if x07 > 0.0
                            && result.language != Language::X07
                            && result.success
                            && result.mean_time_ms() > 0.0 =>
                    {
                        format!(" ({:.2}x)", x07 / result.mean_time_ms())
                    }
                    _ => String::new(),
                };

                let stats = result.stats();
                writeln!(
                    f,
                    "{:<12} {:<12.2} {:<12.2} {:<10.2} {:<12.1} {:<12.1} {:<10} {}{}",
                    result.language.as_str(),
                    stats.mean_ms,
                    stats.min_ms,
                    stats.stddev_ms,
                    result.compile_time_ms(),
                    result.build_size_kib(),
                    result.peak_rss_kb,
                    status(result),
                    speedup
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "Legend:")?;
        writeln!(
            f,
            "  - Mean/Min/StdDev: Execution time statistics over multiple runs"
        )?;
        writeln!(f, "  - Compile: One-time compilation overhead")?;
        writeln!(f, "  - Build: Final executable size")?;
        writeln!(f, "  - RSS: Peak resident set size (one run)")?;
        writeln!(f, "  - Speedup (Nx): How many times faster than X07")?;
        writeln!(f)
    }
}

/// Relative performance of every backend against X07.
pub struct SummaryTable<'a> {
    runs: &'a [BenchmarkRun],
}

impl<'a> SummaryTable<'a> {
    pub fn new(runs: &'a [BenchmarkRun]) -> Self {
        Self { runs }
    }
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(SUMMARY_RULE))?;
        writeln!(f, "Summary: Relative Performance (X07 = 1.0x)")?;
        writeln!(f, "{}", "=".repeat(SUMMARY_RULE))?;
        writeln!(f)?;
        writeln!(f, "{:<20} {:<12} {:<12} {:<12}", "Benchmark", "X07", "C", "Rust")?;
        writeln!(f, "{}", "-".repeat(SUMMARY_RULE))?;

        for run in self.runs {
            let mut x07 = "1.0x".to_string();
            let mut c = "N/A".to_string();
            let mut rust = "N/A".to_string();

            if let Some(x07_mean) = run.x07_mean_ms().filter(|mean| *mean > 0.0) {
                for result in &run.results {
                    let mean = result.mean_time_ms();
                    if !result.success || mean <= 0.0 {
                        continue;
                    }
                    let ratio = format!("{:.2}x", x07_mean / mean);
                    match result.language {
                        Language::X07 => x07 = ratio,
                        Language::C => c = ratio,
                        Language::Rust => rust = ratio,
                    }
                }
            }

            writeln!(
                f,
                "{:<20} {:<12} {:<12} {:<12}",
                run.benchmark.as_str(),
                x07,
                c,
                rust
            )?;
        }

        writeln!(f)
    }
}

/// `OK`, `WARN: <reason>` or `FAIL: <reason>`, with the reason shortened.
fn status(result: &BenchmarkResult) -> String {
    match (&result.error, result.success) {
        (None, true) => "OK".to_string(),
        (Some(error), true) => format!("WARN: {}", truncate(error, 25)),
        (error, false) => format!("FAIL: {}", truncate(error.as_deref().unwrap_or(""), 30)),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
