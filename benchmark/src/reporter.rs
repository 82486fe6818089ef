// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON report generation for benchmark results.
//!
//! Reports go to any writer (stdout for `--json`) or to timestamped files in
//! an output directory for later comparison.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::metrics::BenchmarkReport;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// JSON reporter for benchmark results.
pub struct JsonReporter {
    /// Output directory for benchmark data
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write a report as pretty JSON followed by a newline.
    pub fn write<W: Write>(mut writer: W, report: &BenchmarkReport) -> Result<(), ReporterError> {
        serde_json::to_writer_pretty(&mut writer, report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Save a benchmark report to a JSON file.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let run_id = report.run_id.simple().to_string();
        let filename = format!("perfcmp_{}_{}.json", timestamp, &run_id[..8]);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        Self::write(BufWriter::new(file), report)?;

        tracing::debug!(path = %filepath.display(), "Saved report");
        Ok(filepath)
    }

    /// List all existing benchmark files in the output directory.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}
