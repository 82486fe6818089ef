// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark suite orchestration.
//!
//! For every benchmark each backend with a program is compiled, probed for
//! peak memory, checked against the reference output and timed. Backend
//! failures are recorded on the result and never abort the suite.

use std::fs;
use std::path::PathBuf;

use perfcmp_core::{
    generate_input, Backend, BackendError, BenchmarkName, InputData, MemoryProbe, PerfError,
    PerfResult, Program, ProgramsDir,
};
use tempfile::TempDir;

use crate::harness::BenchmarkHarness;
use crate::metrics::{BenchmarkResult, BenchmarkRun};

/// Sequential runner over a fixed set of backends.
pub struct Suite {
    backends: Vec<Box<dyn Backend>>,
    programs: ProgramsDir,
    harness: BenchmarkHarness,
    probe: MemoryProbe,
    /// Build artifacts, removed on drop.
    work_dir: TempDir,
}

impl Suite {
    /// Create a suite with a fresh artifact directory.
    ///
    /// Backends are run in the given order; the first one to produce output
    /// sets the reference for each benchmark.
    pub fn new(programs: ProgramsDir, backends: Vec<Box<dyn Backend>>) -> PerfResult<Self> {
        let work_dir = tempfile::Builder::new()
            .prefix("perf_compare_")
            .tempdir()
            .map_err(|e| PerfError::Io {
                context: "creating artifact directory",
                source: e,
            })?;

        Ok(Self {
            backends,
            programs,
            harness: BenchmarkHarness::new(),
            probe: MemoryProbe::disabled(),
            work_dir,
        })
    }

    /// Set the warmup/iteration policy.
    pub fn harness(mut self, harness: BenchmarkHarness) -> Self {
        self.harness = harness;
        self
    }

    /// Set the memory probe used for the peak RSS run.
    pub fn probe(mut self, probe: MemoryProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Run `benchmarks` one after another on freshly generated inputs.
    pub fn run_all(&self, benchmarks: &[BenchmarkName], size_kb: u32, seed: u64) -> Vec<BenchmarkRun> {
        benchmarks
            .iter()
            .map(|benchmark| {
                tracing::info!("Running benchmark: {}...", benchmark);
                let input = generate_input(benchmark, size_kb, seed);
                self.run_benchmark(benchmark, &input)
            })
            .collect()
    }

    /// Run every backend that has a program for `benchmark` on `input`.
    pub fn run_benchmark(&self, benchmark: &BenchmarkName, input: &InputData) -> BenchmarkRun {
        let mut run = BenchmarkRun::new(benchmark.clone(), input);
        let mut reference: Option<Vec<u8>> = None;

        for backend in &self.backends {
            let language = backend.language();
            let Some(program) = backend.locate(&self.programs, benchmark) else {
                tracing::debug!(benchmark = %benchmark, language = %language, "No program, skipping");
                continue;
            };

            let mut result = BenchmarkResult::new(language, benchmark.clone());
            match self.measure(backend.as_ref(), &program, input, &mut result, &mut reference) {
                Ok(()) => tracing::info!(
                    benchmark = %benchmark,
                    language = %language,
                    mean_ms = result.mean_time_ms(),
                    warning = result.error.as_deref().unwrap_or(""),
                    "Backend finished"
                ),
                Err(e) => {
                    tracing::warn!(
                        benchmark = %benchmark,
                        language = %language,
                        error = %e,
                        "Backend failed"
                    );
                    result.fail(e.to_string());
                }
            }
            run.results.push(result);
        }

        run
    }

    fn artifact_path(&self, benchmark: &BenchmarkName, backend: &dyn Backend) -> PathBuf {
        let language = backend.language().as_str().to_ascii_lowercase();
        self.work_dir.path().join(format!("{}_{}", benchmark, language))
    }

    fn measure(
        &self,
        backend: &dyn Backend,
        program: &Program,
        input: &InputData,
        result: &mut BenchmarkResult,
        reference: &mut Option<Vec<u8>>,
    ) -> Result<(), BackendError> {
        let language = backend.language();
        let artifact = self.artifact_path(&result.benchmark, backend);

        result.compile_time = backend.compile(program, &artifact)?;
        result.build_size_bytes = fs::metadata(&artifact)
            .map_err(|source| BackendError::Io {
                language,
                context: "reading artifact size",
                source,
            })?
            .len();

        // Probe run: peak RSS and the output checked against the reference
        let probed = backend.probe_run(&artifact, &input.data, &self.probe)?;
        result.peak_rss_kb = probed.peak_rss_kb;
        result.output = probed.output;
        match reference.as_deref() {
            None => *reference = Some(result.output.clone()),
            Some(expected) if expected != result.output.as_slice() => result.flag_mismatch(),
            Some(_) => {}
        }

        let measurement = match self.harness.measure(|| backend.run(&artifact, &input.data)) {
            Ok(measurement) => measurement,
            Err(interrupted) => {
                result.times = interrupted.partial.samples;
                return Err(interrupted.error);
            }
        };
        result.times = measurement.samples;

        if let Some(output) = measurement.last_output {
            if reference.as_deref().is_some_and(|expected| expected != output.as_slice()) {
                result.flag_mismatch();
            }
            result.output = output;
        }

        Ok(())
    }
}
