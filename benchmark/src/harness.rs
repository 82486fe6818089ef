// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark harness for warmup and measured iterations.
//!
//! Each iteration is one subprocess run reporting its own wall-clock time,
//! so the harness only sequences runs and collects their durations.

use std::time::Duration;

use perfcmp_core::Execution;

/// A benchmark harness for measuring repeated artifact runs.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    /// Number of warmup iterations before measurement
    warmup_iterations: u32,
    /// Number of measurement iterations
    measurement_iterations: u32,
}

/// Durations and final output of the measured iterations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    pub samples: Vec<Duration>,
    /// Output of the last measured iteration.
    pub last_output: Option<Vec<u8>>,
}

/// A measurement cut short by a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interrupted<E> {
    /// Samples collected before the failure.
    pub partial: Measurement,
    pub error: E,
}

impl BenchmarkHarness {
    /// Create a new benchmark harness with default settings.
    pub fn new() -> Self {
        Self {
            warmup_iterations: 2,
            measurement_iterations: 5,
        }
    }

    /// Set the number of warmup iterations.
    pub fn warmup(mut self, iterations: u32) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Set the number of measurement iterations.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.measurement_iterations = iterations;
        self
    }

    pub fn warmup_iterations(&self) -> u32 {
        self.warmup_iterations
    }

    pub fn measurement_iterations(&self) -> u32 {
        self.measurement_iterations
    }

    /// Run `operation` through warmup and measurement.
    ///
    /// Warmup results are discarded. The first error aborts the measurement
    /// and is returned with the samples collected so far.
    pub fn measure<F, E>(&self, mut operation: F) -> Result<Measurement, Interrupted<E>>
    where
        F: FnMut() -> Result<Execution, E>,
    {
        let mut measurement = Measurement {
            samples: Vec::with_capacity(self.measurement_iterations as usize),
            last_output: None,
        };

        // Warmup phase
        for _ in 0..self.warmup_iterations {
            if let Err(error) = operation() {
                return Err(Interrupted {
                    partial: measurement,
                    error,
                });
            }
        }

        // Measurement phase
        for _ in 0..self.measurement_iterations {
            match operation() {
                Ok(execution) => {
                    measurement.samples.push(execution.elapsed);
                    measurement.last_output = Some(execution.output);
                }
                Err(error) => {
                    return Err(Interrupted {
                        partial: measurement,
                        error,
                    })
                }
            }
        }

        Ok(measurement)
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}
