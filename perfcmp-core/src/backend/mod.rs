// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Process adapters for the compared backends.
//!
//! Every backend has the same shape: find its program for a benchmark,
//! compile it to an artifact, and run the artifact on an input. Runs can be
//! wrapped by a [`MemoryProbe`] to capture peak RSS.

mod c;
mod rust;
mod x07;

use std::path::Path;
use std::time::Duration;

pub use c::CBackend;
pub use rust::RustBackend;
pub use x07::{X07Backend, X07Settings, DEFAULT_MAX_MEMORY_BYTES, DEFAULT_SOLVE_FUEL};

use crate::error::BackendError;
use crate::process::{run_for, Invocation};
use crate::programs::{Program, ProgramsDir};
use crate::rss::MemoryProbe;
use crate::types::{BenchmarkName, Language};

/// Output and measurements of one artifact run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Program output, with any framing removed.
    pub output: Vec<u8>,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// Peak RSS in KiB, 0 unless a probe was active.
    pub peak_rss_kb: u64,
}

/// A compile-and-run adapter for one language.
pub trait Backend {
    /// Language reported on results.
    fn language(&self) -> Language;

    /// Program to build for `benchmark`, or `None` if this backend has none.
    fn locate(&self, programs: &ProgramsDir, benchmark: &BenchmarkName) -> Option<Program>;

    /// Compile `program` to `artifact`, returning the compile time.
    fn compile(&self, program: &Program, artifact: &Path) -> Result<Duration, BackendError>;

    /// Run the artifact natively, wrapped by `probe`.
    fn probe_run(
        &self,
        artifact: &Path,
        input: &[u8],
        probe: &MemoryProbe,
    ) -> Result<Execution, BackendError>;

    /// Run the artifact the way measured iterations are run.
    fn run(&self, artifact: &Path, input: &[u8]) -> Result<Execution, BackendError> {
        self.probe_run(artifact, input, &MemoryProbe::disabled())
    }
}

/// Run a native binary that reads raw stdin and writes raw stdout.
pub(crate) fn run_native(
    language: Language,
    artifact: &Path,
    input: &[u8],
    probe: &MemoryProbe,
) -> Result<Execution, BackendError> {
    let run = run_for(language, &Invocation::new(artifact), input, probe)?.check(language)?;
    Ok(Execution {
        elapsed: run.elapsed,
        peak_rss_kb: run.peak_rss_kb,
        output: run.stdout,
    })
}

/// Run a compiler command, mapping a non-zero exit to `CompileFailed`.
pub(crate) fn run_compiler(
    language: Language,
    invocation: &Invocation,
) -> Result<Duration, BackendError> {
    tracing::debug!(
        language = %language,
        compiler = %invocation.program().display(),
        "Compiling"
    );
    let run = run_for(language, invocation, b"", &MemoryProbe::disabled())?;
    if !run.success() {
        return Err(BackendError::CompileFailed {
            language,
            diagnostics: run.stderr_lossy(),
        });
    }
    Ok(run.elapsed)
}

pub(crate) fn unsupported_program(language: Language, program: &Program) -> BackendError {
    BackendError::CompileFailed {
        language,
        diagnostics: format!("unsupported program: {}", program.path().display()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_native_surfaces_non_zero_exit() {
        let err = run_native(
            Language::C,
            Path::new("/bin/false"),
            b"",
            &MemoryProbe::disabled(),
        )
        .unwrap_err();
        assert!(matches!(err, BackendError::NonZeroExit { .. }));
    }

    #[test]
    fn test_run_native_echo() {
        let exec = run_native(
            Language::Rust,
            Path::new("/bin/cat"),
            b"payload",
            &MemoryProbe::disabled(),
        )
        .unwrap();
        assert_eq!(exec.output, b"payload");
    }

    #[test]
    fn test_compiler_failure_keeps_diagnostics() {
        let inv = Invocation::new("sh").args(["-c", "echo 'error: expected ;' >&2; exit 1"]);
        let err = run_compiler(Language::C, &inv).unwrap_err();
        match err {
            BackendError::CompileFailed { diagnostics, .. } => {
                assert_eq!(diagnostics, "error: expected ;")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
