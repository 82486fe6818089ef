// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! C programs compiled with the system C compiler.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{run_compiler, run_native, unsupported_program, Backend, Execution};
use crate::error::BackendError;
use crate::process::Invocation;
use crate::programs::{Program, ProgramsDir};
use crate::rss::MemoryProbe;
use crate::types::{BenchmarkName, Language};

const OPTIMIZED_FLAGS: &[&str] = &["-O3", "-march=native"];
const DEBUG_FLAGS: &[&str] = &["-O0", "-g"];

/// Single-file C programs.
#[derive(Debug, Clone)]
pub struct CBackend {
    cc: PathBuf,
    optimize: bool,
}

impl CBackend {
    pub fn new(cc: impl Into<PathBuf>) -> Self {
        Self {
            cc: cc.into(),
            optimize: true,
        }
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    fn flags(&self) -> &'static [&'static str] {
        if self.optimize {
            OPTIMIZED_FLAGS
        } else {
            DEBUG_FLAGS
        }
    }
}

impl Default for CBackend {
    fn default() -> Self {
        Self::new("cc")
    }
}

impl Backend for CBackend {
    fn language(&self) -> Language {
        Language::C
    }

    fn locate(&self, programs: &ProgramsDir, benchmark: &BenchmarkName) -> Option<Program> {
        programs.c_source(benchmark).map(Program::SourceFile)
    }

    fn compile(&self, program: &Program, artifact: &Path) -> Result<Duration, BackendError> {
        let Program::SourceFile(source) = program else {
            return Err(unsupported_program(Language::C, program));
        };

        let invocation = Invocation::new(&self.cc)
            .args(self.flags())
            .arg("-o")
            .arg(artifact)
            .arg(source);
        run_compiler(Language::C, &invocation)
    }

    fn probe_run(
        &self,
        artifact: &Path,
        input: &[u8],
        probe: &MemoryProbe,
    ) -> Result<Execution, BackendError> {
        run_native(Language::C, artifact, input, probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        assert_eq!(CBackend::default().flags(), ["-O3", "-march=native"]);
        assert_eq!(CBackend::default().optimize(false).flags(), ["-O0", "-g"]);
    }

    #[test]
    fn test_rejects_cargo_projects() {
        let err = CBackend::default()
            .compile(
                &Program::CargoProject(PathBuf::from("/tmp/project")),
                Path::new("/tmp/out"),
            )
            .unwrap_err();
        assert!(matches!(err, BackendError::CompileFailed { .. }));
    }
}
