// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Rust programs, built with `rustc` or, when they need crates, with Cargo.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{run_compiler, run_native, unsupported_program, Backend, Execution};
use crate::error::BackendError;
use crate::process::Invocation;
use crate::programs::{Program, ProgramsDir};
use crate::rss::MemoryProbe;
use crate::types::{BenchmarkName, Language};

const OPTIMIZED_FLAGS: &[&str] = &["-C", "opt-level=3", "-C", "target-cpu=native"];

/// Single-file Rust programs and Cargo projects.
#[derive(Debug, Clone)]
pub struct RustBackend {
    rustc: PathBuf,
    cargo: PathBuf,
    optimize: bool,
}

impl RustBackend {
    pub fn new(rustc: impl Into<PathBuf>, cargo: impl Into<PathBuf>) -> Self {
        Self {
            rustc: rustc.into(),
            cargo: cargo.into(),
            optimize: true,
        }
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    fn compile_file(&self, source: &Path, artifact: &Path) -> Result<Duration, BackendError> {
        let flags: &[&str] = if self.optimize { OPTIMIZED_FLAGS } else { &[] };
        let invocation = Invocation::new(&self.rustc)
            .args(flags)
            .arg("-o")
            .arg(artifact)
            .arg(source);
        run_compiler(Language::Rust, &invocation)
    }

    /// `cargo build --release`, then copy `target/release/<dir name>` to `artifact`.
    fn compile_project(&self, project: &Path, artifact: &Path) -> Result<Duration, BackendError> {
        let invocation = Invocation::new(&self.cargo)
            .args(["build", "--release"])
            .current_dir(project);
        let elapsed = run_compiler(Language::Rust, &invocation).map_err(|e| match e {
            BackendError::CompileFailed {
                language,
                diagnostics,
            } => BackendError::CompileFailed {
                language,
                diagnostics: format!("cargo build failed: {}", diagnostics),
            },
            other => other,
        })?;

        let binary = cargo_binary(project);
        if !binary.is_file() {
            return Err(BackendError::ArtifactMissing {
                language: Language::Rust,
                path: binary,
            });
        }

        std::fs::copy(&binary, artifact).map_err(|source| BackendError::Io {
            language: Language::Rust,
            context: "copying cargo build output",
            source,
        })?;

        Ok(elapsed)
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new("rustc", "cargo")
    }
}

/// Release binary produced by `cargo build` for a project named after its directory.
fn cargo_binary(project: &Path) -> PathBuf {
    let name = project
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    project
        .join("target")
        .join("release")
        .join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}

impl Backend for RustBackend {
    fn language(&self) -> Language {
        Language::Rust
    }

    /// Cargo projects take priority over single files.
    fn locate(&self, programs: &ProgramsDir, benchmark: &BenchmarkName) -> Option<Program> {
        programs
            .cargo_project(benchmark)
            .map(Program::CargoProject)
            .or_else(|| programs.rust_source(benchmark).map(Program::SourceFile))
    }

    fn compile(&self, program: &Program, artifact: &Path) -> Result<Duration, BackendError> {
        match program {
            Program::SourceFile(source) => self.compile_file(source, artifact),
            Program::CargoProject(project) => self.compile_project(project, artifact),
            Program::X07Project { .. } => Err(unsupported_program(Language::Rust, program)),
        }
    }

    fn probe_run(
        &self,
        artifact: &Path,
        input: &[u8],
        probe: &MemoryProbe,
    ) -> Result<Execution, BackendError> {
        run_native(Language::Rust, artifact, input, probe)
    }
}
