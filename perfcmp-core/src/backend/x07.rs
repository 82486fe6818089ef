// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! X07 programs, compiled and optionally executed through `x07-host-runner`.
//!
//! Compilation always produces a native artifact (`--compile-only`). Measured
//! runs either go back through the host runner (`--artifact`) or execute the
//! artifact directly using the length-prefixed stdin/stdout ABI. The memory
//! probe run is always direct so RSS reflects the program, not the runner.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use super::{unsupported_program, Backend, Execution};
use crate::error::BackendError;
use crate::framing::{decode_frame, encode_frame};
use crate::process::{run_for, Invocation};
use crate::programs::{Program, ProgramsDir};
use crate::rss::MemoryProbe;
use crate::types::{BenchmarkName, CcProfile, Language, X07Mode};

/// Fuel budget handed to the runner.
pub const DEFAULT_SOLVE_FUEL: u64 = 500_000_000;
/// Memory cap handed to the runner: 256 MiB.
pub const DEFAULT_MAX_MEMORY_BYTES: u64 = 256 * 1024 * 1024;

const WORLD: &str = "solve-pure";

/// Limits and modes forwarded to the host runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X07Settings {
    pub solve_fuel: u64,
    pub max_memory_bytes: u64,
    pub cc_profile: CcProfile,
    pub mode: X07Mode,
}

impl Default for X07Settings {
    fn default() -> Self {
        Self {
            solve_fuel: DEFAULT_SOLVE_FUEL,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
            cc_profile: CcProfile::Default,
            mode: X07Mode::HostRunner,
        }
    }
}

/// `{"compile": {"ok": bool, "compile_error": ...}}`
#[derive(Debug, Deserialize)]
struct CompileReport {
    #[serde(default)]
    compile: CompileStatus,
}

#[derive(Debug, Default, Deserialize)]
struct CompileStatus {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    compile_error: Value,
}

/// `{"ok": bool, "trap": ..., "solve_output_b64": "..."}`
#[derive(Debug, Deserialize)]
struct SolveReport {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    trap: Value,
    #[serde(default)]
    solve_output_b64: String,
}

/// X07 backend driven by a resolved host runner.
#[derive(Debug, Clone)]
pub struct X07Backend {
    host_runner: PathBuf,
    cwd: PathBuf,
    settings: X07Settings,
}

impl X07Backend {
    pub fn new(host_runner: impl Into<PathBuf>, settings: X07Settings) -> Self {
        let host_runner = host_runner.into();
        let cwd = host_runner
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            host_runner,
            cwd,
            settings,
        }
    }

    pub fn settings(&self) -> &X07Settings {
        &self.settings
    }

    fn runner(&self) -> Invocation {
        Invocation::new(&self.host_runner).current_dir(&self.cwd)
    }

    fn limits(&self, invocation: Invocation) -> Invocation {
        invocation
            .args(["--world", WORLD])
            .arg("--solve-fuel")
            .arg(self.settings.solve_fuel.to_string())
            .arg("--max-memory-bytes")
            .arg(self.settings.max_memory_bytes.to_string())
    }

    fn compile_invocation(&self, source_flag: &str, source: &Path, artifact: &Path) -> Invocation {
        let mut invocation = self.runner();
        if self.settings.cc_profile != CcProfile::Default {
            invocation = invocation
                .arg("--cc-profile")
                .arg(self.settings.cc_profile.as_str());
        }
        self.limits(invocation.arg(source_flag).arg(source))
            .arg("--compiled-out")
            .arg(artifact)
            .arg("--compile-only")
    }

    fn run_compile(&self, invocation: &Invocation, artifact: &Path) -> Result<Duration, BackendError> {
        let run = run_for(Language::X07, invocation, b"", &MemoryProbe::disabled())?;
        check_compile_report(&run.stdout, &run.stderr_lossy())?;

        if !artifact.exists() {
            return Err(BackendError::ArtifactMissing {
                language: Language::X07,
                path: artifact.to_path_buf(),
            });
        }
        Ok(run.elapsed)
    }

    /// Execute the artifact with framed stdin/stdout.
    fn run_direct(
        &self,
        artifact: &Path,
        input: &[u8],
        probe: &MemoryProbe,
    ) -> Result<Execution, BackendError> {
        let framed = encode_frame(input).map_err(|source| BackendError::Frame {
            language: Language::X07,
            source,
        })?;
        let run = run_for(Language::X07, &Invocation::new(artifact), &framed, probe)?
            .check(Language::X07)?;
        let output = decode_frame(&run.stdout).map_err(|source| BackendError::Frame {
            language: Language::X07,
            source,
        })?;

        Ok(Execution {
            output: output.to_vec(),
            elapsed: run.elapsed,
            peak_rss_kb: run.peak_rss_kb,
        })
    }

    /// Execute the artifact through `x07-host-runner --artifact`.
    fn run_cached(&self, artifact: &Path, input: &[u8]) -> Result<Execution, BackendError> {
        let io_err = |context: &'static str| {
            move |source: std::io::Error| BackendError::Io {
                language: Language::X07,
                context,
                source,
            }
        };

        let mut input_file = tempfile::Builder::new()
            .prefix("perfcmp_input_")
            .suffix(".bin")
            .tempfile()
            .map_err(io_err("creating runner input file"))?;
        input_file
            .write_all(input)
            .and_then(|_| input_file.flush())
            .map_err(io_err("writing runner input file"))?;

        let invocation = self
            .limits(self.runner().arg("--artifact").arg(artifact))
            .arg("--input")
            .arg(input_file.path());

        let run = run_for(Language::X07, &invocation, b"", &MemoryProbe::disabled())?
            .check(Language::X07)?;
        let output = decode_solve_report(&run.stdout)?;

        Ok(Execution {
            output,
            elapsed: run.elapsed,
            peak_rss_kb: 0,
        })
    }
}

impl Backend for X07Backend {
    fn language(&self) -> Language {
        Language::X07
    }

    /// Projects take priority over single-file programs.
    fn locate(&self, programs: &ProgramsDir, benchmark: &BenchmarkName) -> Option<Program> {
        if let Some((manifest, entry)) = programs.x07_project(benchmark) {
            return Some(Program::X07Project {
                manifest,
                entry: entry.to_string(),
            });
        }
        programs.x07_program(benchmark).map(Program::SourceFile)
    }

    fn compile(&self, program: &Program, artifact: &Path) -> Result<Duration, BackendError> {
        match program {
            Program::SourceFile(source) => {
                let invocation = self.compile_invocation("--program", source, artifact);
                self.run_compile(&invocation, artifact)
            }
            Program::X07Project { manifest, entry } => {
                let _selected = ProjectEntry::select(manifest, entry)?;
                let invocation = self.compile_invocation("--project", manifest, artifact);
                self.run_compile(&invocation, artifact)
            }
            Program::CargoProject(_) => Err(unsupported_program(Language::X07, program)),
        }
    }

    fn probe_run(
        &self,
        artifact: &Path,
        input: &[u8],
        probe: &MemoryProbe,
    ) -> Result<Execution, BackendError> {
        self.run_direct(artifact, input, probe)
    }

    fn run(&self, artifact: &Path, input: &[u8]) -> Result<Execution, BackendError> {
        match self.settings.mode {
            X07Mode::Direct => self.run_direct(artifact, input, &MemoryProbe::disabled()),
            X07Mode::HostRunner => self.run_cached(artifact, input),
        }
    }
}

/// Check the runner's compile report. Unparsable stdout means the runner
/// failed before reporting, so its stderr is the diagnostic.
fn check_compile_report(stdout: &[u8], stderr: &str) -> Result<(), BackendError> {
    let report: CompileReport =
        serde_json::from_slice(stdout).map_err(|_| BackendError::CompileFailed {
            language: Language::X07,
            diagnostics: stderr.to_string(),
        })?;

    if !report.compile.ok {
        return Err(BackendError::CompileFailed {
            language: Language::X07,
            diagnostics: describe(&report.compile.compile_error),
        });
    }
    Ok(())
}

/// Decode the solve output from a runner report.
fn decode_solve_report(stdout: &[u8]) -> Result<Vec<u8>, BackendError> {
    let report: SolveReport =
        serde_json::from_slice(stdout).map_err(|e| BackendError::MalformedOutput {
            language: Language::X07,
            reason: format!("runner report is not valid JSON: {}", e),
        })?;

    if !report.ok {
        return Err(BackendError::Trap {
            language: Language::X07,
            trap: describe(&report.trap),
        });
    }

    base64::engine::general_purpose::STANDARD
        .decode(report.solve_output_b64.as_bytes())
        .map_err(|e| BackendError::MalformedOutput {
            language: Language::X07,
            reason: format!("invalid base64 solve output: {}", e),
        })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Points a project manifest's `entry` at one module and restores the
/// original manifest text when dropped.
struct ProjectEntry {
    manifest: PathBuf,
    original: String,
}

impl ProjectEntry {
    fn select(manifest: &Path, entry: &str) -> Result<Self, BackendError> {
        let original = fs::read_to_string(manifest).map_err(|source| BackendError::Io {
            language: Language::X07,
            context: "reading project manifest",
            source,
        })?;

        let invalid = |reason: String| BackendError::CompileFailed {
            language: Language::X07,
            diagnostics: format!("invalid project manifest {}: {}", manifest.display(), reason),
        };

        let mut value: Value =
            serde_json::from_str(&original).map_err(|e| invalid(e.to_string()))?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| invalid("not a JSON object".to_string()))?;
        object.insert("entry".to_string(), Value::String(entry.to_string()));
        let updated = serde_json::to_string_pretty(&value).map_err(|e| invalid(e.to_string()))?;

        let guard = Self {
            manifest: manifest.to_path_buf(),
            original,
        };
        fs::write(manifest, updated).map_err(|source| BackendError::Io {
            language: Language::X07,
            context: "writing project manifest",
            source,
        })?;

        tracing::debug!(manifest = %manifest.display(), entry, "Selected project entry");
        Ok(guard)
    }
}

impl Drop for ProjectEntry {
    fn drop(&mut self) {
        if let Err(e) = fs::write(&self.manifest, &self.original) {
            tracing::warn!(
                manifest = %self.manifest.display(),
                error = %e,
                "Failed to restore project manifest"
            );
        }
    }
}
