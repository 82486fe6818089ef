// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Location of the `x07-host-runner` executable.
//!
//! Resolution order: explicit path, toolchain directory, `PATH`, then the
//! programs directory. The first candidate found is warmed up once with
//! `--help`; any failure here aborts the run before benchmarking starts.

use std::path::{Path, PathBuf};

use crate::error::ToolchainError;
use crate::process::{is_executable, run_captured, search_path, Invocation};
use crate::rss::MemoryProbe;

/// File name of the host runner on this platform.
pub fn host_runner_basename() -> &'static str {
    if cfg!(windows) {
        "x07-host-runner.exe"
    } else {
        "x07-host-runner"
    }
}

/// Inputs for host runner resolution.
#[derive(Debug, Clone, Default)]
pub struct HostRunnerLocator {
    /// Explicit executable path (flag or `X07_HOST_RUNNER`).
    pub explicit: Option<PathBuf>,
    /// Extracted toolchain directory (flag or `X07_TOOLCHAIN`).
    pub toolchain_dir: Option<PathBuf>,
    /// Last-resort directory checked for a bundled runner.
    pub fallback_dir: Option<PathBuf>,
    /// Skip the `PATH` lookup.
    pub skip_path_search: bool,
}

impl HostRunnerLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn toolchain_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.toolchain_dir = dir;
        self
    }

    pub fn fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    pub fn skip_path_search(mut self, skip: bool) -> Self {
        self.skip_path_search = skip;
        self
    }

    /// Find the runner without executing it.
    pub fn locate(&self) -> Result<PathBuf, ToolchainError> {
        if let Some(explicit) = &self.explicit {
            let path = absolutize(explicit);
            if !is_executable(&path) {
                return Err(ToolchainError::NotExecutable { path });
            }
            return Ok(path);
        }

        if let Some(dir) = &self.toolchain_dir {
            let path = absolutize(dir).join(host_runner_basename());
            if !is_executable(&path) {
                return Err(ToolchainError::NotInToolchainDir { path });
            }
            return Ok(path);
        }

        if !self.skip_path_search {
            if let Some(path) = search_path(host_runner_basename()) {
                return Ok(absolutize(&path));
            }
        }

        if let Some(dir) = &self.fallback_dir {
            let path = dir.join(host_runner_basename());
            if is_executable(&path) {
                return Ok(absolutize(&path));
            }
        }

        Err(ToolchainError::NotFound)
    }

    /// Find the runner and warm it up.
    pub fn resolve(&self) -> Result<PathBuf, ToolchainError> {
        let path = self.locate()?;
        warm_up(&path)?;
        tracing::info!(host_runner = %path.display(), "Resolved x07-host-runner");
        Ok(path)
    }
}

/// Invoke `<runner> --help` so first-run costs stay out of the measurements.
pub fn warm_up(path: &Path) -> Result<(), ToolchainError> {
    let run = run_captured(
        &Invocation::new(path).arg("--help"),
        b"",
        &MemoryProbe::disabled(),
    )
    .map_err(|e| ToolchainError::WarmupFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !run.success() {
        return Err(ToolchainError::WarmupFailed {
            path: path.to_path_buf(),
            reason: format!("exit {}: {}", run.exit_description(), run.stderr_lossy()),
        });
    }
    Ok(())
}

fn absolutize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
