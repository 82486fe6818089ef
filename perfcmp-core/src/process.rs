// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Subprocess invocation with captured output.
//!
//! Every external tool (compilers, host runner, benchmark binaries) goes
//! through [`run_captured`], which feeds stdin, captures stdout/stderr, times
//! the child from spawn to exit and optionally measures peak RSS.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::BackendError;
use crate::rss::MemoryProbe;
use crate::types::Language;

/// Description of a command to run.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Build the `Command`, wrapped by the memory probe when enabled.
    fn command(&self, probe: &MemoryProbe) -> Command {
        let mut cmd = match probe.prefix() {
            Some((tool, flag)) => {
                let mut cmd = Command::new(tool);
                cmd.arg(flag).arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        };
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Result of one finished subprocess.
#[derive(Debug, Clone)]
pub struct CapturedRun {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Wall-clock time from spawn to exit.
    pub elapsed: Duration,
    /// Peak RSS in KiB, 0 when not measured.
    pub peak_rss_kb: u64,
}

impl CapturedRun {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }

    /// Exit code, or the terminating signal on unix.
    pub fn exit_description(&self) -> String {
        if let Some(code) = self.status.code() {
            return code.to_string();
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = self.status.signal() {
                return format!("signal {}", signal);
            }
        }
        "unknown".to_string()
    }

    /// Turn a non-zero exit into `BackendError::NonZeroExit`.
    pub fn check(self, language: Language) -> Result<Self, BackendError> {
        if self.success() {
            Ok(self)
        } else {
            Err(BackendError::NonZeroExit {
                language,
                code: self.exit_description(),
                stderr: self.stderr_lossy(),
            })
        }
    }
}

/// Run `invocation` to completion, writing `stdin` to the child.
pub fn run_captured(
    invocation: &Invocation,
    stdin: &[u8],
    probe: &MemoryProbe,
) -> io::Result<CapturedRun> {
    let mut cmd = invocation.command(probe);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::trace!(
        program = %invocation.program.display(),
        args = ?invocation.args,
        stdin_bytes = stdin.len(),
        "Spawning subprocess"
    );

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    // The writer runs on its own thread so a child that fills its stdout
    // pipe before draining stdin cannot deadlock us.
    let output = thread::scope(|scope| {
        let writer = child.stdin.take().map(|mut pipe| {
            scope.spawn(move || {
                // A child that exits without reading all of stdin is not an error.
                match pipe.write_all(stdin) {
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                }
            })
        });

        let output = child.wait_with_output();

        if let Some(handle) = writer {
            match handle.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))
                }
            }
        }
        output
    })?;
    let elapsed = start.elapsed();

    let peak_rss_kb = probe.parse(&output.stderr);

    Ok(CapturedRun {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
        elapsed,
        peak_rss_kb,
    })
}

/// Run and map spawn failures into a `BackendError`.
pub fn run_for(
    language: Language,
    invocation: &Invocation,
    stdin: &[u8],
    probe: &MemoryProbe,
) -> Result<CapturedRun, BackendError> {
    run_captured(invocation, stdin, probe).map_err(|source| BackendError::Spawn {
        language,
        program: invocation.program().display().to_string(),
        source,
    })
}

/// True if `path` is a regular file with an execute bit set.
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find an executable named `name` on `PATH`.
pub fn search_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}
