// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Peak memory measurement through `/usr/bin/time`.
//!
//! GNU time (`-v`) reports `Maximum resident set size (kbytes): N`.
//! BSD time on macOS (`-l`) reports `N  maximum resident set size` in bytes.

use std::path::{Path, PathBuf};

use crate::process::is_executable;

/// Default location of the time utility.
const TIME_BIN: &str = "/usr/bin/time";

const GNU_MARKER: &str = "Maximum resident set size (kbytes):";
const BSD_MARKER: &str = "maximum resident set size";

/// Output dialect of the time utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RssFormat {
    /// GNU time, value in KiB.
    Gnu,
    /// BSD time, value in bytes.
    Bsd,
}

impl RssFormat {
    /// Dialect of the host platform.
    pub fn native() -> Self {
        if cfg!(target_os = "macos") {
            RssFormat::Bsd
        } else {
            RssFormat::Gnu
        }
    }

    fn flag(&self) -> &'static str {
        match self {
            RssFormat::Gnu => "-v",
            RssFormat::Bsd => "-l",
        }
    }
}

/// Optional wrapper that reports the peak RSS of a child process.
#[derive(Debug, Clone)]
pub struct MemoryProbe {
    tool: Option<(PathBuf, RssFormat)>,
}

impl MemoryProbe {
    /// Use `/usr/bin/time` if it exists and is executable.
    pub fn detect() -> Self {
        Self::at(TIME_BIN, RssFormat::native())
    }

    /// Use the time utility at `path`, disabled if it is not executable.
    pub fn at(path: impl AsRef<Path>, format: RssFormat) -> Self {
        let path = path.as_ref();
        if is_executable(path) {
            tracing::debug!(tool = %path.display(), ?format, "Memory probe enabled");
            Self {
                tool: Some((path.to_path_buf(), format)),
            }
        } else {
            tracing::debug!(tool = %path.display(), "Memory probe unavailable, RSS reported as 0");
            Self::disabled()
        }
    }

    /// A probe that never measures; RSS is reported as 0.
    pub fn disabled() -> Self {
        Self { tool: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tool.is_some()
    }

    /// Command line prefix to run before the measured program.
    pub fn prefix(&self) -> Option<(&Path, &'static str)> {
        self.tool
            .as_ref()
            .map(|(path, format)| (path.as_path(), format.flag()))
    }

    /// Parse the peak RSS in KiB from the wrapped process's stderr.
    pub fn parse(&self, stderr: &[u8]) -> u64 {
        match &self.tool {
            Some((_, format)) => parse_max_rss_kb(stderr, *format),
            None => 0,
        }
    }
}

/// Extract the peak RSS in KiB from time utility output. Returns 0 when absent.
pub fn parse_max_rss_kb(stderr: &[u8], format: RssFormat) -> u64 {
    let text = String::from_utf8_lossy(stderr);

    match format {
        RssFormat::Bsd => text
            .lines()
            .filter(|line| line.contains(BSD_MARKER))
            .find_map(|line| line.split_whitespace().next()?.parse::<u64>().ok())
            .map(|bytes| bytes / 1024)
            .unwrap_or(0),
        RssFormat::Gnu => text
            .lines()
            .find(|line| line.contains(GNU_MARKER))
            .and_then(|line| line.split_once(':'))
            .and_then(|(_, value)| value.trim().parse::<u64>().ok())
            .unwrap_or(0),
    }
}
