// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for perfcmp.
//!
//! Every failure mode is an explicit enum variant. Setup errors
//! (`ConfigError`, `ToolchainError`) abort a run before any benchmark starts;
//! `BackendError` is caught per backend and recorded on the result.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Language;

/// Top-level error type for perfcmp.
#[derive(Debug, Error)]
pub enum PerfError {
    // =========================================================================
    // Setup Errors - Fatal Before Benchmarking
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Toolchain error: {0}")]
    Toolchain(#[from] ToolchainError),

    // =========================================================================
    // Per-Backend Errors - Recorded On The Result
    // =========================================================================
    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("Framing error: {0}")]
    Frame(#[from] FrameError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors. Invalid settings prevent the run from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Duplicate benchmark: {name}")]
    DuplicateBenchmark { name: String },
}

/// Host runner resolution errors.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("x07-host-runner is not executable: {path}")]
    NotExecutable { path: PathBuf },

    #[error("x07-host-runner not found in toolchain dir: {path}")]
    NotInToolchainDir { path: PathBuf },

    #[error(
        "x07-host-runner not found. Download the X07 toolchain from \
         https://github.com/x07lang/x07/releases, extract it, and either add it to PATH \
         or pass --x07-toolchain /path/to/dir (or set X07_TOOLCHAIN)."
    )]
    NotFound,

    #[error("x07-host-runner warm-up failed ({path}): {reason}")]
    WarmupFailed { path: PathBuf, reason: String },
}

/// Errors raised while compiling or running one backend's program.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{language} failed to spawn {program}: {source}")]
    Spawn {
        language: Language,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{language} compilation failed: {diagnostics}")]
    CompileFailed {
        language: Language,
        diagnostics: String,
    },

    #[error("{language} compilation failed: binary not created at {path}")]
    ArtifactMissing { language: Language, path: PathBuf },

    #[error("{language} execution failed (exit {code}): {stderr}")]
    NonZeroExit {
        language: Language,
        code: String,
        stderr: String,
    },

    #[error("{language} execution failed: {trap}")]
    Trap { language: Language, trap: String },

    #[error("{language} produced malformed output: {reason}")]
    MalformedOutput { language: Language, reason: String },

    #[error("{language} output {source}")]
    Frame {
        language: Language,
        #[source]
        source: FrameError,
    },

    #[error("{language} IO error: {context} - {source}")]
    Io {
        language: Language,
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Length-prefixed framing errors for the direct-execution ABI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("too short: {len} bytes")]
    TooShort { len: usize },

    #[error("truncated: expected {expected}, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("payload too large for a 32-bit length prefix: {size} bytes")]
    PayloadTooLarge { size: usize },
}

/// Result type alias using PerfError.
pub type PerfResult<T> = Result<T, PerfError>;
