// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! perfcmp Core Library
//!
//! Building blocks for comparing X07, C and Rust programs: validated types,
//! configuration, deterministic input synthesis, the length-prefixed binary
//! ABI, peak memory probing, subprocess capture, host runner resolution and
//! the per-language compile/run adapters.

pub mod backend;
pub mod config;
pub mod error;
pub mod framing;
pub mod input;
pub mod process;
pub mod programs;
pub mod rss;
pub mod toolchain;
pub mod types;

// Re-export commonly used types
pub use backend::{Backend, CBackend, Execution, RustBackend, X07Backend, X07Settings};
pub use config::{Config, ConfigLoader};
pub use error::{BackendError, ConfigError, FrameError, PerfError, PerfResult, ToolchainError};
pub use input::{generate_input, InputData};
pub use programs::{Program, ProgramsDir};
pub use rss::MemoryProbe;
pub use toolchain::HostRunnerLocator;
pub use types::{BenchmarkName, CcProfile, Language, X07Mode};
