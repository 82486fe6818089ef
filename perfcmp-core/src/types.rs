// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers and enums for validated inputs.
//!
//! Values are checked once at construction so the rest of the crate can
//! rely on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Benchmarks that run when no explicit selection is given.
pub const DEFAULT_BENCHMARKS: &[&str] = &[
    "sum_bytes",
    "word_count",
    "rle_encode",
    "byte_freq",
    "fibonacci",
];

/// Benchmarks with a dedicated input generator that are opt-in.
pub const OPTIONAL_BENCHMARKS: &[&str] = &["regex_is_match", "regex_count", "regex_replace"];

/// One of the compared execution backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    X07,
    C,
    Rust,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::X07 => "X07",
            Language::C => "C",
            Language::Rust => "Rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated benchmark identifier.
/// Must be non-empty, lowercase ASCII alphanumeric with underscores, max 64 chars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BenchmarkName(String);

impl BenchmarkName {
    /// Create a new BenchmarkName with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "benchmark",
                value: name,
                reason: "Benchmark name cannot be empty".to_string(),
            });
        }

        if name.len() > 64 {
            let len = name.len();
            return Err(ConfigError::InvalidFieldValue {
                field: "benchmark",
                value: name,
                reason: format!("Benchmark name too long: {} chars (max 64)", len),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ConfigError::InvalidFieldValue {
                field: "benchmark",
                value: name,
                reason: "Benchmark name must contain only lowercase letters, digits, and underscores"
                    .to_string(),
            });
        }

        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The input generator used for this benchmark.
    pub fn input_kind(&self) -> InputKind {
        InputKind::for_benchmark(&self.0)
    }

    /// The default benchmark selection.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_BENCHMARKS
            .iter()
            .map(|name| Self((*name).to_string()))
            .collect()
    }

    /// Every benchmark with a dedicated input generator.
    pub fn known() -> Vec<Self> {
        DEFAULT_BENCHMARKS
            .iter()
            .chain(OPTIONAL_BENCHMARKS)
            .map(|name| Self((*name).to_string()))
            .collect()
    }
}

impl fmt::Display for BenchmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BenchmarkName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BenchmarkName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BenchmarkName> for String {
    fn from(name: BenchmarkName) -> Self {
        name.0
    }
}

/// Shape of the synthetic input a benchmark consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    SumBytes,
    WordCount,
    RleEncode,
    ByteFreq,
    Fibonacci,
    /// `regex_is_match` and `regex_count`: pattern header followed by text.
    RegexMatch,
    RegexReplace,
    /// Uniform random bytes for benchmarks without a dedicated generator.
    RandomBytes,
}

impl InputKind {
    pub fn for_benchmark(name: &str) -> Self {
        match name {
            "sum_bytes" => InputKind::SumBytes,
            "word_count" => InputKind::WordCount,
            "rle_encode" => InputKind::RleEncode,
            "byte_freq" => InputKind::ByteFreq,
            "fibonacci" => InputKind::Fibonacci,
            "regex_is_match" | "regex_count" => InputKind::RegexMatch,
            "regex_replace" => InputKind::RegexReplace,
            _ => InputKind::RandomBytes,
        }
    }
}

/// C compiler profile forwarded to the host runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CcProfile {
    #[default]
    Default,
    Size,
}

impl CcProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            CcProfile::Default => "default",
            CcProfile::Size => "size",
        }
    }
}

impl fmt::Display for CcProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CcProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(CcProfile::Default),
            "size" => Ok(CcProfile::Size),
            other => Err(ConfigError::InvalidFieldValue {
                field: "cc_profile",
                value: other.to_string(),
                reason: "Must be one of: default, size".to_string(),
            }),
        }
    }
}

/// How measured X07 iterations are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum X07Mode {
    /// Every run goes through `x07-host-runner --artifact`.
    #[default]
    HostRunner,
    /// The compiled artifact is executed directly with framed I/O.
    Direct,
}

impl X07Mode {
    pub fn from_direct_flag(direct: bool) -> Self {
        if direct {
            X07Mode::Direct
        } else {
            X07Mode::HostRunner
        }
    }
}

impl fmt::Display for X07Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            X07Mode::HostRunner => write!(f, "host runner"),
            X07Mode::Direct => write!(f, "direct binary"),
        }
    }
}
