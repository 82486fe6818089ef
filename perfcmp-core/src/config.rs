// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration with strict validation.
//!
//! The file is optional; every field has a default. Command-line flags are
//! applied on top of the loaded values and the result is validated again
//! before any benchmark runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backend::{X07Settings, DEFAULT_MAX_MEMORY_BYTES, DEFAULT_SOLVE_FUEL};
use crate::error::{ConfigError, PerfError, PerfResult};
use crate::input::DEFAULT_SEED;
use crate::types::{BenchmarkName, CcProfile, X07Mode};

/// Default configuration file name, used when present.
pub const DEFAULT_CONFIG_FILE: &str = "perfcmp.yaml";

/// Largest accepted input size in KiB.
pub const MAX_SIZE_KB: u32 = 1024 * 1024;
const MAX_WARMUP: u32 = 1000;
const MIN_MAX_MEMORY_BYTES: u64 = 1024 * 1024;

/// Raw run section as parsed from YAML (before validation).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunConfig {
    size_kb: Option<u32>,
    iterations: Option<u32>,
    warmup: Option<u32>,
    seed: Option<u64>,
    direct: Option<bool>,
    benchmarks: Option<Vec<String>>,
}

/// Raw toolchain section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawToolchainConfig {
    host_runner: Option<String>,
    toolchain_dir: Option<String>,
    cc: Option<String>,
    rustc: Option<String>,
    cargo: Option<String>,
    cc_profile: Option<String>,
    optimize: Option<bool>,
}

/// Raw host runner limits.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawX07Config {
    solve_fuel: Option<u64>,
    max_memory_bytes: Option<u64>,
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    programs_dir: Option<String>,
    #[serde(default)]
    run: RawRunConfig,
    #[serde(default)]
    toolchain: RawToolchainConfig,
    #[serde(default)]
    x07: RawX07Config,
}

/// Measurement settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub size_kb: u32,
    pub iterations: u32,
    pub warmup: u32,
    pub seed: u64,
    pub mode: X07Mode,
    pub benchmarks: Vec<BenchmarkName>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size_kb: 100,
            iterations: 5,
            warmup: 2,
            seed: DEFAULT_SEED,
            mode: X07Mode::HostRunner,
            benchmarks: BenchmarkName::defaults(),
        }
    }
}

/// External tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub host_runner: Option<PathBuf>,
    pub toolchain_dir: Option<PathBuf>,
    pub cc: PathBuf,
    pub rustc: PathBuf,
    pub cargo: PathBuf,
    pub cc_profile: CcProfile,
    pub optimize: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            host_runner: None,
            toolchain_dir: None,
            cc: PathBuf::from("cc"),
            rustc: PathBuf::from("rustc"),
            cargo: PathBuf::from("cargo"),
            cc_profile: CcProfile::Default,
            optimize: true,
        }
    }
}

/// Limits forwarded to the host runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X07Limits {
    pub solve_fuel: u64,
    pub max_memory_bytes: u64,
}

impl Default for X07Limits {
    fn default() -> Self {
        Self {
            solve_fuel: DEFAULT_SOLVE_FUEL,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
        }
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub programs_dir: PathBuf,
    pub run: RunConfig,
    pub toolchain: ToolchainConfig,
    pub x07: X07Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            programs_dir: PathBuf::from("."),
            run: RunConfig::default(),
            toolchain: ToolchainConfig::default(),
            x07: X07Limits::default(),
        }
    }
}

impl Config {
    /// Check field bounds. Called by the loader and again after CLI overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size_kb(self.run.size_kb)?;

        if self.run.iterations == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "iterations",
                value: "0".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.run.warmup > MAX_WARMUP {
            return Err(ConfigError::InvalidFieldValue {
                field: "warmup",
                value: self.run.warmup.to_string(),
                reason: format!("Must not exceed {}", MAX_WARMUP),
            });
        }

        if self.run.benchmarks.is_empty() {
            return Err(ConfigError::InvalidFieldValue {
                field: "benchmarks",
                value: "[]".to_string(),
                reason: "At least one benchmark must be selected".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.run.benchmarks {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateBenchmark {
                    name: name.to_string(),
                });
            }
        }

        if self.x07.solve_fuel == 0 {
            return Err(ConfigError::InvalidFieldValue {
                field: "solve_fuel",
                value: "0".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.x07.max_memory_bytes < MIN_MAX_MEMORY_BYTES {
            return Err(ConfigError::InvalidFieldValue {
                field: "max_memory_bytes",
                value: self.x07.max_memory_bytes.to_string(),
                reason: format!("Must be at least {} bytes", MIN_MAX_MEMORY_BYTES),
            });
        }

        Ok(())
    }

    /// Host runner settings derived from this configuration.
    pub fn x07_settings(&self) -> X07Settings {
        X07Settings {
            solve_fuel: self.x07.solve_fuel,
            max_memory_bytes: self.x07.max_memory_bytes,
            cc_profile: self.toolchain.cc_profile,
            mode: self.run.mode,
        }
    }
}

/// Check an input size against the accepted range.
pub fn check_size_kb(size_kb: u32) -> Result<(), ConfigError> {
    if size_kb == 0 || size_kb > MAX_SIZE_KB {
        return Err(ConfigError::InvalidFieldValue {
            field: "size_kb",
            value: size_kb.to_string(),
            reason: format!("Must be between 1 and {}", MAX_SIZE_KB),
        });
    }
    Ok(())
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> PerfResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| PerfError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load an explicitly requested file, or the default file if it exists,
    /// or fall back to built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> PerfResult<Config> {
        match explicit {
            Some(path) => Self::load_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!(path = DEFAULT_CONFIG_FILE, "Loading default config file");
                Self::load_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Config::default()),
        }
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> PerfResult<Config> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                message: format!("YAML parse error: {}", e),
            })?
        };

        let config = Self::convert(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply defaults and parse typed fields.
    fn convert(raw: RawConfig) -> Result<Config, ConfigError> {
        let defaults = Config::default();

        let benchmarks = match raw.run.benchmarks {
            Some(names) => names
                .into_iter()
                .map(BenchmarkName::new)
                .collect::<Result<Vec<_>, _>>()?,
            None => defaults.run.benchmarks,
        };

        let cc_profile = match raw.toolchain.cc_profile {
            Some(profile) => profile.parse::<CcProfile>()?,
            None => defaults.toolchain.cc_profile,
        };

        Ok(Config {
            programs_dir: raw
                .programs_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.programs_dir),
            run: RunConfig {
                size_kb: raw.run.size_kb.unwrap_or(defaults.run.size_kb),
                iterations: raw.run.iterations.unwrap_or(defaults.run.iterations),
                warmup: raw.run.warmup.unwrap_or(defaults.run.warmup),
                seed: raw.run.seed.unwrap_or(defaults.run.seed),
                mode: raw
                    .run
                    .direct
                    .map(X07Mode::from_direct_flag)
                    .unwrap_or(defaults.run.mode),
                benchmarks,
            },
            toolchain: ToolchainConfig {
                host_runner: raw.toolchain.host_runner.map(PathBuf::from),
                toolchain_dir: raw.toolchain.toolchain_dir.map(PathBuf::from),
                cc: raw
                    .toolchain
                    .cc
                    .map(PathBuf::from)
                    .unwrap_or(defaults.toolchain.cc),
                rustc: raw
                    .toolchain
                    .rustc
                    .map(PathBuf::from)
                    .unwrap_or(defaults.toolchain.rustc),
                cargo: raw
                    .toolchain
                    .cargo
                    .map(PathBuf::from)
                    .unwrap_or(defaults.toolchain.cargo),
                cc_profile,
                optimize: raw.toolchain.optimize.unwrap_or(defaults.toolchain.optimize),
            },
            x07: X07Limits {
                solve_fuel: raw.x07.solve_fuel.unwrap_or(defaults.x07.solve_fuel),
                max_memory_bytes: raw
                    .x07
                    .max_memory_bytes
                    .unwrap_or(defaults.x07.max_memory_bytes),
            },
        })
    }
}
