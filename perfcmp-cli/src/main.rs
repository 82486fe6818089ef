// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! perfcmp CLI
//!
//! Command-line interface for comparing X07, C and Rust programs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use perfcmp_core::input::DEFAULT_SEED;

mod commands;

use commands::run::RunArgs;

/// perfcmp - Compare X07 against C and Rust on identical inputs
#[derive(Parser)]
#[command(name = "perfcmp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile, run and compare every backend on the selected benchmarks
    Run(RunArgs),

    /// List known benchmarks and the programs available for each backend
    List {
        /// Directory holding the x07/, c/, rust/ program trees
        #[arg(long)]
        programs_dir: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the generated input for a benchmark
    GenInput {
        /// Benchmark name
        benchmark: String,

        /// Input size in KB
        #[arg(long, default_value_t = 100)]
        size: u32,

        /// Generator seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for tables and JSON
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::List {
            programs_dir,
            config,
        } => commands::list::execute(config.as_deref(), programs_dir),
        Commands::GenInput {
            benchmark,
            size,
            seed,
            output,
        } => commands::gen_input::execute(&benchmark, size, seed, output.as_deref()),
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use perfcmp_core::{CcProfile, X07Mode};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "perfcmp",
            "--verbose",
            "run",
            "--size",
            "16",
            "--benchmarks",
            "sum_bytes",
            "fibonacci",
            "--direct",
            "--x07-cc-profile",
            "size",
            "--json",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.size, Some(16));
        assert_eq!(args.benchmarks.len(), 2);
        assert!(args.direct);
        assert!(args.json);
        assert_eq!(args.x07_cc_profile, Some(CcProfile::Size));

        let mut config = perfcmp_core::Config::default();
        args.apply(&mut config);
        assert_eq!(config.run.size_kb, 16);
        assert_eq!(config.run.mode, X07Mode::Direct);
        assert_eq!(config.run.benchmarks[1].as_str(), "fibonacci");
        assert_eq!(config.toolchain.cc_profile, CcProfile::Size);
        assert_eq!(config.run.iterations, 5);
    }

    #[test]
    fn test_invalid_benchmark_name_rejected() {
        let result = Cli::try_parse_from(["perfcmp", "run", "--benchmarks", "Sum-Bytes"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_gen_input_defaults() {
        let cli = Cli::try_parse_from(["perfcmp", "gen-input", "word_count"]).unwrap();
        match cli.command {
            Commands::GenInput {
                benchmark,
                size,
                seed,
                output,
            } => {
                assert_eq!(benchmark, "word_count");
                assert_eq!(size, 100);
                assert_eq!(seed, 42);
                assert!(output.is_none());
            }
            _ => panic!("expected gen-input"),
        }
    }
}
