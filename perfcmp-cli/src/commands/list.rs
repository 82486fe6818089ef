// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `perfcmp list` command - List benchmarks and available programs.

use std::path::{Path, PathBuf};

use perfcmp_core::{BenchmarkName, ConfigLoader, ProgramsDir};

pub fn execute(config_path: Option<&Path>, programs_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ConfigLoader::load_or_default(config_path)?;
    let programs = ProgramsDir::new(programs_dir.unwrap_or(config.programs_dir));

    println!("Programs directory: {}", programs.root().display());
    println!();
    println!(
        "{:<16} {:<9} {:<10} {:<6} {:<8}",
        "Benchmark", "Default", "X07", "C", "Rust"
    );
    println!("{}", "-".repeat(53));

    for name in BenchmarkName::known() {
        let x07 = if programs.x07_project(&name).is_some() {
            "project"
        } else if programs.x07_program(&name).is_some() {
            "yes"
        } else {
            "-"
        };
        let c = if programs.c_source(&name).is_some() {
            "yes"
        } else {
            "-"
        };
        let rust = if programs.cargo_project(&name).is_some() {
            "cargo"
        } else if programs.rust_source(&name).is_some() {
            "yes"
        } else {
            "-"
        };
        let default = if config.run.benchmarks.contains(&name) {
            "*"
        } else {
            ""
        };

        println!(
            "{:<16} {:<9} {:<10} {:<6} {:<8}",
            name.as_str(),
            default,
            x07,
            c,
            rust
        );
    }

    println!();
    println!("Total: {} benchmark(s)", BenchmarkName::known().len());

    Ok(())
}
