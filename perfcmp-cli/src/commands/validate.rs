// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `perfcmp validate` command - Validate configuration file.

use std::path::Path;

use perfcmp_core::ConfigLoader;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            let benchmarks: Vec<&str> = config.run.benchmarks.iter().map(|b| b.as_str()).collect();

            println!("✓ Configuration is valid");
            println!();
            println!("Run Settings:");
            println!("  Programs Directory: {}", config.programs_dir.display());
            println!("  Input Size:         {} KB", config.run.size_kb);
            println!("  Iterations:         {}", config.run.iterations);
            println!("  Warmup:             {}", config.run.warmup);
            println!("  Seed:               {}", config.run.seed);
            println!("  X07 Mode:           {}", config.run.mode);
            println!("  Benchmarks:         {}", benchmarks.join(", "));
            println!();
            println!("Toolchain:");
            println!(
                "  Host Runner:        {}",
                config
                    .toolchain
                    .host_runner
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(auto)".to_string())
            );
            if let Some(dir) = &config.toolchain.toolchain_dir {
                println!("  Toolchain Dir:      {}", dir.display());
            }
            println!("  C Compiler:         {}", config.toolchain.cc.display());
            println!("  Rust Compiler:      {}", config.toolchain.rustc.display());
            println!("  Cargo:              {}", config.toolchain.cargo.display());
            println!("  CC Profile:         {}", config.toolchain.cc_profile);
            println!("  Optimize:           {}", config.toolchain.optimize);
            println!();
            println!("X07 Limits:");
            println!("  Solve Fuel:         {}", config.x07.solve_fuel);
            println!("  Max Memory:         {} bytes", config.x07.max_memory_bytes);
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
