// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `perfcmp gen-input` command - Write a generated benchmark input.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use perfcmp_core::config::check_size_kb;
use perfcmp_core::{generate_input, BenchmarkName};

pub fn execute(benchmark: &str, size_kb: u32, seed: u64, output: Option<&Path>) -> anyhow::Result<()> {
    let name = BenchmarkName::new(benchmark)?;
    check_size_kb(size_kb)?;
    let input = generate_input(&name, size_kb, seed);

    match output {
        Some(path) => {
            fs::write(path, &input.data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                input = %input.name,
                bytes = input.data.len(),
                path = %path.display(),
                "Input written"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&input.data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_deterministic_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sum_bytes.bin");

        execute("sum_bytes", 2, 7, Some(&path)).unwrap();

        let expected = generate_input(&BenchmarkName::new("sum_bytes").unwrap(), 2, 7);
        assert_eq!(fs::read(&path).unwrap(), expected.data);
    }

    #[test]
    fn test_rejects_invalid_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.bin");
        assert!(execute("../escape", 1, 42, Some(&path)).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_rejects_out_of_range_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.bin");
        assert!(execute("sum_bytes", 0, 42, Some(&path)).is_err());
        assert!(execute("sum_bytes", 4_000_000, 42, Some(&path)).is_err());
        assert!(!path.exists());
    }
}
