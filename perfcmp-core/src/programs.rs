// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Layout of the benchmark program sources.
//!
//! ```text
//! <root>/x07/<bench>.x07.json          single-file X07 program
//! <root>/projects/regex/x07.json       X07 project (regex benchmarks)
//! <root>/c/<bench>.c
//! <root>/rust/<bench>.rs
//! <root>/rust_cargo/<bench>/Cargo.toml Cargo project (external crates)
//! ```

use std::path::{Path, PathBuf};

use crate::types::BenchmarkName;

/// A program to compile for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// A single source file.
    SourceFile(PathBuf),
    /// An X07 project manifest and the entry module to build.
    X07Project { manifest: PathBuf, entry: String },
    /// A Cargo project directory.
    CargoProject(PathBuf),
}

impl Program {
    pub fn path(&self) -> &Path {
        match self {
            Program::SourceFile(path) | Program::CargoProject(path) => path,
            Program::X07Project { manifest, .. } => manifest,
        }
    }
}

/// Root directory holding the per-backend program sources.
#[derive(Debug, Clone)]
pub struct ProgramsDir {
    root: PathBuf,
}

impl ProgramsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn x07_program(&self, benchmark: &BenchmarkName) -> Option<PathBuf> {
        existing(self.root.join("x07").join(format!("{}.x07.json", benchmark)))
    }

    /// Project manifest and entry module for benchmarks built as an X07 project.
    pub fn x07_project(&self, benchmark: &BenchmarkName) -> Option<(PathBuf, &'static str)> {
        let entry = match benchmark.as_str() {
            "regex_is_match" => "src/is_match.x07.json",
            "regex_count" => "src/count.x07.json",
            "regex_replace" => "src/replace.x07.json",
            _ => return None,
        };
        let manifest = self.root.join("projects").join("regex").join("x07.json");
        existing(manifest).map(|manifest| (manifest, entry))
    }

    pub fn c_source(&self, benchmark: &BenchmarkName) -> Option<PathBuf> {
        existing(self.root.join("c").join(format!("{}.c", benchmark)))
    }

    pub fn rust_source(&self, benchmark: &BenchmarkName) -> Option<PathBuf> {
        existing(self.root.join("rust").join(format!("{}.rs", benchmark)))
    }

    pub fn cargo_project(&self, benchmark: &BenchmarkName) -> Option<PathBuf> {
        let dir = self.root.join("rust_cargo").join(benchmark.as_str());
        dir.join("Cargo.toml").is_file().then_some(dir)
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_lookup_sources() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "c/sum_bytes.c");
        touch(dir.path(), "rust/sum_bytes.rs");
        touch(dir.path(), "x07/sum_bytes.x07.json");

        let programs = ProgramsDir::new(dir.path());
        let bench = BenchmarkName::new("sum_bytes").unwrap();
        assert!(programs.c_source(&bench).is_some());
        assert!(programs.rust_source(&bench).is_some());
        assert!(programs.x07_program(&bench).is_some());
        assert!(programs.cargo_project(&bench).is_none());
        assert!(programs.x07_project(&bench).is_none());
    }

    #[test]
    fn test_regex_project_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "projects/regex/x07.json");
        touch(dir.path(), "rust_cargo/regex_count/Cargo.toml");

        let programs = ProgramsDir::new(dir.path());
        let bench = BenchmarkName::new("regex_count").unwrap();
        let (manifest, entry) = programs.x07_project(&bench).unwrap();
        assert!(manifest.ends_with("projects/regex/x07.json"));
        assert_eq!(entry, "src/count.x07.json");
        assert!(programs.cargo_project(&bench).is_some());
    }

    #[test]
    fn test_missing_root() {
        let programs = ProgramsDir::new("/nonexistent/programs");
        let bench = BenchmarkName::new("fibonacci").unwrap();
        assert!(programs.c_source(&bench).is_none());
    }
}
