// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deterministic synthetic inputs.
//!
//! Each benchmark gets an input shaped for the program under test. The same
//! `(benchmark, size_kb, seed)` triple always produces byte-identical data so
//! every backend sees the same bytes and outputs can be compared.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::types::{BenchmarkName, InputKind};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "hello", "world", "python",
    "rust", "code", "test", "benchmark",
];

const TEXT_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ ";
const REGEX_PATTERN: &[u8] = b"[a-z]+";
const REGEX_REPLACEMENT: &[u8] = b"X";

/// Longest run emitted by the RLE generator.
const MAX_RUN_LEN: usize = 50;
/// Largest Fibonacci index requested; fib(46) still fits in a u32.
const MAX_FIB_N: u64 = 46;

/// Generated input shared by all backends of a benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputData {
    /// `"{benchmark}_{size_kb}kb"`
    pub name: String,
    pub data: Vec<u8>,
}

impl InputData {
    /// Effective size in KiB.
    pub fn size_kb(&self) -> f64 {
        self.data.len() as f64 / 1024.0
    }
}

/// Generate the input for `benchmark` at `size_kb` kilobytes.
pub fn generate_input(benchmark: &BenchmarkName, size_kb: u32, seed: u64) -> InputData {
    let mut rng = StdRng::seed_from_u64(seed);
    let size = size_kb as usize * 1024;

    let data = match benchmark.input_kind() {
        InputKind::SumBytes | InputKind::ByteFreq | InputKind::RandomBytes => {
            random_bytes(&mut rng, size)
        }
        InputKind::WordCount => word_text(&mut rng, size),
        InputKind::RleEncode => byte_runs(&mut rng, size),
        InputKind::Fibonacci => {
            let n = (size_kb as u64 * 10).min(MAX_FIB_N) as u32;
            n.to_le_bytes().to_vec()
        }
        InputKind::RegexMatch => {
            let text_size = size.saturating_sub(4 + REGEX_PATTERN.len()).max(1);
            let mut data = Vec::with_capacity(4 + REGEX_PATTERN.len() + text_size);
            data.extend_from_slice(&(REGEX_PATTERN.len() as u32).to_le_bytes());
            data.extend_from_slice(REGEX_PATTERN);
            data.extend(random_text(&mut rng, text_size));
            data
        }
        InputKind::RegexReplace => {
            let header = 8 + REGEX_PATTERN.len() + REGEX_REPLACEMENT.len();
            let text_size = size.saturating_sub(header).max(1);
            let mut data = Vec::with_capacity(header + text_size);
            data.extend_from_slice(&(REGEX_PATTERN.len() as u32).to_le_bytes());
            data.extend_from_slice(&(REGEX_REPLACEMENT.len() as u32).to_le_bytes());
            data.extend_from_slice(REGEX_PATTERN);
            data.extend_from_slice(REGEX_REPLACEMENT);
            data.extend(random_text(&mut rng, text_size));
            data
        }
    };

    InputData {
        name: format!("{}_{}kb", benchmark, size_kb),
        data,
    }
}

fn random_bytes(rng: &mut StdRng, size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rng.fill(data.as_mut_slice());
    data
}

fn random_text(rng: &mut StdRng, size: usize) -> impl Iterator<Item = u8> + '_ {
    (0..size).map(move |_| TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())])
}

/// Space-separated words with an occasional `" \n"` line break.
fn word_text(rng: &mut StdRng, size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(size + 16);
    let mut first = true;

    while out.len() < size {
        if !first {
            out.push(b' ');
        }
        if let Some(word) = WORDS.choose(rng) {
            out.extend_from_slice(word.as_bytes());
        }
        first = false;

        if rng.gen_bool(0.1) {
            if out.len() >= size {
                break;
            }
            out.extend_from_slice(b" \n");
        }
    }

    out.truncate(size);
    out
}

fn byte_runs(rng: &mut StdRng, size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(size);

    while out.len() < size {
        let value: u8 = rng.gen();
        let run_len = rng.gen_range(1..=MAX_RUN_LEN.min(size - out.len()));
        out.resize(out.len() + run_len, value);
    }

    out
}
