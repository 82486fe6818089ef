// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Input generation and framing microbenchmarks.
//!
//! Input synthesis runs once per benchmark before any backend is timed, so
//! it must stay cheap even at large `--size` values.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use perfcmp_bench::TimingStats;
use perfcmp_core::framing::{decode_frame, encode_frame};
use perfcmp_core::{generate_input, BenchmarkName};
use std::time::Duration;

/// Input sizes to benchmark (in KiB).
const SIZES_KB: &[u32] = &[1, 100, 1024];

/// Benchmark generation of every known input shape.
fn bench_generate_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_input");
    group.measurement_time(Duration::from_secs(5));

    for name in BenchmarkName::known() {
        for &size_kb in SIZES_KB {
            group.throughput(Throughput::Bytes(u64::from(size_kb) * 1024));
            group.bench_with_input(
                BenchmarkId::new(name.as_str(), size_kb),
                &size_kb,
                |b, &size_kb| {
                    b.iter(|| generate_input(black_box(&name), size_kb, 42));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark length-prefixed framing of direct-execution payloads.
fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");

    for &size_kb in SIZES_KB {
        let payload = vec![0xABu8; size_kb as usize * 1024];
        let framed = encode_frame(&payload).expect("payload fits in a frame");
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", size_kb), &payload, |b, payload| {
            b.iter(|| encode_frame(black_box(payload)))
        });
        group.bench_with_input(BenchmarkId::new("decode", size_kb), &framed, |b, framed| {
            b.iter(|| decode_frame(black_box(framed)).map(<[u8]>::len))
        });
    }

    group.finish();
}

/// Benchmark timing statistics over typical sample counts.
fn bench_timing_stats(c: &mut Criterion) {
    let samples: Vec<Duration> = (1..=1000).map(Duration::from_micros).collect();

    c.bench_function("timing_stats_1000", |b| {
        b.iter(|| TimingStats::from_samples(black_box(&samples)))
    });
}

criterion_group!(benches, bench_generate_input, bench_framing, bench_timing_stats);
criterion_main!(benches);
