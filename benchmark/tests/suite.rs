// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end suite runs against fake toolchains.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use perfcmp_bench::{
    BenchmarkHarness, BenchmarkReport, JsonReporter, ResultsTable, RunSettings, Suite,
    SummaryTable, OUTPUT_MISMATCH,
};
use perfcmp_core::{
    Backend, BenchmarkName, CBackend, CcProfile, Language, MemoryProbe, ProgramsDir, RustBackend,
    X07Backend, X07Mode, X07Settings,
};
use tempfile::TempDir;

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// Copies the source script to the `-o` path.
const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    -C) shift 2 ;;
    -*) shift ;;
    *) src="$1"; shift ;;
  esac
done
cp "$src" "$out" && chmod +x "$out"
"#;

/// Compiles by copying the program; `--artifact` runs return base64 "3".
const FAKE_HOST_RUNNER: &str = r#"#!/bin/sh
out=""
src=""
mode=compile
while [ $# -gt 0 ]; do
  case "$1" in
    --help) exit 0 ;;
    --program|--project) src="$2"; shift 2 ;;
    --compiled-out) out="$2"; shift 2 ;;
    --artifact) mode=run; shift 2 ;;
    *) shift ;;
  esac
done
if [ "$mode" = run ]; then
  printf '{"ok":true,"trap":null,"solve_output_b64":"Mw=="}'
  exit 0
fi
cp "$src" "$out" && chmod +x "$out"
printf '{"compile":{"ok":true,"compile_error":null}}'
"#;

const X07_FRAMED_3: &str = "#!/bin/sh\ncat >/dev/null\nprintf '\\001\\000\\000\\000'\nprintf 3\n";

fn write_script(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            dir: TempDir::new().unwrap(),
        };
        write_script(&ws.tool("cc"), FAKE_COMPILER);
        write_script(&ws.tool("rustc"), FAKE_COMPILER);
        write_script(&ws.tool("x07-host-runner"), FAKE_HOST_RUNNER);
        ws
    }

    fn tool(&self, name: &str) -> PathBuf {
        self.dir.path().join("bin").join(name)
    }

    fn program(&self, relative: &str, body: &str) {
        write_script(&self.dir.path().join("programs").join(relative), body);
    }

    fn suite(&self, mode: X07Mode) -> Suite {
        let backends: Vec<Box<dyn Backend>> = vec![
            Box::new(X07Backend::new(
                self.tool("x07-host-runner"),
                X07Settings {
                    mode,
                    ..X07Settings::default()
                },
            )),
            Box::new(CBackend::new(self.tool("cc"))),
            Box::new(RustBackend::new(self.tool("rustc"), self.tool("cargo"))),
        ];
        Suite::new(ProgramsDir::new(self.dir.path().join("programs")), backends)
            .unwrap()
            .harness(BenchmarkHarness::new().warmup(1).iterations(2))
            .probe(MemoryProbe::disabled())
    }
}

fn settings(mode: X07Mode) -> RunSettings {
    RunSettings {
        input_size_kb: 1,
        iterations: 2,
        warmup: 1,
        seed: 42,
        x07_mode: mode,
        x07_cc_profile: CcProfile::Default,
    }
}

#[test]
fn mixed_outcomes_are_recorded_per_backend() {
    let _guard = serial();
    let ws = Workspace::new();
    ws.program("x07/sum_bytes.x07.json", X07_FRAMED_3);
    ws.program("c/sum_bytes.c", "#!/bin/sh\ncat >/dev/null\nprintf 3\n");
    ws.program("rust/sum_bytes.rs", "#!/bin/sh\ncat >/dev/null\nprintf 4\n");
    // word_count: C crashes, Rust has no program at all
    ws.program("x07/word_count.x07.json", X07_FRAMED_3);
    ws.program("c/word_count.c", "#!/bin/sh\necho 'segfault' >&2\nexit 139\n");

    let suite = ws.suite(X07Mode::HostRunner);
    let names = vec![
        BenchmarkName::new("sum_bytes").unwrap(),
        BenchmarkName::new("word_count").unwrap(),
    ];
    let runs = suite.run_all(&names, 1, 42);
    assert_eq!(runs.len(), 2);

    let sum = &runs[0];
    let languages: Vec<Language> = sum.results.iter().map(|r| r.language).collect();
    assert_eq!(languages, vec![Language::X07, Language::C, Language::Rust]);

    let x07 = &sum.results[0];
    assert!(x07.success && x07.error.is_none());
    assert_eq!(x07.output, b"3");
    assert_eq!(x07.times.len(), 2);
    assert!(x07.build_size_bytes > 0);

    assert!(sum.results[1].success && sum.results[1].error.is_none());

    let rust = &sum.results[2];
    assert!(rust.success);
    assert_eq!(rust.error.as_deref(), Some(OUTPUT_MISMATCH));

    let words = &runs[1];
    assert_eq!(words.results.len(), 2);
    let c = &words.results[1];
    assert!(!c.success);
    assert_eq!(
        c.error.as_deref(),
        Some("C execution failed (exit 139): segfault")
    );

    let settings = settings(X07Mode::HostRunner);
    let table = ResultsTable::new(&runs, &settings).to_string();
    assert!(table.contains("X07 mode: host runner"));
    assert!(table.contains("WARN: Output mismatch with refe"));
    assert!(table.contains("FAIL: C execution failed (exit 139)"));

    let summary = SummaryTable::new(&runs).to_string();
    let word_row = summary
        .lines()
        .find(|l| l.starts_with("word_count"))
        .unwrap();
    assert!(word_row.contains("N/A"));
}

#[test]
fn direct_mode_report_round_trip() {
    let _guard = serial();
    let ws = Workspace::new();
    ws.program("x07/fibonacci.x07.json", X07_FRAMED_3);
    ws.program("c/fibonacci.c", "#!/bin/sh\ncat >/dev/null\nprintf 3\n");

    let suite = ws.suite(X07Mode::Direct);
    let runs = suite.run_all(&[BenchmarkName::new("fibonacci").unwrap()], 1, 42);
    assert!(runs[0].results.iter().all(|r| r.success && r.error.is_none()));

    let out = TempDir::new().unwrap();
    let reporter = JsonReporter::new(out.path()).unwrap();
    let report = BenchmarkReport::from_runs(settings(X07Mode::Direct), &runs);
    let path = reporter.save(&report).unwrap();

    let loaded = JsonReporter::load(&path).unwrap();
    assert_eq!(loaded.settings.x07_mode, X07Mode::Direct);
    let results = &loaded.benchmarks[0].results;
    assert_eq!(results[0].x07_cc_profile, Some(CcProfile::Default));
    assert_eq!(results[1].x07_cc_profile, None);
    assert_eq!(results[0].output_crc32, results[1].output_crc32);
    assert_eq!(results[0].output_bytes, 1);
    assert_eq!(reporter.list_reports().unwrap(), vec![path]);
}
