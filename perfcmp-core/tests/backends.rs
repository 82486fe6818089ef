// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Backend adapters driven against fake toolchains.
//!
//! Each fake compiler copies its "source" (a shell script) to the artifact
//! path, so the full compile, execute and framing paths run without a real
//! compiler installed.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use perfcmp_core::{
    Backend, BackendError, BenchmarkName, CBackend, CcProfile, MemoryProbe, Program, ProgramsDir,
    RustBackend, X07Backend, X07Mode, X07Settings,
};
use tempfile::TempDir;

/// Scripts are written and executed in the same process; running the tests
/// one at a time keeps a forked sibling from holding a script open for write.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

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
if grep -q COMPILE_ERROR "$src"; then
  echo "error: expected ';'" >&2
  exit 1
fi
cp "$src" "$out" && chmod +x "$out"
"#;

const FAKE_CARGO: &str = r#"#!/bin/sh
[ "$1" = build ] && [ "$2" = --release ] || exit 2
name=$(basename "$(pwd)")
mkdir -p target/release
cp main.sh "target/release/$name" && chmod +x "target/release/$name"
"#;

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
  printf '{"ok":true,"trap":null,"solve_output_b64":"b2s="}'
  exit 0
fi
if grep -q COMPILE_ERROR "$src"; then
  printf '{"compile":{"ok":false,"compile_error":"unknown symbol foo"}}'
  exit 0
fi
cp "$src" "$out.compiled-from"
cp artifact.sh "$out" && chmod +x "$out"
printf '{"compile":{"ok":true,"compile_error":null}}'
"#;

/// Direct-execution artifact: reads a frame, answers with the frame `ok`.
const FRAMED_ARTIFACT: &str = "#!/bin/sh\ncat >/dev/null\nprintf '\\002\\000\\000\\000ok'\n";

const NATIVE_OK: &str = "#!/bin/sh\ncat >/dev/null\nprintf ok\n";

fn write_script(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        write_script(&fixture.tool("cc"), FAKE_COMPILER);
        write_script(&fixture.tool("rustc"), FAKE_COMPILER);
        write_script(&fixture.tool("cargo"), FAKE_CARGO);
        write_script(&fixture.tool("x07-host-runner"), FAKE_HOST_RUNNER);
        write_script(&fixture.tool("artifact.sh"), FRAMED_ARTIFACT);
        fixture
    }

    fn tool(&self, name: &str) -> PathBuf {
        self.dir.path().join("bin").join(name)
    }

    fn programs(&self) -> ProgramsDir {
        ProgramsDir::new(self.dir.path().join("programs"))
    }

    fn program(&self, relative: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join("programs").join(relative);
        write_script(&path, body);
        path
    }

    fn artifact(&self, name: &str) -> PathBuf {
        let dir = self.dir.path().join("out");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn x07(&self, mode: X07Mode) -> X07Backend {
        X07Backend::new(
            self.tool("x07-host-runner"),
            X07Settings {
                mode,
                cc_profile: CcProfile::Size,
                ..X07Settings::default()
            },
        )
    }
}

fn bench(name: &str) -> BenchmarkName {
    BenchmarkName::new(name).unwrap()
}

#[test]
fn c_program_compiles_and_runs() {
    let _guard = serial();
    let fx = Fixture::new();
    fx.program("c/sum_bytes.c", NATIVE_OK);

    let backend = CBackend::new(fx.tool("cc"));
    let program = backend.locate(&fx.programs(), &bench("sum_bytes")).unwrap();
    let artifact = fx.artifact("sum_bytes_c");

    backend.compile(&program, &artifact).unwrap();
    assert!(artifact.is_file());

    let exec = backend.run(&artifact, &[7u8; 2048]).unwrap();
    assert_eq!(exec.output, b"ok");
    assert_eq!(exec.peak_rss_kb, 0);

    let probe = MemoryProbe::detect();
    let probed = backend.probe_run(&artifact, b"", &probe).unwrap();
    assert_eq!(probed.output, b"ok");
    if probe.is_enabled() {
        assert!(probed.peak_rss_kb > 0);
    }
}

#[test]
fn compiler_diagnostics_are_kept() {
    let _guard = serial();
    let fx = Fixture::new();
    fx.program("c/word_count.c", "COMPILE_ERROR\n");

    let backend = CBackend::new(fx.tool("cc"));
    let program = backend.locate(&fx.programs(), &bench("word_count")).unwrap();
    let err = backend
        .compile(&program, &fx.artifact("word_count_c"))
        .unwrap_err();

    assert_eq!(err.to_string(), "C compilation failed: error: expected ';'");
}

#[test]
fn missing_compiler_is_a_spawn_error() {
    let _guard = serial();
    let fx = Fixture::new();
    fx.program("c/sum_bytes.c", NATIVE_OK);

    let backend = CBackend::new(fx.tool("no-such-cc"));
    let program = backend.locate(&fx.programs(), &bench("sum_bytes")).unwrap();
    let err = backend
        .compile(&program, &fx.artifact("sum_bytes_c"))
        .unwrap_err();

    assert!(matches!(err, BackendError::Spawn { .. }));
}

#[test]
fn non_zero_exit_is_surfaced() {
    let _guard = serial();
    let fx = Fixture::new();
    fx.program("rust/byte_freq.rs", "#!/bin/sh\necho 'panicked at main' >&2\nexit 101\n");

    let backend = RustBackend::new(fx.tool("rustc"), fx.tool("cargo"));
    let program = backend.locate(&fx.programs(), &bench("byte_freq")).unwrap();
    let artifact = fx.artifact("byte_freq_rust");
    backend.compile(&program, &artifact).unwrap();

    match backend.run(&artifact, b"input").unwrap_err() {
        BackendError::NonZeroExit { code, stderr, .. } => {
            assert_eq!(code, "101");
            assert_eq!(stderr, "panicked at main");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cargo_project_takes_priority() {
    let _guard = serial();
    let fx = Fixture::new();
    fx.program("rust/regex_count.rs", "#!/bin/sh\nprintf single\n");
    fx.program("rust_cargo/regex_count/Cargo.toml", "[package]\nname = \"regex_count\"\n");
    fx.program("rust_cargo/regex_count/main.sh", "#!/bin/sh\nprintf cargo\n");

    let backend = RustBackend::new(fx.tool("rustc"), fx.tool("cargo"));
    let program = backend.locate(&fx.programs(), &bench("regex_count")).unwrap();
    assert!(matches!(program, Program::CargoProject(_)));

    let artifact = fx.artifact("regex_count_rust");
    backend.compile(&program, &artifact).unwrap();
    assert_eq!(backend.run(&artifact, b"").unwrap().output, b"cargo");
}

#[test]
fn x07_host_runner_and_direct_modes() {
    let _guard = serial();
    let fx = Fixture::new();
    let source = fx.program("x07/fibonacci.x07.json", "{\"module\": \"fib\"}\n");

    let cached = fx.x07(X07Mode::HostRunner);
    let program = cached.locate(&fx.programs(), &bench("fibonacci")).unwrap();
    assert_eq!(program, Program::SourceFile(source.clone()));

    let artifact = fx.artifact("fibonacci_x07");
    cached.compile(&program, &artifact).unwrap();
    assert_eq!(
        fs::read_to_string(artifact.with_extension("compiled-from")).unwrap(),
        fs::read_to_string(&source).unwrap()
    );

    // Measured runs go through the runner and decode its base64 output
    assert_eq!(cached.run(&artifact, &[10, 0, 0, 0]).unwrap().output, b"ok");
    // The probe run always executes the artifact with framed I/O
    let probed = cached
        .probe_run(&artifact, &[10, 0, 0, 0], &MemoryProbe::disabled())
        .unwrap();
    assert_eq!(probed.output, b"ok");

    let direct = fx.x07(X07Mode::Direct);
    assert_eq!(direct.run(&artifact, &[10, 0, 0, 0]).unwrap().output, b"ok");
}

#[test]
fn x07_compile_error_from_report() {
    let _guard = serial();
    let fx = Fixture::new();
    fx.program("x07/sum_bytes.x07.json", "COMPILE_ERROR\n");

    let backend = fx.x07(X07Mode::Direct);
    let program = backend.locate(&fx.programs(), &bench("sum_bytes")).unwrap();
    let err = backend
        .compile(&program, &fx.artifact("sum_bytes_x07"))
        .unwrap_err();

    assert_eq!(err.to_string(), "X07 compilation failed: unknown symbol foo");
}

#[test]
fn x07_project_entry_is_restored() {
    let _guard = serial();
    let fx = Fixture::new();
    let original = "{\"entry\": \"src/main.x07.json\", \"name\": \"regex\"}";
    let manifest = fx.program("projects/regex/x07.json", original);

    let backend = fx.x07(X07Mode::Direct);
    let program = backend.locate(&fx.programs(), &bench("regex_replace")).unwrap();
    assert!(matches!(program, Program::X07Project { .. }));

    let artifact = fx.artifact("regex_replace_x07");
    backend.compile(&program, &artifact).unwrap();

    let compiled: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(artifact.with_extension("compiled-from")).unwrap(),
    )
    .unwrap();
    assert_eq!(compiled["entry"], "src/replace.x07.json");
    assert_eq!(compiled["name"], "regex");
    assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
}
