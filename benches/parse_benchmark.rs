use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::PathBuf;
use swift_build::cli;
use swift_build::lock::{LockFile, PackageLock};
use swift_build::toolchain::{CompilerType, Toolchain};

const ARGS: &[&str] = &[
    "-c",
    "release",
    "-vv",
    "-C",
    "Packages/dealer",
    "-Xcc",
    "-I/opt/include",
    "-Xcc",
    "-DNDEBUG=1",
    "-Xlinker",
    "-rpath=/opt/lib",
    "-Xswiftc",
    "-enable-testing",
];

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize", |b| b.iter(|| cli::tokenize(black_box(ARGS))));
}

fn bench_parse(c: &mut Criterion) {
    let toolchain = Toolchain::new_simple(
        CompilerType::Clang,
        PathBuf::from("/usr/bin/clang"),
        None,
        "bench".to_string(),
    );
    c.bench_function("parse_build_invocation", |b| {
        b.iter(|| cli::parse(black_box(ARGS), || Ok(toolchain.clone())).unwrap())
    });
}

fn bench_lockfile_json(c: &mut Criterion) {
    let lock = LockFile {
        packages: (0..32)
            .map(|i| PackageLock {
                clone: format!("Packages/Dep{i}-1.0.0"),
                origin: format!("https://github.com/example/Dep{i}"),
                reference: "1.0.0".to_string(),
                sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
            })
            .collect(),
    };
    c.bench_function("lockfile_to_json", |b| b.iter(|| black_box(&lock).to_json().unwrap()));
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_lockfile_json);
criterion_main!(benches);
