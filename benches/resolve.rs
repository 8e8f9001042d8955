//! Benchmarks for component resolution and generation.
//!
//! These benchmarks measure pattern resolution against component directories
//! of various sizes, and a full generation run over plain data components.

use std::fs;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kosko::environment::Environment;
use kosko::generate::{generate_blocking, GenerateOptions};
use kosko::loader::Runtime;
use kosko::resolve::resolve;
use tempfile::TempDir;

/// Creates a components directory with `num_files` JSON files and as many
/// directory components.
fn create_components(num_files: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for i in 0..num_files {
        fs::write(
            dir.path().join(format!("file{}.json", i)),
            format!(r#"{{"kind": "ConfigMap", "metadata": {{"name": "file{}"}}}}"#, i),
        )
        .unwrap();
        let nested = dir.path().join(format!("dir{}", i));
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("index.yaml"), format!("kind: Service\nname: dir{}\n", i)).unwrap();
    }
    dir
}

fn extensions() -> Vec<String> {
    Runtime::builtin().extensions()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let extensions = extensions();

    for size in [10, 100, 500] {
        let dir = create_components(size);

        group.bench_with_input(BenchmarkId::new("wildcard", size), &dir, |b, dir| {
            b.iter(|| resolve(dir.path(), black_box("*"), &extensions).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("prefix", size), &dir, |b, dir| {
            b.iter(|| resolve(dir.path(), black_box("file1*"), &extensions).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("bare_name", size), &dir, |b, dir| {
            b.iter(|| resolve(dir.path(), black_box("dir0"), &extensions).unwrap())
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let runtime = Runtime::builtin();

    for size in [10, 100] {
        let dir = create_components(size);
        let env = Environment::new(dir.path());
        let options = GenerateOptions::new(dir.path(), ["*"]);

        group.bench_with_input(BenchmarkId::new("data", size), &options, |b, options| {
            b.iter(|| generate_blocking(black_box(options), &runtime, &env).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_generate);
criterion_main!(benches);
