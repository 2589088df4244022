//! Manifest parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use clyde_benchmarks::criterion_config;
use clyde_config::manifest::parse_manifest;

fn manifest_with_requirements(count: usize) -> String {
    let mut body = String::from(
        "[package]\nname = \"@bench/app\"\nversion = \"1.0.0\"\ntype = \"application\"\nlanguage = \"c\"\n\n[requires]\n",
    );
    for i in 0..count {
        body.push_str(&format!("\"@bench/lib{}\" = \">=1.{}.0 <2.0.0\"\n", i, i));
    }
    body.push_str("\n[variants.embedded.requires]\nlwip = \"=2.1.3\"\n");
    body
}

/// Benchmark parsing and validation of manifests
fn bench_parse_manifest(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_manifest");

    for count in [0, 10, 100] {
        let content = manifest_with_requirements(count);
        group.bench_with_input(BenchmarkId::new("requirements", count), &content, |b, content| {
            b.iter(|| black_box(parse_manifest(content).unwrap()));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_parse_manifest
}
criterion_main!(benches);
