//! Proxy vs exact identity throughput across image sizes.

use std::fs;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use imgid_core::{IdentityDeriver, SourceLocation, TransformConfig};

const SIZES: &[(&str, usize)] = &[
    ("100kb", 100 * 1024),
    ("350kb", 350 * 1024),
    ("500kb", 500 * 1024),
    ("1mb", 1024 * 1024),
    ("2.5mb", 5 * 512 * 1024),
    ("5mb", 5 * 1024 * 1024),
    ("11mb", 11 * 1024 * 1024),
];

fn bench_identity(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let deriver = IdentityDeriver::new(dir.path());
    let config = TransformConfig::new();

    let fixtures: Vec<_> = SIZES
        .iter()
        .map(|&(name, len)| {
            let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let file = dir.path().join(format!("{name}.png"));
            fs::write(&file, &bytes).expect("write fixture");
            (name, SourceLocation::from_path(file), bytes)
        })
        .collect();

    let (_, base_loc, base_bytes) = &fixtures[2];
    let mut base = c.benchmark_group("base_500kb");
    base.bench_function("proxy", |b| {
        b.iter(|| deriver.proxy_identity(black_box(base_loc), &config).expect("proxy"))
    });
    base.bench_function("exact", |b| {
        b.iter(|| {
            deriver
                .exact_identity(black_box(base_loc), &config, black_box(base_bytes))
                .expect("exact")
        })
    });
    base.finish();

    let mut exact = c.benchmark_group("exact_by_size");
    for (name, loc, bytes) in &fixtures {
        exact.throughput(Throughput::Bytes(bytes.len() as u64));
        exact.bench_with_input(BenchmarkId::from_parameter(name), bytes, |b, bytes| {
            b.iter(|| deriver.exact_identity(loc, &config, black_box(bytes)).expect("exact"))
        });
    }
    exact.finish();
}

criterion_group!(benches, bench_identity);
criterion_main!(benches);
