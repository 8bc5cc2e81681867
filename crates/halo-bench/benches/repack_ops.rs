//! Criterion micro-benchmarks for component gather/scatter.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use halo_bench::{d3q19_profile, seeded_field};
use halo_exchange::repack::{gather, scatter};

fn bench_gather_d3q19(c: &mut Criterion) {
    let config = d3q19_profile();
    let grid = config.validate().unwrap();
    let q = config.components;
    let field = seeded_field(&grid, q, 42);
    let mut scratch = vec![0.0; grid.padded_voxels()];

    c.bench_function("gather_d3q19_all_components", |b| {
        b.iter(|| {
            for a in 0..q {
                gather(&grid, q, a, &field, &mut scratch).unwrap();
            }
            black_box(scratch[0]);
        });
    });
}

fn bench_gather_scatter_d3q19(c: &mut Criterion) {
    let config = d3q19_profile();
    let grid = config.validate().unwrap();
    let q = config.components;
    let mut field = seeded_field(&grid, q, 42);
    let mut scratch = vec![0.0; grid.padded_voxels()];

    c.bench_function("gather_scatter_d3q19_all_components", |b| {
        b.iter(|| {
            for a in 0..q {
                gather(&grid, q, a, &field, &mut scratch).unwrap();
                scatter(&grid, q, a, &scratch, &mut field).unwrap();
            }
            black_box(field[0]);
        });
    });
}

criterion_group!(benches, bench_gather_d3q19, bench_gather_scatter_d3q19);
criterion_main!(benches);
