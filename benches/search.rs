//! Build and search throughput benchmarks for the HSG index.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use proxima::benchmark::create_clustered_dataset;
use proxima::hsg::{HSGIndex, HSGParams};

fn build_index<'a>(train: &'a [Vec<f32>], dimension: usize) -> HSGIndex<'a> {
    let mut index = HSGIndex::new(dimension, HSGParams::default());
    for (i, vector) in train.iter().enumerate() {
        index
            .insert(i as u64, vector)
            .expect("benchmark corpus inserts cleanly");
    }
    index
}

fn bench_build(c: &mut Criterion) {
    let dataset = create_clustered_dataset(1_000, 1, 32, 16, 0.05, 42);

    c.bench_function("hsg_build_1k_d32", |b| {
        b.iter(|| build_index(black_box(&dataset.train), dataset.dimension))
    });
}

fn bench_search(c: &mut Criterion) {
    let dataset = create_clustered_dataset(5_000, 100, 32, 16, 0.05, 42);
    let index = build_index(&dataset.train, dataset.dimension);

    let mut group = c.benchmark_group("hsg_search_5k_d32");
    for magnification in [0usize, 10, 40] {
        group.bench_with_input(
            BenchmarkId::new("magnification", magnification),
            &magnification,
            |b, &magnification| {
                let mut cursor = 0;
                b.iter(|| {
                    let query = &dataset.test[cursor % dataset.test.len()];
                    cursor += 1;
                    index
                        .search(black_box(query), 10, magnification)
                        .expect("search succeeds on a populated index")
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
