//! HNSW vs brute-force benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use hnsw_from_scratch::{DistanceMetric, FlatIndex, HnswIndex, HnswParams, NearestNeighbors};

fn create_random_vectors(n: usize, dim: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::random_using((n, dim), Uniform::new(0.0, 1.0), &mut rng)
}

fn benchmark_hnsw_vs_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_vs_flat");
    group.sample_size(20);

    for &size in &[1_000, 10_000] {
        let dim = 128;
        let data = create_random_vectors(size, dim, 1);
        let query = vec![0.5; dim];

        let flat = FlatIndex::new(data.clone(), DistanceMetric::Euclidean);
        let hnsw = HnswIndex::build(data.view(), HnswParams::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("flat", size), &size, |b, _| {
            b.iter(|| flat.search(black_box(&query), black_box(10)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("hnsw", size), &size, |b, _| {
            b.iter(|| {
                hnsw.k_nearest_neighbors(black_box(&query), black_box(10), 50)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_hnsw_ef(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_ef");
    let data = create_random_vectors(10_000, 64, 2);
    let queries = create_random_vectors(100, 64, 3);
    let hnsw = HnswIndex::build(data.view(), HnswParams::default()).unwrap();

    for &ef in &[10, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(ef), &ef, |b, &ef| {
            b.iter(|| hnsw.search_batch(black_box(queries.view()), 10, ef).unwrap());
        });
    }

    group.finish();
}

fn benchmark_hnsw_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnsw_insert");
    group.sample_size(10);

    let data = create_random_vectors(1_000, 128, 4);

    group.bench_function("insert_1000_128d", |b| {
        b.iter(|| HnswIndex::build(black_box(data.view()), HnswParams::default()).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_hnsw_vs_flat,
    benchmark_hnsw_ef,
    benchmark_hnsw_insert
);
criterion_main!(benches);
