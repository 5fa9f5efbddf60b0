//! Benchmarks for projection and similarity search.
//!
//! Run with: cargo bench --bench similarity_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use neuroprobe_analysis::{aggregate, top_k_with_config, SearchConfig};
use neuroprobe_core::{Image, Selection, WeightStore, IMAGE_SIZE};
use neuroprobe_data::ImageCorpus;
use neuroprobe_explain::Projector;

/// Create a synthetic corpus of `n` images with pixel values in [0, 1).
fn create_corpus(n: usize) -> Vec<Vec<f32>> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..n)
        .map(|_| (0..IMAGE_SIZE).map(|_| rng.gen::<f32>()).collect())
        .collect()
}

fn create_store(n_hidden: usize, n_classes: usize) -> WeightStore {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let w1 = Array2::from_shape_fn((IMAGE_SIZE, n_hidden), |_| rng.gen_range(-0.1..0.1));
    let w2 = Array2::from_shape_fn((n_hidden, n_classes), |_| rng.gen_range(-0.1..0.1));
    WeightStore::new(w1, Array1::zeros(n_hidden), w2, Array1::zeros(n_classes)).unwrap()
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");
    group.sample_size(20);

    let query = Image::from_values(create_corpus(1).remove(0));
    let sequential = SearchConfig {
        parallel_threshold: usize::MAX,
    };
    let parallel = SearchConfig {
        parallel_threshold: 1,
    };

    for n in [1_000usize, 10_000, 60_000] {
        let rows = create_corpus(n);
        let corpus = ImageCorpus::from_rows(rows.clone()).unwrap();

        group.bench_with_input(BenchmarkId::new("matrix_sequential", n), &n, |b, _| {
            b.iter(|| black_box(top_k_with_config(&query, &corpus, 10, &sequential).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("matrix_parallel", n), &n, |b, _| {
            b.iter(|| black_box(top_k_with_config(&query, &corpus, 10, &parallel).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("rows_parallel", n), &n, |b, _| {
            b.iter(|| black_box(top_k_with_config(&query, &rows, 10, &parallel).unwrap()))
        });
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for n_hidden in [32usize, 128, 512] {
        let store = create_store(n_hidden, 10);
        let projector = Projector::new(&store);
        let selection = Selection::all(n_hidden);

        group.bench_with_input(BenchmarkId::new("project_all", n_hidden), &n_hidden, |b, _| {
            b.iter(|| black_box(projector.project(&selection, None, false).unwrap()))
        });
        group.bench_with_input(
            BenchmarkId::new("feature_encodings", n_hidden),
            &n_hidden,
            |b, _| b.iter(|| black_box(projector.feature_encodings())),
        );
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let corpus = ImageCorpus::from_rows(create_corpus(1_000)).unwrap();
    let query = Image::from_values(create_corpus(1).remove(0));
    let results = top_k_with_config(&query, &corpus, 100, &SearchConfig::default()).unwrap();

    c.bench_function("aggregate_100", |b| {
        b.iter(|| black_box(aggregate(black_box(&results)).unwrap()))
    });
}

criterion_group!(benches, bench_top_k, bench_projection, bench_aggregate);
criterion_main!(benches);
