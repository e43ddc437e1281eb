//! Integration tests for the HNSW index

use ndarray::{array, Array2};
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use tempfile::TempDir;

use hnsw_from_scratch::{
    DistanceMetric, FlatIndex, HnswError, HnswIndex, HnswParams, NearestNeighbors,
};

fn params() -> HnswParams {
    HnswParams::new(16, 200, 50)
}

#[test]
fn test_self_query_corner_points() {
    let data = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    let index = HnswIndex::build(data.view(), params()).unwrap();

    let results = index.k_nearest_neighbors(&[0.0, 0.0], 1, 50).unwrap();
    assert_eq!(results, vec![(0, 0.0)]);
}

#[test]
fn test_two_points() {
    let data = array![[0.0, 0.0], [3.0, 4.0]];
    let index = HnswIndex::build(data.view(), params()).unwrap();

    assert_eq!(
        index.k_nearest_neighbors(&[0.0, 0.0], 1, 50).unwrap(),
        vec![(0, 0.0)]
    );
    assert_eq!(
        index.k_nearest_neighbors(&[0.0, 0.0], 2, 50).unwrap(),
        vec![(0, 0.0), (1, 5.0)]
    );
}

#[test]
fn test_single_point() {
    let data = array![[2.5, -1.0]];
    let index = HnswIndex::build(data.view(), params()).unwrap();

    for (query, k) in [([2.5, -1.0], 1), ([0.0, 0.0], 3), ([100.0, 7.0], 10)] {
        let results = index.k_nearest_neighbors(&query, k, 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 0);
    }
    assert_eq!(
        index.k_nearest_neighbors(&[5.5, 3.0], 1, 1).unwrap(),
        vec![(0, 5.0)]
    );
}

#[test]
fn test_empty_dataset() {
    let data = Array2::<f64>::zeros((0, 4));
    let index = HnswIndex::build(data.view(), params()).unwrap();
    assert!(index.is_empty());
    assert!(index
        .k_nearest_neighbors(&[1.0, 2.0, 3.0, 4.0], 3, 10)
        .unwrap()
        .is_empty());
    assert!(matches!(
        index.k_nearest_neighbors(&[1.0], 3, 10),
        Err(HnswError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_result_shape() {
    let mut rng = StdRng::seed_from_u64(11);
    let data = Array2::random_using((33, 3), Uniform::new(-1.0, 1.0), &mut rng);
    let index = HnswIndex::build(data.view(), params()).unwrap();

    let query = vec![0.1; 3];
    for k in [1, 5, 20, 33, 100] {
        let results = index.k_nearest_neighbors(&query, k, 10).unwrap();
        assert_eq!(results.len(), k.min(33), "k = {}", k);

        let mut ids: Vec<usize> = results.iter().map(|r| r.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), results.len(), "duplicate ids for k = {}", k);

        for w in results.windows(2) {
            assert!(w[0].1 <= w[1].1);
        }
    }
}

#[test]
fn test_incremental_insert_matches_build() {
    let mut rng = StdRng::seed_from_u64(3);
    let data = Array2::random_using((150, 5), Uniform::new(0.0, 1.0), &mut rng);
    let built = HnswIndex::build(data.view(), params()).unwrap();

    let mut incremental = HnswIndex::new(5, params()).unwrap();
    for row in data.outer_iter() {
        incremental.insert(&row.to_vec()).unwrap();
    }

    assert_eq!(built.graph(), incremental.graph());
    assert_eq!(built.entry_point(), incremental.entry_point());
}

#[test]
fn test_search_batch_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(21);
    let data = Array2::random_using((500, 12), Uniform::new(0.0, 1.0), &mut rng);
    let queries = Array2::random_using((40, 12), Uniform::new(0.0, 1.0), &mut rng);
    let index = HnswIndex::build(data.view(), params()).unwrap();

    let batch = index.search_batch(queries.view(), 5, 40).unwrap();
    assert_eq!(batch.len(), 40);
    for (row, found) in queries.outer_iter().zip(&batch) {
        let expected = index.k_nearest_neighbors(&row.to_vec(), 5, 40).unwrap();
        assert_eq!(&expected, found);
    }

    let bad = Array2::<f64>::zeros((2, 3));
    assert!(index.search_batch(bad.view(), 5, 40).is_err());
}

#[test]
fn test_stats() {
    let mut rng = StdRng::seed_from_u64(8);
    let data = Array2::random_using((1000, 4), Uniform::new(0.0, 1.0), &mut rng);
    let index = HnswIndex::build(data.view(), HnswParams::new(8, 64, 32)).unwrap();

    let stats = index.stats();
    assert_eq!(stats.points, 1000);
    assert_eq!(stats.layers.len(), index.num_layers());
    assert!(stats.layers.len() >= 2);
    assert_eq!(stats.level_histogram().iter().sum::<usize>(), 1000);
    for layer in &stats.layers {
        assert!(layer.max_degree <= index.graph().max_degree(layer.layer));
    }
    for w in stats.layers.windows(2) {
        assert!(w[0].points >= w[1].points);
    }
    assert_eq!(stats.layers[0].isolated, 0);
}

#[test]
fn test_snapshot_roundtrip_on_disk() {
    let mut rng = StdRng::seed_from_u64(5);
    let data = Array2::random_using((300, 6), Uniform::new(0.0, 1.0), &mut rng);
    let index = HnswIndex::build(data.view(), params()).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.hnsw");
    index.save(&path).unwrap();
    let loaded = HnswIndex::load(&path).unwrap();

    let query = [0.5; 6];
    assert_eq!(
        index.k_nearest_neighbors(&query, 10, 64).unwrap(),
        loaded.k_nearest_neighbors(&query, 10, 64).unwrap()
    );
}

#[test]
fn test_different_metrics_self_match() {
    let data = array![[1.0, 2.0, 3.0], [-3.0, 0.5, 1.0], [0.0, -2.0, 4.0]];
    for metric in [
        DistanceMetric::Euclidean,
        DistanceMetric::SquaredEuclidean,
        DistanceMetric::Cosine,
    ] {
        let index = HnswIndex::build_with_distance(data.view(), params(), metric).unwrap();
        let results = index.k_nearest_neighbors(&[1.0, 2.0, 3.0], 1, 10).unwrap();
        assert_eq!(results[0].0, 0, "metric {:?}", metric);

        let flat = FlatIndex::new(data.clone(), metric);
        assert_eq!(flat.search(&[1.0, 2.0, 3.0], 1).unwrap()[0].0, 0);
    }
}
