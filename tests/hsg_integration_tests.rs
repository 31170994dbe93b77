//! End-to-end tests for the HSG index.

use proxima::benchmark::{compute_ground_truth, create_benchmark_dataset, recall_at_k};
use proxima::distance::Metric;
use proxima::hsg::{HSGIndex, HSGParams, SENTINEL_ID};
use proxima::IndexError;

fn unit_square_params() -> HSGParams {
    HSGParams {
        metric: Metric::Euclidean2,
        short_edge_lower_limit: 2,
        magnification: 0,
        cover_range: 2,
        ..HSGParams::default()
    }
}

/// Four corners of the unit square, ids 1..=4.
fn unit_square_index(corners: &[Vec<f32>]) -> HSGIndex<'_> {
    let mut index = HSGIndex::new(2, unit_square_params());
    for (i, v) in corners.iter().enumerate() {
        index.insert(i as u64 + 1, v).expect("corner inserts cleanly");
    }
    index.validate().expect("unit square graph is well-formed");
    index
}

fn unit_square_corners() -> Vec<Vec<f32>> {
    vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
    ]
}

#[test]
fn unit_square_near_corner_query() {
    let corners = unit_square_corners();
    let index = unit_square_index(&corners);

    let results = index.search(&[0.1, 0.1], 2, 0).unwrap();
    assert_eq!(results.len(), 2);

    // (0,0) is closest; (1,0) and (0,1) tie at 0.82 and the earlier insert wins.
    assert_eq!(results[0].0, 1);
    assert!((results[0].1 - 0.02).abs() < 1e-6);
    assert_eq!(results[1].0, 2);
    assert!((results[1].1 - 0.82).abs() < 1e-6);
}

#[test]
fn unit_square_center_query_returns_everything() {
    let corners = unit_square_corners();
    let index = unit_square_index(&corners);

    let results = index.search(&[0.5, 0.5], 4, 0).unwrap();
    assert_eq!(results.len(), 4);

    let mut ids: Vec<u64> = results.iter().map(|&(id, _)| id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    for &(_, distance) in &results {
        assert!((distance - 0.5).abs() < 1e-6);
    }
}

#[test]
fn recall_against_brute_force() {
    let dataset = create_benchmark_dataset(100, 20, 3, 42);
    let params = HSGParams {
        metric: Metric::Euclidean2,
        short_edge_lower_limit: 3,
        magnification: 2,
        cover_range: 3,
        ..HSGParams::default()
    };

    let mut index = HSGIndex::new(3, params);
    for (i, v) in dataset.train.iter().enumerate() {
        index.insert(i as u64, v).unwrap();
    }
    index.validate().unwrap();

    let k = 10;
    let mut total_recall = 0.0;
    for query in &dataset.test {
        let truth = compute_ground_truth(query, &dataset.train, k, Metric::Euclidean2);
        let results = index.search(query, k, 20).unwrap();
        let retrieved: Vec<u64> = results.iter().map(|&(id, _)| id).collect();
        total_recall += recall_at_k(&truth, &retrieved, k);
    }
    let mean_recall = total_recall / dataset.n_test() as f32;
    assert!(
        mean_recall >= 0.9,
        "recall@10 over {} queries was {mean_recall}",
        dataset.n_test()
    );
}

#[test]
fn dimension_mismatch_leaves_graph_unchanged() {
    let dataset = create_benchmark_dataset(10, 0, 4, 1);
    let mut index = HSGIndex::new(4, HSGParams::default());
    for (i, v) in dataset.train.iter().enumerate() {
        index.insert(i as u64, v).unwrap();
    }

    let err = index.search(&[], 3, 0).unwrap_err();
    assert_eq!(
        err,
        IndexError::DimensionMismatch {
            expected: 4,
            actual: 0
        }
    );
    assert_eq!(index.len(), 10);
    index.validate().unwrap();
}

#[test]
fn duplicate_id_is_rejected_without_partial_edges() {
    let first = vec![0.25_f32, 0.75];
    let again = vec![0.5_f32, 0.5];
    let mut index = HSGIndex::new(2, unit_square_params());

    index.insert(7, &first).unwrap();
    let err = index.insert(7, &again).unwrap_err();
    assert_eq!(err, IndexError::DuplicateId(7));
    assert_eq!(index.len(), 1);
    index.validate().unwrap();
}

#[test]
fn sentinel_id_is_reserved() {
    let v = vec![1.0_f32, 2.0];
    let mut index = HSGIndex::new(2, HSGParams::default());
    assert_eq!(
        index.insert(SENTINEL_ID, &v),
        Err(IndexError::DuplicateId(SENTINEL_ID))
    );
    assert!(index.is_empty());
}

#[test]
fn empty_payload_is_rejected() {
    let mut index = HSGIndex::new(2, HSGParams::default());
    assert_eq!(index.insert(0, &[]), Err(IndexError::NullData));
    let short = vec![1.0_f32];
    assert_eq!(
        index.insert(0, &short),
        Err(IndexError::DimensionMismatch {
            expected: 2,
            actual: 1
        })
    );
    assert!(index.is_empty());
}

#[test]
fn single_insert_bootstraps_from_the_sentinel() {
    let v = vec![0.3_f32, 0.4];
    let mut index = HSGIndex::new(2, HSGParams::default());
    index.insert(42, &v).unwrap();
    index.validate().unwrap();

    // The lone node has no short edges yet it is still reachable and found.
    assert_eq!(index.short_edge_degree(42), Ok(0));
    let results = index.search(&[0.0, 0.0], 1, 0).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, 42);
    assert!((results[0].1 - 0.25).abs() < 1e-6);
}

#[test]
fn exact_duplicate_payload_is_found_at_distance_zero() {
    let dataset = create_benchmark_dataset(30, 0, 4, 9);
    let mut index = HSGIndex::new(4, HSGParams::default());
    for (i, v) in dataset.train.iter().enumerate() {
        index.insert(i as u64, v).unwrap();
    }

    let copy = dataset.train[12].clone();
    index.insert(1000, &copy).unwrap();
    index.validate().unwrap();

    let results = index.search(&copy, 1, 1).unwrap();
    assert!((results[0].1).abs() < 1e-6);
    let found: Vec<u64> = results.iter().map(|&(id, _)| id).collect();
    assert!(found.contains(&12) && found.contains(&1000));
}

#[test]
fn k_larger_than_index_returns_all_live_nodes() {
    let dataset = create_benchmark_dataset(7, 0, 3, 5);
    let mut index = HSGIndex::new(3, HSGParams::default());
    for (i, v) in dataset.train.iter().enumerate() {
        index.insert(i as u64, v).unwrap();
    }

    let results = index.search(&[0.5, 0.5, 0.5], 50, 0).unwrap();
    assert_eq!(results.len(), 7);
    let mut ids: Vec<u64> = results.iter().map(|&(id, _)| id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..7).collect::<Vec<u64>>());
}

#[test]
fn search_on_empty_index_fails() {
    let index = HSGIndex::new(2, HSGParams::default());
    assert_eq!(index.search(&[0.0, 0.0], 1, 0), Err(IndexError::EmptyIndex));
}

#[test]
fn streaming_inserts_keep_every_invariant() {
    let dataset = create_benchmark_dataset(300, 0, 8, 77);
    let params = HSGParams {
        short_edge_lower_limit: 4,
        magnification: 4,
        cover_range: 2,
        ..HSGParams::default()
    };
    let mut index = HSGIndex::new(8, params);
    for (i, v) in dataset.train.iter().enumerate() {
        index.insert(i as u64, v).unwrap();
        if i % 50 == 49 {
            index.validate().unwrap();
        }
    }
    assert_eq!(index.len(), 300);
    index.validate().unwrap();
}

#[test]
fn search_is_deterministic() {
    let dataset = create_benchmark_dataset(120, 5, 6, 3);
    let mut index = HSGIndex::new(6, HSGParams::default());
    for (i, v) in dataset.train.iter().enumerate() {
        index.insert(i as u64, v).unwrap();
    }

    for query in &dataset.test {
        let a = index.search(query, 5, 5).unwrap();
        let b = index.search(query, 5, 5).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn payloads_longer_than_dimension_use_the_prefix() {
    let long_a = vec![0.0_f32, 0.0, 99.0, 99.0];
    let long_b = vec![1.0_f32, 0.0, -5.0];
    let mut index = HSGIndex::new(2, unit_square_params());
    index.insert(1, &long_a).unwrap();
    index.insert(2, &long_b).unwrap();

    let results = index.search(&[0.1, 0.0], 2, 0).unwrap();
    assert_eq!(results[0].0, 1);
    assert!((results[0].1 - 0.01).abs() < 1e-6);
    assert!((results[1].1 - 0.81).abs() < 1e-6);
}
