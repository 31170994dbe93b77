//! Benchmark utilities for ANN evaluation.
//!
//! Provides seeded dataset generation, brute-force ground truth, quality
//! metrics, and the binary file formats consumed by the `hsg_bench` harness:
//!
//! - **Accuracy**: recall@k, precision@k against exact brute force
//! - **Datasets**: uniform and clustered synthetic data, reproducible by seed
//! - **I/O**: bit-exact corpus and ground-truth neighbor files
//!
//! Reference: <https://ann-benchmarks.com/>

pub mod datasets;
pub mod io;
pub mod metrics;

pub use datasets::{
    compute_all_ground_truth, compute_ground_truth, create_benchmark_dataset,
    create_clustered_dataset, Dataset,
};
pub use io::{read_neighbors, read_vectors, write_neighbors, write_vectors};
pub use metrics::{precision_at_k, recall_at_k};
