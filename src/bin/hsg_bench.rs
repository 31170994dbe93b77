//! CLI benchmark harness for the HSG index.
//!
//! Usage: `hsg_bench <train.bin> <test.bin> <truth.bin>`
//!
//! Builds an index over the train corpus (ids are row numbers), runs every
//! test query with `k = neighbor_count` from the truth file, and reports
//! per-query wall time in microseconds plus hit counts against ground truth.

use std::process::ExitCode;
use std::time::Instant;

use proxima::benchmark::{read_neighbors, read_vectors};
use proxima::hsg::{HSGIndex, HSGParams};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("usage: hsg_bench <train.bin> <test.bin> <truth.bin>");
        return ExitCode::from(2);
    }

    let (train, train_dim) = match read_vectors(&args[1]) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("failed to load {}: {e}", args[1]);
            return ExitCode::FAILURE;
        }
    };
    let (test, test_dim) = match read_vectors(&args[2]) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("failed to load {}: {e}", args[2]);
            return ExitCode::FAILURE;
        }
    };
    let truth = match read_neighbors(&args[3]) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("failed to load {}: {e}", args[3]);
            return ExitCode::FAILURE;
        }
    };

    if train_dim != test_dim {
        eprintln!("train dimension {train_dim} != test dimension {test_dim}");
        return ExitCode::FAILURE;
    }
    if truth.len() != test.len() {
        eprintln!("{} truth rows for {} queries", truth.len(), test.len());
        return ExitCode::FAILURE;
    }

    let params = HSGParams::default();
    let mut index = HSGIndex::new(train_dim, params);

    let begin = Instant::now();
    for (i, vector) in train.iter().enumerate() {
        if let Err(e) = index.insert(i as u64, vector) {
            eprintln!("insert of row {i} failed: {e}");
            return ExitCode::FAILURE;
        }
    }
    println!("building index costs(us): {}", begin.elapsed().as_micros());

    let mut total_hit = 0u64;
    let mut total_time_us = 0u128;
    for (query, neighbors) in test.iter().zip(&truth) {
        let k = neighbors.len();
        let begin = Instant::now();
        let results = match index.search(query, k, params.magnification) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("search failed: {e}");
                return ExitCode::FAILURE;
            }
        };
        let elapsed = begin.elapsed().as_micros();
        total_time_us += elapsed;

        let truth_set: std::collections::HashSet<u64> = neighbors.iter().copied().collect();
        let hit = results
            .iter()
            .take(k)
            .filter(|(id, _)| truth_set.contains(id))
            .count() as u64;
        total_hit += hit;
        println!("one query costs(us): {elapsed}, hit: {hit}/{k}");
    }

    if !test.is_empty() {
        println!("average time(us): {}", total_time_us / test.len() as u128);
    }
    println!("total hit: {total_hit}");
    ExitCode::SUCCESS
}
