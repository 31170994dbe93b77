//! Hybrid short/long-edge small-world graph (HSG).
//!
//! A flat navigable small-world index in which every edge has a role:
//!
//! - **Short edges** form bounded-degree neighborhoods that stay close to a
//!   k-NN graph under streaming inserts; they carry the final refinement.
//! - **Long edges** connect each node to spaced-out hops of its own insertion
//!   path; they carry navigation from the fixed sentinel entry point.
//! - **Keep-connected** edges are a symmetric reserve created when evicting a
//!   short edge would disconnect a neighborhood.
//!
//! # Quick Start
//!
//! ```
//! use proxima::hsg::{HSGIndex, HSGParams};
//!
//! # fn main() -> Result<(), proxima::IndexError> {
//! let corpus: Vec<Vec<f32>> = (0..64).map(|i| vec![i as f32, (i % 8) as f32]).collect();
//!
//! let mut index = HSGIndex::new(2, HSGParams::default());
//! for (i, v) in corpus.iter().enumerate() {
//!     index.insert(i as u64, v)?;
//! }
//!
//! // Up to 5 + 10 candidates come back, nearest first.
//! let results = index.search(&[3.0, 3.0], 5, 10)?;
//! assert_eq!(results.len(), 15);
//! # Ok(())
//! # }
//! ```
//!
//! # Why a flat graph with edge roles?
//!
//! HNSW gets its "express lanes" from a layer hierarchy. Here the same
//! long-range routing lives in the base graph as an explicit edge role, which
//! keeps one node record per vector and makes the navigation structure
//! inspectable. Search runs in three phases: long-edge descent from the
//! sentinel, short-edge refinement to a local minimum, then a bounded top-k
//! harvest. Recall is tuned per query with a `magnification` knob rather than
//! per index with an `ef` schedule.
//!
//! # Invariants
//!
//! [`HSGIndex::validate`] re-checks the structural invariants the engine
//! maintains: sentinel reachability, the short-edge degree ceiling,
//! reverse-index symmetry, stored-distance truth, and the id/offset
//! bijection.
//!
//! # References
//!
//! - Malkov et al. (2014). "Approximate nearest neighbor algorithm based on
//!   navigable small world graphs."
//! - Munyampirwa et al. (2024). "Down with the Hierarchy: The 'H' in HNSW
//!   Stands for 'Hubs'." (arXiv:2412.01940)

pub(crate) mod construction;
pub(crate) mod graph;
pub(crate) mod search;

pub use graph::{HSGIndex, HSGParams, SENTINEL_ID};
