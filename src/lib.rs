//! proxima: approximate nearest-neighbor search over a short/long-edge graph.
//!
//! An in-memory ANN index for dense `f32` vectors keyed by opaque `u64` ids.
//! Vectors become nodes of a single-layer navigable small-world graph whose
//! edges are split by role: bounded-degree **short edges** for local greedy
//! refinement, sparse **long edges** for global navigation from a sentinel
//! entry point, and a symmetric **keep-connected** reserve that protects
//! reachability when edge evictions get aggressive.
//!
//! | Module | What lives there |
//! |--------|------------------|
//! | [`hsg`] | The graph engine: storage, insertion, three-phase search |
//! | [`distance`] | Metric selection and the pluggable kernel seam |
//! | [`simd`] | Portable kernel implementations |
//! | [`benchmark`] | Seeded datasets, recall metrics, corpus file formats |
//!
//! # Quick Start
//!
//! ```
//! use proxima::hsg::{HSGIndex, HSGParams};
//!
//! # fn main() -> Result<(), proxima::IndexError> {
//! let corpus: Vec<Vec<f32>> = (0..100).map(|i| vec![(i % 10) as f32, (i / 10) as f32]).collect();
//!
//! // The index borrows payloads; the corpus must outlive it.
//! let mut index = HSGIndex::new(2, HSGParams::default());
//! for (i, v) in corpus.iter().enumerate() {
//!     index.insert(i as u64, v)?;
//! }
//!
//! // Returns up to k + magnification candidates; take the first k.
//! let nearest = index.search(&[4.2, 4.8], 3, 10)?;
//! let top3 = &nearest[..3];
//! assert!(top3[0].1 <= top3[1].1);
//! # Ok(())
//! # }
//! ```
//!
//! # Design notes
//!
//! - **Single writer.** Insertion mutates arbitrary neighborhoods; wrap the
//!   index in a reader-writer lock if you need concurrent readers.
//! - **Borrowed payloads.** The index stores `&[f32]` slices and never copies
//!   vector data; the lifetime parameter on [`hsg::HSGIndex`] is the caller's
//!   arena.
//! - **Recall is a knob, not a guarantee.** Both insertion quality and search
//!   quality scale with `magnification`.

pub mod benchmark;
pub mod distance;
pub mod error;
pub mod hsg;
pub mod simd;

// Re-exports
pub use error::{IndexError, Result};
pub use hsg::{HSGIndex, HSGParams};
