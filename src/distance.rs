//! Distance metrics for dense vectors.
//!
//! The graph engine is metric-agnostic: it stores a pair of kernel function
//! pointers selected once at construction and never inspects them again. The
//! kernels here are the portable defaults from [`crate::simd`].
//!
//! ## Important nuance
//!
//! Every kernel takes an explicit element count and reads only that prefix of
//! each slice, because indexed payloads are allowed to be longer than the
//! index dimension. Distances are *dissimilarities* throughout: smaller is
//! closer, and inner-product "distance" is the negated dot product, so it can
//! be negative.

use crate::simd;

/// Similarity kernel: distance between two vectors over `d` components.
pub type SimFn = fn(&[f32], &[f32], usize) -> f32;

/// Origin kernel: distance between a vector and the all-zero vector over `d`
/// components, computed without materializing the zeros.
pub type SimZeroFn = fn(&[f32], usize) -> f32;

/// Distance metric for dense vectors.
///
/// Selected once at index construction; extensible without touching the graph
/// engine, which only ever calls the resolved kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Squared Euclidean (L2²) distance.
    Euclidean2,
    /// Inner product distance $-\langle a,b\rangle$ (for maximum inner product search).
    InnerProduct,
    /// Cosine distance $1 - \cos(a,b)$; computes norms when needed.
    Cosine,
}

impl Metric {
    /// Resolve the pairwise kernel for this metric.
    #[inline]
    #[must_use]
    pub fn kernel(self) -> SimFn {
        match self {
            Metric::Euclidean2 => euclidean2,
            Metric::InnerProduct => inner_product_distance,
            Metric::Cosine => cosine_distance,
        }
    }

    /// Resolve the distance-to-origin kernel for this metric.
    #[inline]
    #[must_use]
    pub fn zero_kernel(self) -> SimZeroFn {
        match self {
            Metric::Euclidean2 => euclidean2_zero,
            Metric::InnerProduct => inner_product_zero,
            Metric::Cosine => cosine_zero,
        }
    }
}

/// Squared Euclidean distance.
#[inline]
#[must_use]
pub fn euclidean2(a: &[f32], b: &[f32], d: usize) -> f32 {
    simd::l2_distance_squared(a, b, d)
}

/// Squared Euclidean distance to the origin (squared norm).
#[inline]
#[must_use]
pub fn euclidean2_zero(a: &[f32], d: usize) -> f32 {
    simd::norm_squared(a, d)
}

/// Inner product distance (negative dot product).
#[inline]
#[must_use]
pub fn inner_product_distance(a: &[f32], b: &[f32], d: usize) -> f32 {
    -simd::dot(a, b, d)
}

/// Inner product distance to the origin: always zero.
#[inline]
#[must_use]
pub fn inner_product_zero(_a: &[f32], _d: usize) -> f32 {
    0.0
}

/// Cosine distance $1 - \cos(a,b)$, in `[0, 2]`.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32], d: usize) -> f32 {
    1.0 - simd::cosine(a, b, d).clamp(-1.0, 1.0)
}

/// Cosine distance to the origin. The angle is undefined, so the zero vector
/// is treated as maximally dissimilar to everything: `simd::cosine` reports
/// similarity 0 and the distance comes out as 1.
#[inline]
#[must_use]
pub fn cosine_zero(_a: &[f32], _d: usize) -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean2_is_zero_for_identical() {
        let a = [1.0_f32, 2.0, 3.0];
        assert_eq!(euclidean2(&a, &a, 3), 0.0);
    }

    #[test]
    fn euclidean2_zero_matches_pairwise_against_zeros() {
        let a = [3.0_f32, 4.0];
        let zeros = [0.0_f32, 0.0];
        assert_eq!(euclidean2_zero(&a, 2), euclidean2(&a, &zeros, 2));
    }

    #[test]
    fn inner_product_prefers_aligned_vectors() {
        let q = [1.0_f32, 0.0];
        let aligned = [2.0_f32, 0.0];
        let orthogonal = [0.0_f32, 2.0];
        assert!(inner_product_distance(&q, &aligned, 2) < inner_product_distance(&q, &orthogonal, 2));
    }

    #[test]
    fn cosine_distance_is_zero_for_identical() {
        let a = [1.0_f32, 2.0, 3.0];
        assert!(cosine_distance(&a, &a, 3).abs() < 1e-6);
    }

    #[test]
    fn kernel_dispatch_matches_free_functions() {
        let a = [0.5_f32, 0.25];
        let b = [0.1_f32, 0.9];
        assert_eq!(Metric::Euclidean2.kernel()(&a, &b, 2), euclidean2(&a, &b, 2));
        assert_eq!(Metric::Cosine.zero_kernel()(&a, 2), 1.0);
    }
}
