//! Incremental graph construction.
//!
//! A new vector is probed through the shared three-phase traversal, then
//! bound into the graph: short edges toward its nearest candidates (with
//! symmetric links, bounded-degree eviction, and connectivity protection),
//! long edges toward spaced-out hops of the refinement path, and a sentinel
//! long edge as a bootstrap when nothing else anchors the node.

use crate::error::{IndexError, Result};
use crate::hsg::graph::{HSGIndex, SENTINEL_ID, SENTINEL_OFFSET};
use crate::hsg::search::{self, Candidate, VisitedSet};

/// Insert `(id, data)` into the graph.
///
/// Every failure is detected before the first mutation, so an `Err` leaves
/// the index untouched.
pub(crate) fn insert<'a>(index: &mut HSGIndex<'a>, id: u64, data: &'a [f32]) -> Result<()> {
    if id == SENTINEL_ID || index.contains_id(id) {
        return Err(IndexError::DuplicateId(id));
    }
    if data.is_empty() {
        return Err(IndexError::NullData);
    }
    if data.len() < index.dimension() {
        return Err(IndexError::DimensionMismatch {
            expected: index.dimension(),
            actual: data.len(),
        });
    }

    let probe = search::probe(index, data);
    debug_assert_eq!(
        probe.long_path.first().map(|&(_, o)| o),
        Some(SENTINEL_OFFSET),
        "probes descend from the sentinel"
    );
    let offset = index.insert_node(id, data);

    bind_short_edges(index, offset, probe.candidates);
    bind_long_edges(index, offset, &probe.short_path);
    bootstrap_from_sentinel(index, offset);

    debug_assert!(
        index.node(offset).short_out.len() <= index.params().short_edge_upper_limit()
    );
    Ok(())
}

/// Bind short edges between the new node and its probed candidates.
///
/// Candidates drain largest-first; the order only matters for eviction, which
/// should see a neighbor's cheap replacements before its expensive ones. The
/// sentinel is a pure navigation anchor and never takes short edges.
fn bind_short_edges(
    index: &mut HSGIndex<'_>,
    offset: u64,
    mut candidates: std::collections::BinaryHeap<Candidate>,
) {
    let lower = index.params().short_edge_lower_limit;
    let upper = index.params().short_edge_upper_limit();

    while let Some(Candidate {
        distance,
        offset: neighbor,
    }) = candidates.pop()
    {
        if neighbor == SENTINEL_OFFSET {
            continue;
        }

        index.node_mut(offset).short_out.insert(distance, neighbor);
        index.node_mut(neighbor).short_in.insert(offset);

        if index.node(neighbor).short_out.len() < lower {
            // Under the target degree: always link back.
            index.node_mut(neighbor).short_out.insert(distance, offset);
            index.node_mut(offset).short_in.insert(neighbor);
        } else if let Some((worst_distance, worst)) = index.node(neighbor).short_out.last() {
            if distance < worst_distance {
                // The new node displaces the neighbor's worst outbound edge.
                index.node_mut(neighbor).short_out.pop_last();
                index.node_mut(worst).short_in.remove(&neighbor);

                let still_linked = index.node(neighbor).short_in.contains(&worst);
                if !still_linked && !connected(index, neighbor, worst) {
                    // The evicted edge was load-bearing. Reinstate it when the
                    // ceiling leaves room for it plus the incoming edge,
                    // otherwise park the pair in the symmetric reserve.
                    if index.node(neighbor).short_out.len() + 1 < upper {
                        index.node_mut(neighbor).short_out.insert(worst_distance, worst);
                        index.node_mut(worst).short_in.insert(neighbor);
                    } else {
                        index.node_mut(neighbor).keep_connected.insert(worst);
                        index.node_mut(worst).keep_connected.insert(neighbor);
                    }
                }

                index.node_mut(neighbor).short_out.insert(distance, offset);
                index.node_mut(offset).short_in.insert(neighbor);
            }
            // distance >= worst_distance: the asymmetric outbound from the
            // new node suffices.
        }
    }
}

/// Admit long edges toward refinement-path hops, one per `cover_range`
/// window: the first hop, then every hop at least `cover_range` positions
/// after the previously admitted one.
fn bind_long_edges(index: &mut HSGIndex<'_>, offset: u64, short_path: &[(f32, u64)]) {
    let cover_range = index.params().cover_range;
    if short_path.len() < cover_range {
        return;
    }

    let mut last_admitted = None;
    for (position, &(distance, hop)) in short_path.iter().enumerate() {
        let due = match last_admitted {
            None => true,
            Some(previous) => position - previous >= cover_range,
        };
        if due {
            index.node_mut(offset).long_out.insert(distance, hop);
            index.node_mut(hop).long_in.insert(offset, distance);
            last_admitted = Some(position);
        }
    }
}

/// Anchor a node that came out of binding with no short edges in either
/// direction (every candidate was the sentinel, or every symmetric link was
/// declined). A long edge from the sentinel keeps it reachable; the first
/// insert into an empty graph always takes this path.
fn bootstrap_from_sentinel(index: &mut HSGIndex<'_>, offset: u64) {
    let node = index.node(offset);
    if node.short_out.is_empty() && node.short_in.is_empty() {
        let distance = (index.sim_zero)(index.payload(offset), index.dimension());
        index.node_mut(SENTINEL_OFFSET).long_out.insert(distance, offset);
        index.node_mut(offset).long_in.insert(SENTINEL_OFFSET, distance);
    }
}

/// Bounded-radius connectivity oracle.
///
/// Breadth-first expansion from `from` over short edges (both directions) and
/// the keep-connected reserve, for exactly `connectivity_radius` rounds. Long
/// edges are excluded: they are not guaranteed to survive future evictions,
/// so reachability through them proves nothing durable.
pub(crate) fn connected(index: &HSGIndex<'_>, from: u64, target: u64) -> bool {
    let mut visited = VisitedSet::new(index.nodes.len());
    visited.insert(from);
    let mut frontier = vec![from];

    for _ in 0..index.params().connectivity_radius {
        let mut next = Vec::new();
        for &offset in &frontier {
            let node = index.node(offset);
            let neighbors = node
                .short_out
                .iter()
                .map(|&(_, o)| o)
                .chain(node.short_in.iter().copied())
                .chain(node.keep_connected.iter().copied());
            for neighbor in neighbors {
                if neighbor == target {
                    return true;
                }
                if visited.insert(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    visited.contains(target)
}
