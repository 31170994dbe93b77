//! Node and index storage for the HSG graph.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use smallvec::SmallVec;

use crate::distance::{Metric, SimFn, SimZeroFn};
use crate::error::{IndexError, Result};
use crate::hsg::{construction, search};

/// External id reserved for the sentinel entry node. `insert` rejects it.
pub const SENTINEL_ID: u64 = u64::MAX;

/// The sentinel always lives at offset 0.
pub(crate) const SENTINEL_OFFSET: u64 = 0;

/// Ordered edge multiset keyed by `(distance, offset)` ascending.
///
/// Degree is bounded by `short_edge_upper_limit` for short edges and stays
/// small for long edges, so a sorted small-vector beats a tree: inserts are a
/// binary search plus a shift, and the worst edge is the last element.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeList {
    edges: SmallVec<[(f32, u64); 16]>,
}

impl EdgeList {
    /// Insert an edge, keeping the list sorted. Equal distances to different
    /// offsets are common; ties order by offset.
    pub(crate) fn insert(&mut self, distance: f32, offset: u64) {
        let key = (distance, offset);
        let position = self
            .edges
            .partition_point(|&(d, o)| d.total_cmp(&distance).then(o.cmp(&offset)).is_lt());
        self.edges.insert(position, key);
    }

    /// The farthest edge, if any.
    pub(crate) fn last(&self) -> Option<(f32, u64)> {
        self.edges.last().copied()
    }

    /// Remove and return the farthest edge.
    pub(crate) fn pop_last(&mut self) -> Option<(f32, u64)> {
        self.edges.pop()
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(f32, u64)> {
        self.edges.iter()
    }

    /// Whether any edge points at `offset`, regardless of distance.
    pub(crate) fn contains_offset(&self, offset: u64) -> bool {
        self.edges.iter().any(|&(_, o)| o == offset)
    }

    pub(crate) fn clear(&mut self) {
        self.edges.clear();
    }
}

/// One indexed vector and its edge sets.
///
/// Payloads are borrowed from the caller (`None` marks the sentinel, whose
/// payload is the index-owned zero vector). Edges identify their endpoint by
/// offset only; offsets stay stable across store growth, references do not.
#[derive(Debug)]
pub(crate) struct Node<'a> {
    pub(crate) id: u64,
    pub(crate) offset: u64,
    pub(crate) data: Option<&'a [f32]>,
    /// Bounded near-neighbor edges, the refinement substrate.
    pub(crate) short_out: EdgeList,
    /// Reverse index of short-edge sources.
    pub(crate) short_in: HashSet<u64>,
    /// Long-range navigation edges.
    pub(crate) long_out: EdgeList,
    /// Reverse index of long-edge sources, kept for future deletion repair.
    pub(crate) long_in: HashMap<u64, f32>,
    /// Symmetric reserve edges that survive evictions which would otherwise
    /// disconnect a neighborhood.
    pub(crate) keep_connected: HashSet<u64>,
}

impl<'a> Node<'a> {
    fn new(id: u64, offset: u64, data: Option<&'a [f32]>) -> Self {
        Node {
            id,
            offset,
            data,
            short_out: EdgeList::default(),
            short_in: HashSet::new(),
            long_out: EdgeList::default(),
            long_in: HashMap::new(),
            keep_connected: HashSet::new(),
        }
    }
}

/// Construction parameters, immutable for the life of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HSGParams {
    /// Distance metric.
    pub metric: Metric,
    /// Target short-edge out-degree; nodes are topped up to this via
    /// symmetric links. Typical values 6-11.
    pub short_edge_lower_limit: usize,
    /// Recall knob: insertion probes track
    /// `short_edge_lower_limit + magnification` candidates.
    pub magnification: usize,
    /// Minimum refinement-path hop count between two admitted long edges.
    pub cover_range: usize,
    /// BFS rounds the connectivity oracle runs before declaring two nodes
    /// disconnected. Tuned to the graph's expected diameter.
    pub connectivity_radius: usize,
}

impl Default for HSGParams {
    fn default() -> Self {
        HSGParams {
            metric: Metric::Euclidean2,
            short_edge_lower_limit: 8,
            magnification: 8,
            cover_range: 3,
            connectivity_radius: 4,
        }
    }
}

impl HSGParams {
    /// Hard ceiling on short-edge out-degree.
    #[must_use]
    pub fn short_edge_upper_limit(&self) -> usize {
        2 * self.short_edge_lower_limit
    }

    /// Candidate budget for insertion probes.
    #[must_use]
    pub fn termination_number(&self) -> usize {
        self.short_edge_lower_limit + self.magnification
    }
}

/// Approximate nearest-neighbor index over a navigable small-world graph with
/// short and long edge roles.
///
/// The lifetime parameter is the caller's payload arena: the index stores
/// borrowed `&'a [f32]` slices and never copies vector data.
///
/// # Usage
///
/// ```
/// use proxima::hsg::{HSGIndex, HSGParams};
///
/// # fn main() -> Result<(), proxima::IndexError> {
/// let data = vec![vec![0.0_f32, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
/// let mut index = HSGIndex::new(2, HSGParams {
///     short_edge_lower_limit: 2,
///     magnification: 2,
///     ..HSGParams::default()
/// });
///
/// for (i, v) in data.iter().enumerate() {
///     index.insert(i as u64, v)?;
/// }
///
/// let results = index.search(&[0.1, 0.1], 2, 1)?;
/// assert_eq!(results[0].0, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HSGIndex<'a> {
    params: HSGParams,
    dimension: usize,
    pub(crate) sim: SimFn,
    pub(crate) sim_zero: SimZeroFn,
    pub(crate) nodes: Vec<Node<'a>>,
    /// Offsets freed by deletion, smallest reused first to keep the store
    /// densely packed (the per-query visited set is sized by `nodes.len()`).
    empty: BinaryHeap<Reverse<u64>>,
    id_to_offset: HashMap<u64, u64>,
    zero: Vec<f32>,
}

impl<'a> HSGIndex<'a> {
    /// Create an empty index containing only the sentinel.
    #[must_use]
    pub fn new(dimension: usize, params: HSGParams) -> Self {
        let mut index = HSGIndex {
            params,
            dimension,
            sim: params.metric.kernel(),
            sim_zero: params.metric.zero_kernel(),
            nodes: Vec::new(),
            empty: BinaryHeap::new(),
            id_to_offset: HashMap::new(),
            zero: vec![0.0; dimension],
        };
        index.nodes.push(Node::new(SENTINEL_ID, SENTINEL_OFFSET, None));
        index.id_to_offset.insert(SENTINEL_ID, SENTINEL_OFFSET);
        index
    }

    /// Number of live vectors, excluding the sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_offset.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn params(&self) -> &HSGParams {
        &self.params
    }

    /// Insert a vector under `id`.
    ///
    /// The payload must stay alive as long as the index; only its first
    /// `dimension` components participate in distances. All validation
    /// happens before any mutation, so a failed insert is a no-op.
    pub fn insert(&mut self, id: u64, data: &'a [f32]) -> Result<()> {
        construction::insert(self, id, data)
    }

    /// Top-k search: the closest `top_k + magnification` live vectors as
    /// `(id, distance)` pairs, ascending by distance.
    pub fn search(&self, target: &[f32], top_k: usize, magnification: usize) -> Result<Vec<(u64, f32)>> {
        if self.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if target.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: target.len(),
            });
        }
        Ok(search::nearest_neighbors(self, target, top_k, magnification))
    }

    /// Resolve an external id to its store offset.
    pub fn lookup(&self, id: u64) -> Result<u64> {
        self.id_to_offset
            .get(&id)
            .copied()
            .ok_or(IndexError::UnknownId(id))
    }

    /// Short-edge out-degree of the live node holding `id`.
    ///
    /// Bounded by `short_edge_upper_limit`; sits at `short_edge_lower_limit`
    /// once the node's neighborhood has filled in. Fresh nodes bound while
    /// the sentinel still ranked among their probe candidates can start
    /// lower and are topped up by symmetric links from later inserts.
    pub fn short_edge_degree(&self, id: u64) -> Result<usize> {
        let offset = self.lookup(id)?;
        Ok(self.node(offset).short_out.len())
    }

    pub(crate) fn node(&self, offset: u64) -> &Node<'a> {
        &self.nodes[offset as usize]
    }

    pub(crate) fn node_mut(&mut self, offset: u64) -> &mut Node<'a> {
        &mut self.nodes[offset as usize]
    }

    /// Payload of the node at `offset`; the sentinel resolves to the
    /// index-owned zero vector.
    pub(crate) fn payload(&self, offset: u64) -> &[f32] {
        match self.nodes[offset as usize].data {
            Some(data) => data,
            None => &self.zero,
        }
    }

    pub(crate) fn contains_id(&self, id: u64) -> bool {
        self.id_to_offset.contains_key(&id)
    }

    /// Allocate a store slot for `(id, data)`, reusing the smallest freed
    /// offset when one exists. The new node has empty edge sets.
    pub(crate) fn insert_node(&mut self, id: u64, data: &'a [f32]) -> u64 {
        let offset = match self.empty.pop() {
            Some(Reverse(offset)) => {
                let node = &mut self.nodes[offset as usize];
                node.id = id;
                node.data = Some(data);
                offset
            }
            None => {
                let offset = self.nodes.len() as u64;
                self.nodes.push(Node::new(id, offset, Some(data)));
                offset
            }
        };
        self.id_to_offset.insert(id, offset);
        offset
    }

    /// Release a store slot. The caller is responsible for having detached
    /// all edges first; this only clears the record and recycles the offset.
    // TODO: call from `erase` once deletion repair lands.
    #[allow(dead_code)]
    pub(crate) fn free(&mut self, offset: u64) {
        debug_assert_ne!(offset, SENTINEL_OFFSET);
        let id = self.nodes[offset as usize].id;
        self.id_to_offset.remove(&id);
        let node = &mut self.nodes[offset as usize];
        node.id = SENTINEL_ID;
        node.data = None;
        node.short_out.clear();
        node.short_in.clear();
        node.long_out.clear();
        node.long_in.clear();
        node.keep_connected.clear();
        self.empty.push(Reverse(offset));
    }

    /// Re-check every structural invariant, returning the first violation.
    ///
    /// Violations are bugs, not runtime errors; the test suites call this
    /// after mutation batches.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let freed: HashSet<u64> = self.empty.iter().map(|&Reverse(o)| o).collect();
        let upper = self.params.short_edge_upper_limit();

        // Id bijection and liveness bookkeeping.
        if self.id_to_offset.get(&SENTINEL_ID) != Some(&SENTINEL_OFFSET) {
            return Err("sentinel id is not mapped to offset 0".into());
        }
        let mut seen_offsets = HashSet::new();
        for (&id, &offset) in &self.id_to_offset {
            let node = self
                .nodes
                .get(offset as usize)
                .ok_or_else(|| format!("id {id} maps to out-of-range offset {offset}"))?;
            if node.id != id {
                return Err(format!("id {id} maps to offset {offset} which holds id {}", node.id));
            }
            if node.offset != offset {
                return Err(format!("node at offset {offset} records offset {}", node.offset));
            }
            if freed.contains(&offset) {
                return Err(format!("live id {id} maps to freed offset {offset}"));
            }
            if !seen_offsets.insert(offset) {
                return Err(format!("offset {offset} is mapped by two ids"));
            }
        }
        if seen_offsets.len() + freed.len() != self.nodes.len() {
            return Err("store slots are neither live nor freed".into());
        }

        for node in &self.nodes {
            if freed.contains(&node.offset) {
                continue;
            }
            let offset = node.offset;

            // Degree bound.
            if node.short_out.len() > upper {
                return Err(format!(
                    "node {offset} has {} short edges, ceiling is {upper}",
                    node.short_out.len()
                ));
            }
            if offset == SENTINEL_OFFSET && !node.short_out.is_empty() {
                return Err("sentinel carries short edges".into());
            }

            // Reverse-index symmetry and distance truth.
            for &(distance, target) in node.short_out.iter() {
                if !self.nodes[target as usize].short_in.contains(&offset) {
                    return Err(format!("short edge {offset}->{target} missing from short_in"));
                }
                self.check_distance(offset, target, distance)?;
            }
            for &source in &node.short_in {
                if !self.nodes[source as usize].short_out.contains_offset(offset) {
                    return Err(format!("short_in of {offset} names {source} without an edge"));
                }
            }
            for &(distance, target) in node.long_out.iter() {
                if self.nodes[target as usize].long_in.get(&offset).is_none() {
                    return Err(format!("long edge {offset}->{target} missing from long_in"));
                }
                self.check_distance(offset, target, distance)?;
            }
            for (&source, &distance) in &node.long_in {
                if !self.nodes[source as usize].long_out.contains_offset(offset) {
                    return Err(format!("long_in of {offset} names {source} without an edge"));
                }
                self.check_distance(source, offset, distance)?;
            }
            for &peer in &node.keep_connected {
                if !self.nodes[peer as usize].keep_connected.contains(&offset) {
                    return Err(format!("keep_connected {offset}<->{peer} is one-sided"));
                }
            }
        }

        // Sentinel reachability over every edge kind, short edges in both
        // directions.
        let mut visited = HashSet::from([SENTINEL_OFFSET]);
        let mut frontier = vec![SENTINEL_OFFSET];
        while let Some(offset) = frontier.pop() {
            let node = &self.nodes[offset as usize];
            let out = node.long_out.iter().chain(node.short_out.iter()).map(|&(_, o)| o);
            let back = node.short_in.iter().chain(node.keep_connected.iter()).copied();
            for neighbor in out.chain(back) {
                if visited.insert(neighbor) {
                    frontier.push(neighbor);
                }
            }
        }
        for node in &self.nodes {
            if !freed.contains(&node.offset) && !visited.contains(&node.offset) {
                return Err(format!("node {} (id {}) unreachable from sentinel", node.offset, node.id));
            }
        }

        Ok(())
    }

    fn check_distance(&self, a: u64, b: u64, stored: f32) -> std::result::Result<(), String> {
        let actual = if a == SENTINEL_OFFSET {
            (self.sim_zero)(self.payload(b), self.dimension)
        } else if b == SENTINEL_OFFSET {
            (self.sim_zero)(self.payload(a), self.dimension)
        } else {
            (self.sim)(self.payload(a), self.payload(b), self.dimension)
        };
        let tolerance = 1e-5 * actual.abs().max(1.0);
        if (stored - actual).abs() > tolerance {
            return Err(format!("edge {a}->{b} stores distance {stored}, actual {actual}"));
        }
        Ok(())
    }
}
