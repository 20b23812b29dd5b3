//! Last-Writer-Wins Element Graph CRDT
//!
//! An undirected graph whose edge set is an LWW-Element-Set: every logical
//! edge keeps the latest add timestamp and the latest remove timestamp it has
//! ever seen, and is present when the add is not older than the remove.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::cmp::Ordering;

use tracing::{debug, trace};

use crate::clock::Timestamp;
use crate::error::{CRDTError, CRDTResult};
use crate::graph::{Edge, EdgeKey, Vertex};
use crate::traits::{CRDT, DeltaCRDT, PartiallyOrdered};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-set map from logical edge to the greatest timestamp seen for it
type TimestampMap = BTreeMap<EdgeKey, Timestamp>;

/// Undirected graph replicated as an LWW-Element-Set of edges
///
/// The graph owns two monotonic maps, `added` and `removed`. The current
/// graph is never stored; every query derives it from the two maps.
///
/// Equal add and remove timestamps resolve in favour of the add. This bias is
/// part of the contract: a remove only wins when it is strictly later.
///
/// # Example
/// ```rust
/// use lwwgraph::prelude::*;
///
/// let mut replica1 = Graph::new();
/// replica1.add_edge(Edge::new("1", "2", 1000));
/// replica1.add_edge(Edge::new("2", "3", 1000));
///
/// let mut replica2 = Graph::new();
/// replica2.remove_edge(Edge::new("3", "2", 1001)); // strictly later, wins
/// replica2.remove_edge(Edge::new("1", "2", 1000)); // tie, add wins
///
/// replica1.merge(&replica2);
/// assert!(replica1.check_in_graph(&Edge::new("1", "2", 0)));
/// assert!(!replica1.check_in_graph(&Edge::new("2", "3", 0)));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "GraphState", into = "GraphState"))]
pub struct Graph {
    added: TimestampMap,
    removed: TimestampMap,
}

/// Wire shape of a graph: both sets as plain edge lists
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct GraphState {
    added: Vec<Edge>,
    removed: Vec<Edge>,
}

#[cfg(feature = "serde")]
impl From<Graph> for GraphState {
    fn from(graph: Graph) -> Self {
        Self {
            added: graph.added.iter().map(|(key, &ts)| key.at(ts)).collect(),
            removed: graph.removed.iter().map(|(key, &ts)| key.at(ts)).collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<GraphState> for Graph {
    fn from(state: GraphState) -> Self {
        // Replaying through the operations re-establishes every invariant
        let mut graph = Graph::new();
        for edge in state.added {
            graph.add_edge(edge);
        }
        for edge in state.removed {
            graph.remove_edge(edge);
        }
        graph
    }
}

/// Raises the stored timestamp for `key` to at least `timestamp`
fn record(set: &mut TimestampMap, key: EdgeKey, timestamp: Timestamp) {
    let stored = set.entry(key).or_insert(timestamp);
    if timestamp > *stored {
        *stored = timestamp;
    }
}

/// Same as [`record`] for a borrowed key, cloning it only on first sight
fn record_ref(set: &mut TimestampMap, key: &EdgeKey, timestamp: Timestamp) {
    match set.get_mut(key) {
        Some(stored) => {
            if timestamp > *stored {
                *stored = timestamp;
            }
        }
        None => {
            set.insert(key.clone(), timestamp);
        }
    }
}

/// Decides presence of an added edge; ties favour the add
fn survives(added: Timestamp, removed: Option<Timestamp>) -> bool {
    match removed {
        Some(removed) => added >= removed,
        None => true,
    }
}

/// Returns true if every entry of `lower` is matched by `upper` at an equal or later timestamp
fn dominated(lower: &TimestampMap, upper: &TimestampMap) -> bool {
    lower
        .iter()
        .all(|(key, ts)| upper.get(key).is_some_and(|other| other >= ts))
}

/// Entries of `set` that `other` does not already cover
fn missing_from(set: &TimestampMap, other: &TimestampMap) -> TimestampMap {
    set.iter()
        .filter(|(key, ts)| other.get(*key).is_none_or(|theirs| theirs < *ts))
        .map(|(key, &ts)| (key.clone(), ts))
        .collect()
}

impl Graph {
    /// Creates an empty graph
    ///
    /// # Example
    /// ```rust
    /// use lwwgraph::prelude::*;
    /// let graph = Graph::new();
    /// assert!(graph.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an add of the edge
    ///
    /// The stored add timestamp for the logical edge becomes the maximum of
    /// the existing one and `edge.timestamp()`. It is never lowered.
    pub fn add_edge(&mut self, edge: Edge) {
        let (key, timestamp) = edge.into_parts();
        trace!(edge = %key, %timestamp, "recording edge add");
        record(&mut self.added, key, timestamp);
    }

    /// Records a remove of the edge
    ///
    /// Unconditional: the edge does not need to have been added. The
    /// tombstone suppresses every add with a strictly older timestamp, past
    /// or future (see [`Graph::check_in_graph`]).
    pub fn remove_edge(&mut self, edge: Edge) {
        let (key, timestamp) = edge.into_parts();
        trace!(edge = %key, %timestamp, "recording edge remove");
        record(&mut self.removed, key, timestamp);
    }

    /// Checks whether the logical edge is currently in the graph
    ///
    /// The timestamp carried by `edge` is ignored; only its vertex pair is
    /// looked up. Returns false if the edge was never added, true if it was
    /// added and never removed, and otherwise true unless the remove is
    /// strictly later than the add.
    pub fn check_in_graph(&self, edge: &Edge) -> bool {
        let key = edge.key();
        match self.added.get(&key) {
            Some(&added) => survives(added, self.removed.get(&key).copied()),
            None => false,
        }
    }

    /// Materializes the current graph
    ///
    /// Every returned edge carries its stored add timestamp. Edges come out
    /// in canonical key order.
    pub fn current_edges(&self) -> Vec<Edge> {
        self.added
            .iter()
            .filter(|(key, ts)| survives(**ts, self.removed.get(*key).copied()))
            .map(|(key, &ts)| key.at(ts))
            .collect()
    }

    /// Keys of the current graph, without materializing edges
    pub(crate) fn current_keys(&self) -> impl Iterator<Item = &EdgeKey> + '_ {
        self.added
            .iter()
            .filter(|(key, ts)| survives(**ts, self.removed.get(*key).copied()))
            .map(|(key, _)| key)
    }

    /// Merges another replica into this one and returns `self` for chaining
    ///
    /// Both sets are joined pointwise by maximum timestamp, so merging is
    /// commutative, associative and idempotent.
    ///
    /// # Example
    /// ```rust
    /// use lwwgraph::prelude::*;
    ///
    /// let mut a = Graph::new();
    /// a.add_edge(Edge::new("1", "2", 1));
    /// let mut b = Graph::new();
    /// b.add_edge(Edge::new("2", "3", 1));
    /// let mut c = Graph::new();
    /// c.remove_edge(Edge::new("1", "2", 2));
    ///
    /// a.merge(&b).merge(&c);
    /// assert_eq!(a.edge_count(), 1);
    /// ```
    pub fn merge(&mut self, other: &Graph) -> &mut Self {
        debug!(
            added = other.added.len(),
            removed = other.removed.len(),
            "merging replica state"
        );
        for (key, &ts) in &other.added {
            record_ref(&mut self.added, key, ts);
        }
        for (key, &ts) in &other.removed {
            record_ref(&mut self.removed, key, ts);
        }
        self
    }

    /// Returns the stored add timestamp of the logical edge
    pub fn added_timestamp(&self, edge: &Edge) -> Option<Timestamp> {
        self.added.get(&edge.key()).copied()
    }

    /// Returns the stored remove timestamp of the logical edge
    pub fn removed_timestamp(&self, edge: &Edge) -> Option<Timestamp> {
        self.removed.get(&edge.key()).copied()
    }

    /// Iterates the added set in canonical key order
    pub fn added(&self) -> impl Iterator<Item = (&EdgeKey, Timestamp)> + '_ {
        self.added.iter().map(|(key, &ts)| (key, ts))
    }

    /// Iterates the removed set in canonical key order
    pub fn removed(&self) -> impl Iterator<Item = (&EdgeKey, Timestamp)> + '_ {
        self.removed.iter().map(|(key, &ts)| (key, ts))
    }

    /// Returns the number of edges in the current graph
    pub fn edge_count(&self) -> usize {
        self.current_keys().count()
    }

    /// Returns true if the current graph has no edges
    ///
    /// Tombstones may still be stored.
    pub fn is_empty(&self) -> bool {
        self.current_keys().next().is_none()
    }

    /// Returns every vertex incident to a current edge
    pub fn vertices(&self) -> BTreeSet<&Vertex> {
        self.current_keys()
            .flat_map(|key| [key.low(), key.high()])
            .collect()
    }

    /// Returns true if the vertex has at least one current edge
    pub fn contains_vertex(&self, vertex: &Vertex) -> bool {
        self.current_keys().any(|key| key.is_incident(vertex))
    }
}

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

fn fnv1a(mut hash: u32, bytes: &[u8]) -> u32 {
    for &byte in bytes {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn hash_set(mut hash: u32, tag: u8, set: &TimestampMap) -> u32 {
    hash = fnv1a(hash, &[tag]);
    for (key, ts) in set {
        hash = fnv1a(hash, key.low().id().as_bytes());
        hash = fnv1a(hash, &[0xff]);
        hash = fnv1a(hash, key.high().id().as_bytes());
        hash = fnv1a(hash, &[0xff]);
        hash = fnv1a(hash, &ts.value().to_le_bytes());
    }
    hash
}

fn set_size_bytes(set: &TimestampMap) -> usize {
    set.keys()
        .map(|key| {
            core::mem::size_of::<EdgeKey>()
                + core::mem::size_of::<Timestamp>()
                + key.low().id().len()
                + key.high().id().len()
        })
        .sum()
}

impl CRDT for Graph {
    type Error = CRDTError;

    fn merge(&mut self, other: &Self) -> CRDTResult<()> {
        Graph::merge(self, other);
        Ok(())
    }

    fn eq(&self, other: &Self) -> bool {
        self.added == other.added && self.removed == other.removed
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>() + set_size_bytes(&self.added) + set_size_bytes(&self.removed)
    }

    fn validate(&self) -> CRDTResult<()> {
        if self
            .added
            .keys()
            .chain(self.removed.keys())
            .any(|key| !key.is_canonical())
        {
            return Err(CRDTError::NonCanonicalEdge);
        }
        Ok(())
    }

    fn state_hash(&self) -> u32 {
        let hash = hash_set(FNV_OFFSET, b'a', &self.added);
        hash_set(hash, b'r', &self.removed)
    }

    fn can_merge(&self, _other: &Self) -> bool {
        // No capacity limits
        true
    }
}

impl PartiallyOrdered for Graph {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let below = dominated(&self.added, &other.added) && dominated(&self.removed, &other.removed);
        let above = dominated(&other.added, &self.added) && dominated(&other.removed, &self.removed);

        match (below, above) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        }
    }
}

impl DeltaCRDT for Graph {
    type Delta = Graph;

    fn delta_since(&self, other: &Self) -> Option<Self::Delta> {
        let delta = Graph {
            added: missing_from(&self.added, &other.added),
            removed: missing_from(&self.removed, &other.removed),
        };

        if delta.added.is_empty() && delta.removed.is_empty() {
            None
        } else {
            Some(delta)
        }
    }

    fn apply_delta(&mut self, delta: &Self::Delta) -> CRDTResult<()> {
        Graph::merge(self, delta);
        Ok(())
    }

    fn merge_deltas(delta1: &Self::Delta, delta2: &Self::Delta) -> Self::Delta {
        let mut merged = delta1.clone();
        merged.merge(delta2);
        merged
    }

    fn delta_size(delta: &Self::Delta) -> usize {
        delta.size_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ts(value: u64) -> Timestamp {
        Timestamp::new(value)
    }

    #[test]
    fn test_new_graph() {
        let graph = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.current_edges().is_empty());
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_add_keeps_max_timestamp() {
        let mut graph = Graph::new();
        graph.add_edge(Edge::new("1", "2", 1000));
        graph.add_edge(Edge::new("2", "1", 900)); // older, ignored
        assert_eq!(graph.added_timestamp(&Edge::new("1", "2", 0)), Some(ts(1000)));

        graph.add_edge(Edge::new("1", "2", 1100));
        assert_eq!(graph.added_timestamp(&Edge::new("1", "2", 0)), Some(ts(1100)));
        assert_eq!(graph.added().count(), 1);
    }

    #[test]
    fn test_remove_keeps_max_timestamp() {
        let mut graph = Graph::new();
        graph.remove_edge(Edge::new("1", "2", 1000));
        graph.remove_edge(Edge::new("1", "2", 10));
        assert_eq!(graph.removed_timestamp(&Edge::new("2", "1", 0)), Some(ts(1000)));
        assert_eq!(graph.removed().count(), 1);
    }

    #[test]
    fn test_add_idempotent() {
        let mut once = Graph::new();
        once.add_edge(Edge::new("1", "2", 1000));
        let mut twice = once.clone();
        twice.add_edge(Edge::new("1", "2", 1000));

        assert!(CRDT::eq(&once, &twice));
    }

    #[test]
    fn test_check_in_graph() {
        let mut graph = Graph::new();
        assert!(!graph.check_in_graph(&Edge::new("1", "2", 0))); // never added

        graph.add_edge(Edge::new("1", "2", 1000));
        assert!(graph.check_in_graph(&Edge::new("1", "2", 0))); // never removed

        graph.remove_edge(Edge::new("1", "2", 1000));
        assert!(graph.check_in_graph(&Edge::new("1", "2", 0))); // tie favours add

        graph.remove_edge(Edge::new("2", "1", 1001));
        assert!(!graph.check_in_graph(&Edge::new("1", "2", 0))); // strictly later remove

        graph.add_edge(Edge::new("1", "2", 1001));
        assert!(graph.check_in_graph(&Edge::new("2", "1", 0)));
    }

    #[test]
    fn test_remove_before_add_suppresses_older_add() {
        let mut graph = Graph::new();
        graph.remove_edge(Edge::new("a", "b", 50));
        graph.add_edge(Edge::new("a", "b", 40));

        assert!(!graph.check_in_graph(&Edge::new("a", "b", 0)));
        assert!(graph.current_edges().is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_current_edges() {
        let mut graph = Graph::new();
        graph.add_edge(Edge::new("1", "2", 1000));
        graph.add_edge(Edge::new("2", "3", 1000));
        graph.add_edge(Edge::new("3", "4", 1000));
        graph.remove_edge(Edge::new("3", "2", 1001));
        graph.remove_edge(Edge::new("9", "8", 1001));

        let current = graph.current_edges();
        assert_eq!(current, vec![Edge::new("1", "2", 0), Edge::new("3", "4", 0)]);
        assert_eq!(current[0].timestamp(), ts(1000));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_vertices() {
        let mut graph = Graph::new();
        graph.add_edge(Edge::new("1", "2", 1000));
        graph.add_edge(Edge::new("2", "3", 1000));
        graph.remove_edge(Edge::new("2", "3", 1001));

        let vertices: Vec<&str> = graph.vertices().into_iter().map(Vertex::id).collect();
        assert_eq!(vertices, vec!["1", "2"]);
        assert!(graph.contains_vertex(&Vertex::new("1")));
        assert!(!graph.contains_vertex(&Vertex::new("3")));
    }

    #[test]
    fn test_merge() {
        let mut graph1 = Graph::new();
        let mut graph2 = Graph::new();

        graph1.add_edge(Edge::new("1", "2", 1000));
        graph1.add_edge(Edge::new("2", "3", 1000));
        graph2.add_edge(Edge::new("2", "3", 1500));
        graph2.remove_edge(Edge::new("1", "2", 1200));

        graph1.merge(&graph2);

        assert_eq!(graph1.added_timestamp(&Edge::new("2", "3", 0)), Some(ts(1500)));
        assert!(!graph1.check_in_graph(&Edge::new("1", "2", 0)));
        assert!(graph1.check_in_graph(&Edge::new("2", "3", 0)));
    }

    #[test]
    fn test_merge_chaining() {
        let mut a = Graph::new();
        let mut b = Graph::new();
        let mut c = Graph::new();
        a.add_edge(Edge::new("1", "2", 1));
        b.add_edge(Edge::new("2", "3", 1));
        c.add_edge(Edge::new("3", "4", 1));

        assert_eq!(a.merge(&b).merge(&c).edge_count(), 3);
    }

    #[test]
    fn test_merge_idempotent() {
        let mut graph = Graph::new();
        graph.add_edge(Edge::new("1", "2", 1000));
        graph.remove_edge(Edge::new("1", "2", 1001));
        graph.add_edge(Edge::new("3", "4", 1000));

        let snapshot = graph.clone();
        graph.merge(&snapshot);
        assert!(CRDT::eq(&graph, &snapshot));
    }

    #[test]
    fn test_merge_commutative() {
        let mut a = Graph::new();
        let mut b = Graph::new();
        a.add_edge(Edge::new("1", "2", 1000));
        a.remove_edge(Edge::new("2", "3", 999));
        b.add_edge(Edge::new("2", "3", 1000));
        b.remove_edge(Edge::new("1", "2", 1001));

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        assert!(CRDT::eq(&ab, &ba));
        assert_eq!(ab.state_hash(), ba.state_hash());
        assert_eq!(ab.current_edges(), ba.current_edges());
    }

    #[test]
    fn test_trait_merge() {
        let mut a = Graph::new();
        let mut b = Graph::new();
        b.add_edge(Edge::new("x", "y", 3));

        assert!(CRDT::merge(&mut a, &b).is_ok());
        assert!(a.check_in_graph(&Edge::new("y", "x", 0)));
        assert!(a.can_merge(&b));
    }

    #[test]
    fn test_validation() {
        let mut graph = Graph::new();
        graph.add_edge(Edge::new("b", "a", 1));
        assert!(graph.validate().is_ok());

        graph
            .removed
            .insert(EdgeKey::from_raw(Vertex::new("z"), Vertex::new("y")), ts(1));
        assert_eq!(graph.validate(), Err(CRDTError::NonCanonicalEdge));
    }

    #[test]
    fn test_state_hash_distinguishes_sets() {
        let mut added = Graph::new();
        added.add_edge(Edge::new("1", "2", 5));
        let mut removed = Graph::new();
        removed.remove_edge(Edge::new("1", "2", 5));

        assert_ne!(added.state_hash(), removed.state_hash());
        assert_ne!(added.state_hash(), Graph::new().state_hash());
    }

    #[test]
    fn test_size_bytes_grows() {
        let mut graph = Graph::new();
        let empty = graph.size_bytes();
        graph.add_edge(Edge::new("alpha", "beta", 1));
        assert!(graph.size_bytes() > empty);
    }

    #[test]
    fn test_partial_order() {
        let mut low = Graph::new();
        low.add_edge(Edge::new("1", "2", 1000));

        let mut high = low.clone();
        high.remove_edge(Edge::new("1", "2", 1001));

        let mut other = Graph::new();
        other.add_edge(Edge::new("3", "4", 1));

        assert_eq!(PartiallyOrdered::partial_cmp(&low, &high), Some(Ordering::Less));
        assert_eq!(PartiallyOrdered::partial_cmp(&high, &low), Some(Ordering::Greater));
        assert_eq!(PartiallyOrdered::partial_cmp(&low, &low.clone()), Some(Ordering::Equal));
        assert!(low.happens_before(&high));
        assert!(low.is_concurrent(&other));
    }

    #[test]
    fn test_delta_since() {
        let mut base = Graph::new();
        base.add_edge(Edge::new("1", "2", 1000));

        let mut ahead = base.clone();
        ahead.add_edge(Edge::new("1", "2", 1200));
        ahead.add_edge(Edge::new("2", "3", 1000));
        ahead.remove_edge(Edge::new("4", "5", 1000));

        assert!(base.delta_since(&ahead).is_none());

        let delta = ahead.delta_since(&base).unwrap();
        assert_eq!(delta.added().count(), 2);
        assert_eq!(delta.removed().count(), 1);
        assert!(Graph::delta_size(&delta) > 0);

        base.apply_delta(&delta).unwrap();
        assert!(CRDT::eq(&base, &ahead));
    }

    #[test]
    fn test_merge_deltas() {
        let mut d1 = Graph::new();
        d1.add_edge(Edge::new("1", "2", 1));
        let mut d2 = Graph::new();
        d2.add_edge(Edge::new("1", "2", 3));
        d2.remove_edge(Edge::new("1", "2", 2));

        let merged = Graph::merge_deltas(&d1, &d2);
        assert_eq!(merged.added_timestamp(&Edge::new("1", "2", 0)), Some(ts(3)));
        assert!(merged.check_in_graph(&Edge::new("1", "2", 0)));
    }

    #[cfg(all(test, feature = "serde"))]
    mod serde_tests {
        use super::*;
        use alloc::string::String;

        #[test]
        fn test_serialize_deserialize() {
            let mut graph = Graph::new();
            graph.add_edge(Edge::new("1", "2", 1000));
            graph.add_edge(Edge::new("3", "2", 1000));
            graph.remove_edge(Edge::new("2", "3", 1001));

            let json = serde_json::to_string(&graph).unwrap();
            let restored: Graph = serde_json::from_str(&json).unwrap();

            assert!(CRDT::eq(&graph, &restored));
            assert!(restored.validate().is_ok());
        }

        #[test]
        fn test_deserialize_folds_duplicates() {
            let json = String::from(
                r#"{"added":[{"v1":"b","v2":"a","timestamp":5},{"v1":"a","v2":"b","timestamp":9}],"removed":[]}"#,
            );
            let graph: Graph = serde_json::from_str(&json).unwrap();

            assert_eq!(graph.added().count(), 1);
            assert_eq!(graph.added_timestamp(&Edge::new("a", "b", 0)), Some(ts(9)));
        }
    }
}
