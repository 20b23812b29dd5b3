//! Connectivity queries over the current graph
//!
//! Both queries run on the materialized current graph, so a removed edge is
//! invisible to them exactly when [`Graph::check_in_graph`] reports it absent.

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

use tracing::debug;

use crate::graph::{Graph, Vertex};

/// Sequence of vertices from a start vertex to a target, both included
pub type Path = Vec<Vertex>;

/// Undirected adjacency of the current graph
type Adjacency<'g> = BTreeMap<&'g Vertex, Vec<&'g Vertex>>;

impl Graph {
    /// Returns the other endpoint of every current edge incident to `vertex`
    ///
    /// A vertex with no current edges yields an empty vector. A self-loop
    /// reports the vertex itself once.
    ///
    /// # Example
    /// ```rust
    /// use lwwgraph::prelude::*;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_edge(Edge::new("1", "2", 1000));
    /// graph.add_edge(Edge::new("2", "3", 1000));
    /// graph.remove_edge(Edge::new("3", "2", 1001));
    ///
    /// assert_eq!(graph.find_connected(&Vertex::new("2")), vec![Vertex::new("1")]);
    /// ```
    pub fn find_connected(&self, vertex: &Vertex) -> Vec<Vertex> {
        self.current_keys()
            .filter_map(|key| key.opposite(vertex))
            .cloned()
            .collect()
    }

    /// Finds a shortest path (by edge count) between two vertices
    ///
    /// Returns `[from]` when `from == to`, and an empty path when `to` cannot
    /// be reached. Neighbours are explored in canonical edge order, so the
    /// choice between equally short paths is deterministic.
    ///
    /// # Example
    /// ```rust
    /// use lwwgraph::prelude::*;
    ///
    /// let mut graph = Graph::new();
    /// for (a, b) in [("1", "2"), ("2", "3"), ("3", "4"), ("4", "5"), ("1", "5")] {
    ///     graph.add_edge(Edge::new(a, b, 1000));
    /// }
    /// graph.remove_edge(Edge::new("4", "5", 1001));
    ///
    /// let path = graph.find_path(&Vertex::new("2"), &Vertex::new("5"));
    /// assert_eq!(path, vec![Vertex::new("2"), Vertex::new("1"), Vertex::new("5")]);
    /// ```
    pub fn find_path(&self, from: &Vertex, to: &Vertex) -> Path {
        if from == to {
            return vec![from.clone()];
        }

        let adjacency = self.adjacency();
        let mut visited: BTreeSet<&Vertex> = BTreeSet::new();
        let mut predecessors: BTreeMap<&Vertex, &Vertex> = BTreeMap::new();
        let mut queue: VecDeque<&Vertex> = VecDeque::new();

        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            let Some(neighbours) = adjacency.get(current) else {
                continue;
            };

            for &next in neighbours {
                if !visited.insert(next) {
                    continue;
                }
                predecessors.insert(next, current);

                if next == to {
                    let path = unwind(&predecessors, from, next);
                    debug!(%from, %to, hops = path.len() - 1, "path found");
                    return path;
                }
                queue.push_back(next);
            }
        }

        debug!(%from, %to, visited = visited.len(), "no path");
        Vec::new()
    }

    fn adjacency(&self) -> Adjacency<'_> {
        let mut adjacency = Adjacency::new();
        for key in self.current_keys() {
            adjacency.entry(key.low()).or_default().push(key.high());
            if key.low() != key.high() {
                adjacency.entry(key.high()).or_default().push(key.low());
            }
        }
        adjacency
    }
}

/// Walks the predecessor chain back from `to` and returns it in forward order
fn unwind(predecessors: &BTreeMap<&Vertex, &Vertex>, from: &Vertex, to: &Vertex) -> Path {
    let mut path = vec![to.clone()];
    let mut cursor = to;
    while cursor != from {
        match predecessors.get(cursor) {
            Some(&previous) => {
                path.push(previous.clone());
                cursor = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
