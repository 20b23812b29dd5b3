//! Undirected timestamped edge
//!
//! An [`Edge`] is an operation payload: two vertices plus the timestamp of
//! the add or remove. Its identity is the unordered vertex pair, captured by
//! the canonical [`EdgeKey`].

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::clock::Timestamp;
use crate::graph::Vertex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Canonical identity of a logical edge
///
/// Holds the two endpoints sorted so that `low() <= high()`, which makes
/// `{A, B}` and `{B, A}` the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
    low: Vertex,
    high: Vertex,
}

impl EdgeKey {
    /// Creates the canonical key for the pair, in either argument order
    pub fn new(a: Vertex, b: Vertex) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Builds a key without reordering
    #[cfg(test)]
    pub(crate) fn from_raw(low: Vertex, high: Vertex) -> Self {
        Self { low, high }
    }

    /// Returns the lexicographically smaller endpoint
    pub fn low(&self) -> &Vertex {
        &self.low
    }

    /// Returns the lexicographically larger endpoint
    pub fn high(&self) -> &Vertex {
        &self.high
    }

    /// Returns true if the endpoints are stored in canonical order
    pub fn is_canonical(&self) -> bool {
        self.low <= self.high
    }

    /// Returns true if `vertex` is one of the endpoints
    pub fn is_incident(&self, vertex: &Vertex) -> bool {
        self.low == *vertex || self.high == *vertex
    }

    /// Returns the endpoint opposite to `vertex`
    ///
    /// For a self-loop the vertex itself is returned. `None` if `vertex` is
    /// not an endpoint.
    pub fn opposite(&self, vertex: &Vertex) -> Option<&Vertex> {
        if self.low == *vertex {
            Some(&self.high)
        } else if self.high == *vertex {
            Some(&self.low)
        } else {
            None
        }
    }

    /// Attaches a timestamp, producing an edge
    pub fn at(&self, timestamp: Timestamp) -> Edge {
        Edge {
            v1: self.low.clone(),
            v2: self.high.clone(),
            timestamp,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Edge of the replicated graph
///
/// Equality and hashing look only at the unordered vertex pair: two edges
/// between the same vertices are the same logical edge whatever their
/// timestamps.
///
/// # Example
/// ```rust
/// use lwwgraph::prelude::*;
///
/// let ab = Edge::new("A", "B", 1000);
/// let ba = Edge::new("B", "A", 2000);
/// assert_eq!(ab, ba);
/// assert_eq!(ab.key(), ba.key());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    v1: Vertex,
    v2: Vertex,
    timestamp: Timestamp,
}

impl Edge {
    /// Creates an edge between two vertices at the given timestamp
    pub fn new(v1: impl Into<Vertex>, v2: impl Into<Vertex>, timestamp: u64) -> Self {
        Self {
            v1: v1.into(),
            v2: v2.into(),
            timestamp: Timestamp::new(timestamp),
        }
    }

    /// Returns the first endpoint as given at construction
    pub fn v1(&self) -> &Vertex {
        &self.v1
    }

    /// Returns the second endpoint as given at construction
    pub fn v2(&self) -> &Vertex {
        &self.v2
    }

    /// Returns the operation timestamp
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the canonical logical edge identity
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.v1.clone(), self.v2.clone())
    }

    /// Consumes the edge, returning its key and timestamp
    pub fn into_parts(self) -> (EdgeKey, Timestamp) {
        (EdgeKey::new(self.v1, self.v2), self.timestamp)
    }

    /// Returns true if `vertex` is one of the endpoints
    pub fn is_incident(&self, vertex: &Vertex) -> bool {
        self.v1 == *vertex || self.v2 == *vertex
    }

    /// Returns the endpoint opposite to `vertex`, if it is an endpoint
    pub fn opposite(&self, vertex: &Vertex) -> Option<&Vertex> {
        if self.v1 == *vertex {
            Some(&self.v2)
        } else if self.v2 == *vertex {
            Some(&self.v1)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.v1 == other.v1 && self.v2 == other.v2) || (self.v1 == other.v2 && self.v2 == other.v1)
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with the order-independent PartialEq
        let (low, high) = if self.v1 <= self.v2 {
            (&self.v1, &self.v2)
        } else {
            (&self.v2, &self.v1)
        };
        low.hash(state);
        high.hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}@{}", self.v1, self.v2, self.timestamp)
    }
}
