//! Graph vertex
//!
//! A vertex is nothing but a caller-chosen identifier that is unique across
//! every replica. Identity is plain string equality.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertex of the replicated graph
///
/// # Example
/// ```rust
/// use lwwgraph::prelude::*;
///
/// let a = Vertex::new("node-a");
/// assert_eq!(a, Vertex::from("node-a"));
/// assert_eq!(a.id(), "node-a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Vertex {
    id: String,
}

impl Vertex {
    /// Creates a vertex with the given identifier
    ///
    /// The identifier is not interpreted; an empty string is a valid vertex.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Returns the vertex identifier
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl From<&str> for Vertex {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Vertex {
    fn from(id: String) -> Self {
        Self { id }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
