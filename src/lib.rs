#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

//! **Replicated Undirected Graphs with Last-Writer-Wins Edges**
//!
//! lwwgraph is a `no_std` (+ `alloc`) Rust library implementing an undirected
//! graph as a Conflict-free Replicated Data Type. Each edge is an element of a
//! Last-Writer-Wins Element Set: replicas add and remove edges independently,
//! without coordination, and later merge their states into the same graph.
//!
//! ## Features
//!
//! - **Coordination-free** - every replica mutates its own [`Graph`] freely
//! - **Deterministic merge** - pointwise maximum over add and remove timestamps
//! - **Add-biased ties** - an add and a remove with equal timestamps keep the edge
//! - **Derived current graph** - presence is computed from both sets on every query
//! - **Connectivity queries** - neighbours and shortest unweighted paths
//!
//! ## Feature Overview
//!
//! ### Serialization Features
//! - `serde` - Serde serialization support (no_std compatible)
//!
//! ## Quick Start
//!
//! ```rust
//! use lwwgraph::prelude::*;
//!
//! // Two replicas edit concurrently
//! let mut laptop = Graph::new();
//! laptop.add_edge(Edge::new("alice", "bob", 1000));
//! laptop.add_edge(Edge::new("bob", "carol", 1000));
//!
//! let mut phone = Graph::new();
//! phone.add_edge(Edge::new("carol", "dave", 1001));
//! phone.remove_edge(Edge::new("bob", "alice", 1002));
//!
//! // Automatic conflict resolution
//! laptop.merge(&phone);
//! phone.merge(&laptop);
//! assert_eq!(laptop.current_edges(), phone.current_edges());
//!
//! let path = laptop.find_path(&Vertex::new("bob"), &Vertex::new("dave"));
//! assert_eq!(path.len(), 3);
//! ```
//!
//! ## Timestamps
//!
//! Timestamps are opaque `u64` values supplied by the caller: wall-clock
//! milliseconds, Lamport clocks, anything totally ordered. The graph never
//! reads a clock itself.
//!
//! ## Logging
//!
//! Operations emit [`tracing`] events (`trace` per add/remove, `debug` per
//! merge and path search). Install any subscriber to see them.
//!
//! [`Graph`]: crate::graph::Graph

#![no_std]
#![deny(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

// Core infrastructure modules
pub mod clock;
pub mod error;
pub mod traits;

// Graph CRDT
pub mod graph;

/// Prelude module of lwwgraph
///
/// Convenient re-exports for common lwwgraph types and traits
pub mod prelude {

    // Re-export core traits
    pub use crate::traits::*;

    // Re-export error types
    pub use crate::error::{CRDTError, CRDTResult};

    // Re-export clock types
    pub use crate::clock::Timestamp;

    // Re-export graph types
    pub use crate::graph::{Edge, EdgeKey, Graph, Path, Vertex};
}
