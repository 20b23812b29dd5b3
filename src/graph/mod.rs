//! Graph CRDT implementation
//!
//! This module provides the LWW-Element graph together with its vertex and
//! edge value types and the connectivity queries run over it.

pub mod edge;
pub mod lww;
pub mod traversal;
pub mod vertex;

// Re-export main types
pub use edge::{Edge, EdgeKey};
pub use lww::Graph;
pub use traversal::Path;
pub use vertex::Vertex;
