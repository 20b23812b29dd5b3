//! Error handling module for lwwgraph
//!
//! This module provides the error type returned at the CRDT trait seam.

pub mod types;

// Re-export main types
pub use types::{CRDTError, CRDTResult};
