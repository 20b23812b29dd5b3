//! Core CRDT traits module
//!
//! This module defines the traits replicated types implement so that generic
//! replication code can merge, compare and diff them.

pub mod crdt;

// Re-export main traits
pub use crdt::{CRDT, DeltaCRDT, PartiallyOrdered};
