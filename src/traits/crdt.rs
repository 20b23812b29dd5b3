//! Base CRDT trait definition
//!
//! This module defines the fundamental CRDT trait that all Conflict-free
//! Replicated Data Types must implement.

use crate::error::CRDTResult;

/// Base trait for all Conflict-free Replicated Data Types
///
/// This trait defines the fundamental operations that all CRDTs must support.
pub trait CRDT {
    /// The error type for CRDT operations
    type Error;

    /// Merges another CRDT instance into this one
    ///
    /// This operation must be:
    /// - Commutative: merge(a, b) = merge(b, a)
    /// - Associative: merge(merge(a, b), c) = merge(a, merge(b, c))
    /// - Idempotent: merge(a, a) = a
    ///
    /// # Arguments
    ///
    /// * `other` - The other CRDT instance to merge
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if the merge was successful, or an error if the merge failed.
    fn merge(&mut self, other: &Self) -> CRDTResult<()>;

    /// Checks if this CRDT is equal to another
    ///
    /// Two CRDTs are considered equal if they represent the same logical state,
    /// regardless of their internal representation or history.
    fn eq(&self, other: &Self) -> bool;

    /// Returns the current size of the CRDT in bytes
    ///
    /// This includes all internal state and metadata required for the CRDT
    /// to function correctly, heap allocations included.
    fn size_bytes(&self) -> usize;

    /// Validates the internal consistency of the CRDT
    ///
    /// This method checks that the CRDT's internal state is consistent and
    /// that all invariants are maintained.
    fn validate(&self) -> CRDTResult<()>;

    /// Returns a hash of the CRDT's logical state
    ///
    /// This hash should be the same for CRDTs that represent the same logical
    /// state, regardless of their internal representation.
    fn state_hash(&self) -> u32;

    /// Checks if the CRDT can be merged with another without exceeding limits
    fn can_merge(&self, other: &Self) -> bool;
}

/// Trait for CRDTs that support partial ordering
///
/// Replica states form a join semilattice; this trait exposes its order.
pub trait PartiallyOrdered: CRDT {
    /// Compares two states in the lattice order
    ///
    /// Returns `Some(Less)` if this state is dominated by the other,
    /// `Some(Equal)` if they are identical, `Some(Greater)` if this state
    /// dominates, or `None` if they are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering>;

    /// Checks if this state is strictly dominated by another
    fn happens_before(&self, other: &Self) -> bool {
        matches!(self.partial_cmp(other), Some(core::cmp::Ordering::Less))
    }

    /// Checks if this CRDT is concurrent with another
    fn is_concurrent(&self, other: &Self) -> bool {
        self.partial_cmp(other).is_none()
    }
}

/// Trait for CRDTs that support delta operations
///
/// Delta CRDTs can generate and apply deltas (incremental changes) rather
/// than merging entire states, which can be more efficient for network
/// transmission.
pub trait DeltaCRDT: CRDT {
    /// The type representing a delta (incremental change)
    type Delta;

    /// Generates a delta holding the parts of this state that `other` lacks
    fn delta_since(&self, other: &Self) -> Option<Self::Delta>;

    /// Applies a delta to this CRDT
    fn apply_delta(&mut self, delta: &Self::Delta) -> CRDTResult<()>;

    /// Merges two deltas into a single delta
    fn merge_deltas(delta1: &Self::Delta, delta2: &Self::Delta) -> Self::Delta;

    /// Returns the size of a delta in bytes
    fn delta_size(delta: &Self::Delta) -> usize;
}
