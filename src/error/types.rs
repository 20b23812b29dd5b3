//! Core error types for lwwgraph
//!
//! Graph operations themselves are total; these errors surface only at the
//! trait seam and from state validation.

use core::fmt;

/// Main error type for CRDT operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CRDTError {
    /// A stored edge key has its vertices out of canonical order
    NonCanonicalEdge,
    /// Invalid state detected
    InvalidState,
}

impl CRDTError {
    /// Returns true if this is a recoverable error
    ///
    /// Both variants describe a corrupted replica state. Re-merging the
    /// replica into a fresh graph folds it back into a valid one.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::NonCanonicalEdge => true,
            Self::InvalidState => false,
        }
    }

    /// Returns the error category as a string
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NonCanonicalEdge | Self::InvalidState => "CRDT",
        }
    }
}

impl fmt::Display for CRDTError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonCanonicalEdge => f.write_str("edge key is not in canonical order"),
            Self::InvalidState => f.write_str("invalid CRDT state"),
        }
    }
}

impl core::error::Error for CRDTError {}

/// Result type for CRDT operations
pub type CRDTResult<T> = Result<T, CRDTError>;
