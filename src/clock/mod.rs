//! Clock management module
//!
//! This module provides the Timestamp type attached to every edge operation.
//! Timestamps are supplied by the caller (wall-clock millis, Lamport clocks, ...);
//! the graph only compares them.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Totally ordered timestamp of an add or remove operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp {
    /// Timestamp value
    pub value: u64,
}

impl Timestamp {
    /// Creates a new timestamp
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    /// Creates a zero timestamp
    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    /// Returns the timestamp value
    pub const fn value(&self) -> u64 {
        self.value
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
