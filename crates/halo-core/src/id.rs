//! Strongly-typed identifiers for ranks and message tags.

use std::fmt;

/// Identifies one process (rank) of the distributed grid.
///
/// Ranks are assigned sequentially by whatever launched the cluster.
/// `Rank(n)` is diagnostic outside the transport: the exchange engine
/// only ever hands ranks back to the transport as peers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Message tag used to match a send leg with its receive leg.
///
/// Every logical exchange pair carries a distinct tag so that messages
/// cannot cross-match when one neighbor serves several directions
/// (periodic wraparound with two ranks along an axis, or a rank that
/// is its own neighbor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u32);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Tag {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
