//! The transport abstraction the exchange engine is written against.

use crate::descriptor::FaceDescriptor;
use crate::error::TransportError;
use crate::face::{Face, Neighbor, Neighbors};
use crate::id::{Rank, Tag};

/// One leg of a paired send-receive.
///
/// Names a peer, a tag, and a strided region of the local buffer given
/// as a base offset plus a [`FaceDescriptor`]. For the send leg the
/// region is read; for the receive leg it is overwritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    /// Destination (send leg) or source (receive leg).
    pub peer: Neighbor,
    /// Match tag.
    pub tag: Tag,
    /// Offset of the first selected element.
    pub base: usize,
    /// Shape of the selected region.
    pub descriptor: FaceDescriptor,
}

impl Transfer {
    /// Elements moved by this leg, or zero if the peer is a boundary.
    pub fn element_count(&self) -> usize {
        if self.peer.is_boundary() {
            0
        } else {
            self.descriptor.element_count()
        }
    }
}

/// A process's view of the distributed topology.
///
/// Exposes the calling rank, its six face-neighbors, and a blocking
/// paired send-receive. Implementations must:
///
/// - complete both legs before returning, so received data is usable
///   immediately;
/// - never require the two peers to agree on who sends first;
/// - treat a [`Neighbor::Boundary`] peer as "skip this leg" rather than
///   an error;
/// - match receives on `(source, tag)` so that distinct logical pairs
///   sharing a neighbor cannot cross-match.
///
/// The send region and receive region of one call lie in the same
/// buffer but never overlap.
pub trait Transport {
    /// The calling process.
    fn rank(&self) -> Rank;

    /// The six face-neighbors of the calling process.
    fn neighbors(&self) -> Neighbors;

    /// Send `send`'s region of `buf` while receiving into `recv`'s region.
    fn sendrecv(&mut self, buf: &mut [f64], send: Transfer, recv: Transfer)
        -> Result<(), TransportError>;

    /// Convenience lookup of one neighbor.
    fn neighbor(&self, face: Face) -> Neighbor {
        self.neighbors().get(face)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn neighbors(&self) -> Neighbors {
        (**self).neighbors()
    }

    fn sendrecv(
        &mut self,
        buf: &mut [f64],
        send: Transfer,
        recv: Transfer,
    ) -> Result<(), TransportError> {
        (**self).sendrecv(buf, send, recv)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn neighbors(&self) -> Neighbors {
        (**self).neighbors()
    }

    fn sendrecv(
        &mut self,
        buf: &mut [f64],
        send: Transfer,
        recv: Transfer,
    ) -> Result<(), TransportError> {
        (**self).sendrecv(buf, send, recv)
    }
}
