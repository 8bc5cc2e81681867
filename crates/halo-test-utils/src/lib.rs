//! Test utilities and mock transports for halo exchange development.
//!
//! Provides [`RecordingTransport`], a single-process mock of the
//! [`Transport`] trait that records every paired send-receive, plus the
//! fixtures in [`fixtures`] for filling padded fields, walking ghost
//! regions, and running a [`LocalCluster`](halo_transport::LocalCluster)
//! on scoped threads.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fill_interior, fill_interleaved, ghost_voxels, interior_voxels, run_cluster, Decomposition,
};

use halo_core::{Neighbor, Neighbors, Rank, Transfer, Transport, TransportError};

/// One `sendrecv` as seen by a [`RecordingTransport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub send: Transfer,
    pub recv: Transfer,
}

/// Mock transport that records calls instead of communicating.
///
/// Received regions are left alone unless a fill value is set with
/// [`with_recv_fill`](Self::with_recv_fill), in which case every element
/// of a non-boundary receive region is overwritten with it. A failure
/// can be injected at a given call index with [`fail_at`](Self::fail_at).
#[derive(Debug)]
pub struct RecordingTransport {
    rank: Rank,
    neighbors: Neighbors,
    calls: Vec<RecordedCall>,
    recv_fill: Option<f64>,
    fail_at: Option<usize>,
}

impl RecordingTransport {
    pub fn new(rank: Rank, neighbors: Neighbors) -> Self {
        Self {
            rank,
            neighbors,
            calls: Vec::new(),
            recv_fill: None,
            fail_at: None,
        }
    }

    /// Overwrite received regions with `value`.
    pub fn with_recv_fill(mut self, value: f64) -> Self {
        self.recv_fill = Some(value);
        self
    }

    /// Fail the call with index `n` (zero-based) as if the peer vanished.
    pub fn fail_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Calls recorded so far, in issue order.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Transport for RecordingTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    fn sendrecv(
        &mut self,
        buf: &mut [f64],
        send: Transfer,
        recv: Transfer,
    ) -> Result<(), TransportError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(TransportError::PeerDisconnected { peer: send.peer });
        }
        if !send.peer.is_boundary() {
            send.descriptor.check_bounds(send.base, buf.len())?;
        }
        if let Neighbor::Peer(_) = recv.peer {
            recv.descriptor.check_bounds(recv.base, buf.len())?;
            if let Some(value) = self.recv_fill {
                for offset in recv.descriptor.offsets(recv.base) {
                    buf[offset] = value;
                }
            }
        }
        self.calls.push(RecordedCall { send, recv });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{FaceDescriptor, Tag};

    fn leg(peer: Neighbor, base: usize) -> Transfer {
        Transfer {
            peer,
            tag: Tag(111),
            base,
            descriptor: FaceDescriptor::contiguous(2),
        }
    }

    #[test]
    fn records_and_fills() {
        let peer = Neighbor::Peer(Rank(0));
        let mut t = RecordingTransport::new(Rank(0), Neighbors::uniform(peer)).with_recv_fill(5.0);
        let mut buf = vec![0.0; 4];
        t.sendrecv(&mut buf, leg(peer, 0), leg(peer, 2)).unwrap();
        assert_eq!(buf, vec![0.0, 0.0, 5.0, 5.0]);
        assert_eq!(t.calls().len(), 1);
    }

    #[test]
    fn boundary_receive_is_not_filled() {
        let mut t = RecordingTransport::new(Rank(0), Neighbors::isolated()).with_recv_fill(5.0);
        let mut buf = vec![0.0; 4];
        t.sendrecv(&mut buf, leg(Neighbor::Boundary, 0), leg(Neighbor::Boundary, 2))
            .unwrap();
        assert_eq!(buf, vec![0.0; 4]);
    }

    #[test]
    fn injected_failure_is_not_recorded() {
        let peer = Neighbor::Peer(Rank(1));
        let mut t = RecordingTransport::new(Rank(0), Neighbors::uniform(peer)).fail_at(1);
        let mut buf = vec![0.0; 4];
        t.sendrecv(&mut buf, leg(peer, 0), leg(peer, 2)).unwrap();
        assert!(t.sendrecv(&mut buf, leg(peer, 0), leg(peer, 2)).is_err());
        assert_eq!(t.calls().len(), 1);
    }
}
