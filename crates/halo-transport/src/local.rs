//! Channel-backed transport for ranks running as threads of one process.
//!
//! Every rank owns one unbounded inbox. A rank holds a sender for each
//! distinct face-neighbor, so a send is a non-blocking enqueue and a
//! paired send-receive can never deadlock regardless of how the two
//! peers interleave. Receives block until a message with the expected
//! `(source, tag)` arrives; anything else that arrives first is parked
//! and matched later in arrival order.

use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use halo_core::{Neighbor, Neighbors, Rank, Tag, Transfer, Transport, TransportError};

use crate::config::LocalTransportConfig;
use crate::topology::ProcessGrid;

/// One packed face slab in flight.
#[derive(Debug)]
struct Envelope {
    source: Rank,
    tag: Tag,
    payload: Vec<f64>,
}

/// One rank's endpoint of a [`LocalCluster`].
///
/// Move each endpoint to its own thread; the endpoint is `Send` but the
/// exchange is only meaningful when every rank runs concurrently.
#[derive(Debug)]
pub struct LocalTransport {
    rank: Rank,
    neighbors: Neighbors,
    config: LocalTransportConfig,
    inbox: Receiver<Envelope>,
    outboxes: IndexMap<Rank, Sender<Envelope>>,
    pending: SmallVec<[Envelope; 4]>,
    messages_sent: u64,
    messages_received: u64,
}

impl LocalTransport {
    /// Messages enqueued to peers so far.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Messages consumed by matching receives so far.
    pub fn messages_received(&self) -> u64 {
        self.messages_received
    }

    /// Messages that arrived but have not been matched yet.
    pub fn parked(&self) -> usize {
        self.pending.len()
    }

    fn send_to(&mut self, peer: Rank, tag: Tag, payload: Vec<f64>) -> Result<(), TransportError> {
        let neighbor = Neighbor::Peer(peer);
        let tx = self
            .outboxes
            .get(&peer)
            .ok_or(TransportError::UnknownPeer { peer: neighbor })?;
        tx.send(Envelope {
            source: self.rank,
            tag,
            payload,
        })
        .map_err(|_| TransportError::PeerDisconnected { peer: neighbor })?;
        self.messages_sent += 1;
        Ok(())
    }

    fn receive_from(&mut self, source: Rank, tag: Tag) -> Result<Vec<f64>, TransportError> {
        let peer = Neighbor::Peer(source);
        if !self.outboxes.contains_key(&source) {
            return Err(TransportError::UnknownPeer { peer });
        }
        if let Some(pos) = self
            .pending
            .iter()
            .position(|e| e.source == source && e.tag == tag)
        {
            self.messages_received += 1;
            return Ok(self.pending.remove(pos).payload);
        }

        let deadline = self.config.recv_timeout.map(|t| Instant::now() + t);
        loop {
            let envelope = match deadline {
                Some(deadline) => self.inbox.recv_deadline(deadline).map_err(|e| match e {
                    RecvTimeoutError::Timeout => TransportError::Timeout { peer, tag },
                    RecvTimeoutError::Disconnected => TransportError::PeerDisconnected { peer },
                })?,
                None => self
                    .inbox
                    .recv()
                    .map_err(|_| TransportError::PeerDisconnected { peer })?,
            };
            if envelope.source == source && envelope.tag == tag {
                self.messages_received += 1;
                return Ok(envelope.payload);
            }
            warn!(
                rank = %self.rank,
                expected_source = %source,
                expected_tag = %tag,
                got_source = %envelope.source,
                got_tag = %envelope.tag,
                "parking out-of-order message"
            );
            self.pending.push(envelope);
        }
    }
}

impl Transport for LocalTransport {
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
        if let Neighbor::Peer(dest) = send.peer {
            let payload = send.descriptor.pack(buf, send.base)?;
            self.send_to(dest, send.tag, payload)?;
        }
        if let Neighbor::Peer(source) = recv.peer {
            recv.descriptor.check_bounds(recv.base, buf.len())?;
            let payload = self.receive_from(source, recv.tag)?;
            recv.descriptor.unpack(buf, recv.base, &payload)?;
        }
        Ok(())
    }
}

/// A set of in-process ranks wired according to their neighbor tables.
///
/// # Examples
///
/// ```
/// use halo_transport::{LocalCluster, ProcessGrid};
///
/// let cluster = LocalCluster::new(&ProcessGrid::periodic([2, 2, 1]).unwrap());
/// assert_eq!(cluster.len(), 4);
/// let transports = cluster.into_transports();
/// assert_eq!(transports.len(), 4);
/// ```
#[derive(Debug)]
pub struct LocalCluster {
    transports: Vec<LocalTransport>,
}

impl LocalCluster {
    /// Wire every rank of `grid` with the default configuration.
    pub fn new(grid: &ProcessGrid) -> Self {
        Self::with_config(grid, LocalTransportConfig::default())
    }

    /// Wire every rank of `grid`.
    pub fn with_config(grid: &ProcessGrid, config: LocalTransportConfig) -> Self {
        let tables: Vec<Neighbors> = grid.ranks().map(|r| grid.neighbors(r)).collect();
        let transports = Self::wire(tables, config);
        debug!(
            ranks = transports.len(),
            dims = ?grid.dims(),
            periodic = ?grid.periodicity(),
            "local cluster wired"
        );
        Self { transports }
    }

    /// Wire ranks from explicit neighbor tables; `tables[r]` belongs to
    /// rank `r`.
    ///
    /// Fails if any table names a rank outside the cluster.
    pub fn from_neighbors(
        tables: Vec<Neighbors>,
        config: LocalTransportConfig,
    ) -> Result<Self, TransportError> {
        for table in &tables {
            for peer in table.peers() {
                if peer.0 as usize >= tables.len() {
                    return Err(TransportError::UnknownPeer {
                        peer: Neighbor::Peer(peer),
                    });
                }
            }
        }
        Ok(Self {
            transports: Self::wire(tables, config),
        })
    }

    fn wire(tables: Vec<Neighbors>, config: LocalTransportConfig) -> Vec<LocalTransport> {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..tables.len())
            .map(|_| crossbeam_channel::unbounded::<Envelope>())
            .unzip();
        tables
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(r, (neighbors, inbox))| {
                let outboxes = neighbors
                    .peers()
                    .into_iter()
                    .map(|peer| (peer, senders[peer.0 as usize].clone()))
                    .collect();
                LocalTransport {
                    rank: Rank(r as u32),
                    neighbors,
                    config,
                    inbox,
                    outboxes,
                    pending: SmallVec::new(),
                    messages_sent: 0,
                    messages_received: 0,
                }
            })
            .collect()
    }

    /// Number of ranks.
    pub fn len(&self) -> usize {
        self.transports.len()
    }

    /// Whether the cluster has no ranks.
    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Hand out the per-rank endpoints, ordered by rank.
    pub fn into_transports(self) -> Vec<LocalTransport> {
        self.transports
    }
}

impl IntoIterator for LocalCluster {
    type Item = LocalTransport;
    type IntoIter = std::vec::IntoIter<LocalTransport>;

    fn into_iter(self) -> Self::IntoIter {
        self.transports.into_iter()
    }
}
