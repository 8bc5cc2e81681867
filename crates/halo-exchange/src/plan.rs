//! The six paired exchanges and the face descriptors they use.
//!
//! Each ghost layer `i` is refreshed by six paired send-receives. Every
//! pair sends one interior slab toward a neighbor while receiving the
//! opposite neighbor's slab into the matching ghost slab:
//!
//! ```text
//!            send (high face)            recv (low ghost)
//! Z  top     z = nn + (MZ-1) - i   <-   z = (nn-1) - i      from bottom
//! Z  bottom  z = nn + i            ->   z = nn + MZ + i     from top
//! X  east    x = nn + (MX-1) - i        x = (nn-1) - i      from west
//! X  west    x = nn + i                 x = nn + MX + i     from east
//! Y  north   y = nn + (MY-1) - i        y = (nn-1) - i      from south
//! Y  south   y = nn + i                 y = nn + MY + i     from north
//! ```
//!
//! Slab base offsets are the slab coordinate times the axis stride; the
//! descriptor for the axis supplies the rest of the selection.

use std::fmt;

use halo_core::{Axis, Face, FaceDescriptor, Neighbors, PaddedGrid, Tag, Transfer};

/// One of the six paired send-receives run for every ghost layer.
///
/// Named after the face the local slab is sent through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangePair {
    /// Send the topmost interior layer up; receive into the bottom ghost.
    SendTop,
    /// Send the bottommost interior layer down; receive into the top ghost.
    SendBottom,
    /// Send the eastmost interior layer east; receive into the west ghost.
    SendEast,
    /// Send the westmost interior layer west; receive into the east ghost.
    SendWest,
    /// Send the northmost interior layer north; receive into the south ghost.
    SendNorth,
    /// Send the southmost interior layer south; receive into the north ghost.
    SendSouth,
}

impl ExchangePair {
    /// The order every process issues the pairs in, per ghost layer.
    pub const CANONICAL_ORDER: [ExchangePair; 6] = [
        ExchangePair::SendTop,
        ExchangePair::SendBottom,
        ExchangePair::SendEast,
        ExchangePair::SendWest,
        ExchangePair::SendNorth,
        ExchangePair::SendSouth,
    ];

    /// Message tag; distinct per pair.
    pub fn tag(self) -> Tag {
        match self {
            Self::SendTop => Tag(111),
            Self::SendBottom => Tag(222),
            Self::SendEast => Tag(333),
            Self::SendWest => Tag(444),
            Self::SendNorth => Tag(555),
            Self::SendSouth => Tag(666),
        }
    }

    /// Face the send leg leaves through.
    pub fn send_face(self) -> Face {
        match self {
            Self::SendTop => Face::Top,
            Self::SendBottom => Face::Bottom,
            Self::SendEast => Face::East,
            Self::SendWest => Face::West,
            Self::SendNorth => Face::North,
            Self::SendSouth => Face::South,
        }
    }

    /// Face the receive leg arrives through.
    pub fn recv_face(self) -> Face {
        self.send_face().opposite()
    }

    /// Axis the exchanged slabs are normal to.
    pub fn axis(self) -> Axis {
        self.send_face().axis()
    }

    /// Padded coordinate (along [`axis`](Self::axis)) of the interior slab
    /// sent for ghost layer `layer`.
    pub fn send_coord(self, grid: &PaddedGrid, layer: usize) -> usize {
        let nn = grid.ghost();
        let m = grid.extents().get(self.axis());
        if self.send_face().is_high() {
            nn + (m - 1) - layer
        } else {
            nn + layer
        }
    }

    /// Padded coordinate (along [`axis`](Self::axis)) of the ghost slab
    /// received into for ghost layer `layer`.
    pub fn recv_coord(self, grid: &PaddedGrid, layer: usize) -> usize {
        let nn = grid.ghost();
        let m = grid.extents().get(self.axis());
        if self.send_face().is_high() {
            (nn - 1) - layer
        } else {
            nn + m + layer
        }
    }

    /// Both legs of this pair for ghost layer `layer`.
    pub fn transfers(
        self,
        grid: &PaddedGrid,
        plan: &FacePlan,
        layer: usize,
        neighbors: &Neighbors,
    ) -> (Transfer, Transfer) {
        debug_assert!(layer < grid.ghost());
        let axis = self.axis();
        let stride = grid.stride(axis);
        let descriptor = plan.descriptor(axis);
        let tag = self.tag();
        let send = Transfer {
            peer: neighbors.get(self.send_face()),
            tag,
            base: self.send_coord(grid, layer) * stride,
            descriptor,
        };
        let recv = Transfer {
            peer: neighbors.get(self.recv_face()),
            tag,
            base: self.recv_coord(grid, layer) * stride,
            descriptor,
        };
        (send, recv)
    }
}

impl fmt::Display for ExchangePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "send-{}", self.send_face())
    }
}

/// The three face descriptors for one grid geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacePlan {
    /// Descriptor for X-normal (west/east) faces.
    pub x: FaceDescriptor,
    /// Descriptor for Y-normal (south/north) faces.
    pub y: FaceDescriptor,
    /// Descriptor for Z-normal (bottom/top) faces; always contiguous.
    pub z: FaceDescriptor,
}

impl FacePlan {
    /// Build the descriptors for `grid`.
    pub fn build(grid: &PaddedGrid) -> Self {
        Self {
            x: FaceDescriptor::x_normal(grid),
            y: FaceDescriptor::y_normal(grid),
            z: FaceDescriptor::z_normal(grid),
        }
    }

    /// Descriptor for faces normal to `axis`.
    pub fn descriptor(&self, axis: Axis) -> FaceDescriptor {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{GridExtents, Neighbor, Rank};
    use std::collections::HashSet;

    fn grid(nn: usize) -> PaddedGrid {
        PaddedGrid::new(GridExtents::new(4, 3, 2), nn).unwrap()
    }

    #[test]
    fn tags_are_distinct() {
        let tags: HashSet<Tag> = ExchangePair::CANONICAL_ORDER
            .iter()
            .map(|p| p.tag())
            .collect();
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn canonical_order_is_z_then_x_then_y() {
        let axes: Vec<Axis> = ExchangePair::CANONICAL_ORDER
            .iter()
            .map(|p| p.axis())
            .collect();
        assert_eq!(axes, vec![Axis::Z, Axis::Z, Axis::X, Axis::X, Axis::Y, Axis::Y]);
    }

    #[test]
    fn offsets_follow_the_pairing_table() {
        let g = grid(2);
        // MX=4, MY=3, MZ=2, nn=2.
        for layer in 0..2 {
            assert_eq!(ExchangePair::SendTop.send_coord(&g, layer), 2 + 1 - layer);
            assert_eq!(ExchangePair::SendTop.recv_coord(&g, layer), 1 - layer);
            assert_eq!(ExchangePair::SendBottom.send_coord(&g, layer), 2 + layer);
            assert_eq!(ExchangePair::SendBottom.recv_coord(&g, layer), 4 + layer);
            assert_eq!(ExchangePair::SendEast.send_coord(&g, layer), 2 + 3 - layer);
            assert_eq!(ExchangePair::SendEast.recv_coord(&g, layer), 1 - layer);
            assert_eq!(ExchangePair::SendWest.send_coord(&g, layer), 2 + layer);
            assert_eq!(ExchangePair::SendWest.recv_coord(&g, layer), 6 + layer);
            assert_eq!(ExchangePair::SendNorth.send_coord(&g, layer), 2 + 2 - layer);
            assert_eq!(ExchangePair::SendNorth.recv_coord(&g, layer), 1 - layer);
            assert_eq!(ExchangePair::SendSouth.send_coord(&g, layer), 2 + layer);
            assert_eq!(ExchangePair::SendSouth.recv_coord(&g, layer), 5 + layer);
        }
    }

    #[test]
    fn send_slabs_are_interior_and_recv_slabs_are_ghost() {
        let g = grid(2);
        for pair in ExchangePair::CANONICAL_ORDER {
            let interior = g.interior_range(pair.axis());
            for layer in 0..g.ghost() {
                assert!(interior.contains(&pair.send_coord(&g, layer)), "{pair} layer {layer}");
                assert!(!interior.contains(&pair.recv_coord(&g, layer)), "{pair} layer {layer}");
            }
        }
    }

    #[test]
    fn send_slab_lands_where_peer_expects_its_ghost() {
        // The slab I send through a face must be the slab my neighbour
        // would have just inside its own ghost layer on the facing side:
        // sent layer `i` fills the peer's ghost `i` counting outward.
        let g = grid(2);
        for pair in ExchangePair::CANONICAL_ORDER {
            let m = g.extents().get(pair.axis());
            for layer in 0..g.ghost() {
                let sent = pair.send_coord(&g, layer) as isize;
                let recv = pair.recv_coord(&g, layer) as isize;
                let shift = if pair.send_face().is_high() { m as isize } else { -(m as isize) };
                assert_eq!(sent - shift, recv, "{pair} layer {layer}");
            }
        }
    }

    #[test]
    fn transfers_pick_peers_bases_and_descriptors() {
        let g = grid(1);
        let plan = FacePlan::build(&g);
        let mut n = Neighbors::isolated();
        n.west = Neighbor::Peer(Rank(1));
        n.east = Neighbor::Peer(Rank(2));

        let (send, recv) = ExchangePair::SendEast.transfers(&g, &plan, 0, &n);
        assert_eq!(send.peer, Neighbor::Peer(Rank(2)));
        assert_eq!(recv.peer, Neighbor::Peer(Rank(1)));
        assert_eq!(send.tag, Tag(333));
        assert_eq!(send.base, g.index3d(4, 0, 0));
        assert_eq!(recv.base, g.index3d(0, 0, 0));
        assert_eq!(send.descriptor, FaceDescriptor::x_normal(&g));

        let (send, recv) = ExchangePair::SendSouth.transfers(&g, &plan, 0, &n);
        assert_eq!(send.peer, Neighbor::Boundary);
        assert_eq!(send.base, g.index3d(0, 1, 0));
        assert_eq!(recv.base, g.index3d(0, 4, 0));
        assert_eq!(recv.descriptor, FaceDescriptor::y_normal(&g));

        let (send, recv) = ExchangePair::SendTop.transfers(&g, &plan, 0, &n);
        assert_eq!(send.base, g.index3d(0, 0, 2));
        assert_eq!(recv.base, 0);
        assert!(send.descriptor.is_contiguous());
        assert_eq!(send.element_count(), 0);
    }

    #[test]
    fn every_transfer_fits_the_scratch_buffer() {
        let g = grid(2);
        let plan = FacePlan::build(&g);
        let n = Neighbors::uniform(Neighbor::Peer(Rank(0)));
        for layer in 0..g.ghost() {
            for pair in ExchangePair::CANONICAL_ORDER {
                let (send, recv) = pair.transfers(&g, &plan, layer, &n);
                assert!(send.descriptor.check_bounds(send.base, g.padded_voxels()).is_ok());
                assert!(recv.descriptor.check_bounds(recv.base, g.padded_voxels()).is_ok());
            }
        }
    }
}
