//! Axes, faces, and the six-neighbor table of a sub-block.

use crate::id::Rank;
use smallvec::SmallVec;
use std::fmt;

/// One of the three Cartesian axes of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Fastest-varying axis in memory.
    X,
    /// Middle axis in memory.
    Y,
    /// Slowest-varying axis in memory.
    Z,
}

impl Axis {
    /// All axes in memory order (fastest first).
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Z => write!(f, "z"),
        }
    }
}

/// One of the six faces of a sub-block.
///
/// West/east are the low/high X faces, south/north the low/high Y
/// faces, bottom/top the low/high Z faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Low X.
    West,
    /// High X.
    East,
    /// Low Y.
    South,
    /// High Y.
    North,
    /// Low Z.
    Bottom,
    /// High Z.
    Top,
}

impl Face {
    /// All six faces.
    pub const ALL: [Face; 6] = [
        Face::West,
        Face::East,
        Face::South,
        Face::North,
        Face::Bottom,
        Face::Top,
    ];

    /// The face on the other side of the same axis.
    pub fn opposite(self) -> Face {
        match self {
            Self::West => Self::East,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::North => Self::South,
            Self::Bottom => Self::Top,
            Self::Top => Self::Bottom,
        }
    }

    /// The axis this face is normal to.
    pub fn axis(self) -> Axis {
        match self {
            Self::West | Self::East => Axis::X,
            Self::South | Self::North => Axis::Y,
            Self::Bottom | Self::Top => Axis::Z,
        }
    }

    /// Whether this is the high-coordinate face of its axis.
    pub fn is_high(self) -> bool {
        matches!(self, Self::East | Self::North | Self::Top)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::West => "west",
            Self::East => "east",
            Self::South => "south",
            Self::North => "north",
            Self::Bottom => "bottom",
            Self::Top => "top",
        };
        f.write_str(name)
    }
}

/// The process on the other side of a face.
///
/// `Boundary` marks the edge of the global domain without wraparound.
/// A transfer whose peer is `Boundary` is skipped by the transport:
/// nothing is sent and nothing is received for that leg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Neighbor {
    /// A real process.
    Peer(Rank),
    /// No neighbor: global domain boundary.
    Boundary,
}

impl Neighbor {
    /// The peer rank, or `None` for a boundary.
    pub fn rank(self) -> Option<Rank> {
        match self {
            Self::Peer(rank) => Some(rank),
            Self::Boundary => None,
        }
    }

    /// Whether this neighbor is the boundary sentinel.
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::Boundary)
    }
}

impl From<Rank> for Neighbor {
    fn from(rank: Rank) -> Self {
        Self::Peer(rank)
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peer(rank) => write!(f, "rank {rank}"),
            Self::Boundary => write!(f, "boundary"),
        }
    }
}

/// The six face-neighbors of one sub-block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbors {
    /// Neighbor across the low X face.
    pub west: Neighbor,
    /// Neighbor across the high X face.
    pub east: Neighbor,
    /// Neighbor across the low Y face.
    pub south: Neighbor,
    /// Neighbor across the high Y face.
    pub north: Neighbor,
    /// Neighbor across the low Z face.
    pub bottom: Neighbor,
    /// Neighbor across the high Z face.
    pub top: Neighbor,
}

impl Neighbors {
    /// A sub-block with no neighbors on any face.
    pub fn isolated() -> Self {
        Self::uniform(Neighbor::Boundary)
    }

    /// The same neighbor on every face.
    ///
    /// `Neighbors::uniform(Neighbor::Peer(me))` describes a single rank
    /// that is periodic along all three axes.
    pub fn uniform(neighbor: Neighbor) -> Self {
        Self {
            west: neighbor,
            east: neighbor,
            south: neighbor,
            north: neighbor,
            bottom: neighbor,
            top: neighbor,
        }
    }

    /// Look up the neighbor across `face`.
    pub fn get(&self, face: Face) -> Neighbor {
        match face {
            Face::West => self.west,
            Face::East => self.east,
            Face::South => self.south,
            Face::North => self.north,
            Face::Bottom => self.bottom,
            Face::Top => self.top,
        }
    }

    /// Replace the neighbor across `face`.
    pub fn set(&mut self, face: Face, neighbor: Neighbor) {
        match face {
            Face::West => self.west = neighbor,
            Face::East => self.east = neighbor,
            Face::South => self.south = neighbor,
            Face::North => self.north = neighbor,
            Face::Bottom => self.bottom = neighbor,
            Face::Top => self.top = neighbor,
        }
    }

    /// Whether every face is a boundary.
    pub fn is_isolated(&self) -> bool {
        Face::ALL.iter().all(|&face| self.get(face).is_boundary())
    }

    /// Distinct peer ranks in face order (west first, top last).
    pub fn peers(&self) -> SmallVec<[Rank; 6]> {
        let mut out: SmallVec<[Rank; 6]> = SmallVec::new();
        for face in Face::ALL {
            if let Some(rank) = self.get(face).rank() {
                if !out.contains(&rank) {
                    out.push(rank);
                }
            }
        }
        out
    }
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::isolated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_ne!(face.opposite(), face);
            assert_eq!(face.opposite().axis(), face.axis());
            assert_ne!(face.opposite().is_high(), face.is_high());
        }
    }

    #[test]
    fn get_and_set_round_trip_per_face() {
        let mut n = Neighbors::isolated();
        assert!(n.is_isolated());
        for (i, face) in Face::ALL.into_iter().enumerate() {
            n.set(face, Neighbor::Peer(Rank(i as u32)));
        }
        for (i, face) in Face::ALL.into_iter().enumerate() {
            assert_eq!(n.get(face), Neighbor::Peer(Rank(i as u32)));
        }
        assert!(!n.is_isolated());
    }

    #[test]
    fn peers_are_deduplicated() {
        let mut n = Neighbors::isolated();
        n.west = Neighbor::Peer(Rank(1));
        n.east = Neighbor::Peer(Rank(1));
        n.top = Neighbor::Peer(Rank(4));
        assert_eq!(n.peers().as_slice(), &[Rank(1), Rank(4)]);
    }

    #[test]
    fn boundary_has_no_rank() {
        assert_eq!(Neighbor::Boundary.rank(), None);
        assert_eq!(Neighbor::from(Rank(3)).rank(), Some(Rank(3)));
        assert_eq!(Neighbor::Boundary.to_string(), "boundary");
    }
}
