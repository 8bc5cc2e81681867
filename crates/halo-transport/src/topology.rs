//! Cartesian process grids.
//!
//! Ranks are numbered with X fastest, matching the voxel layout:
//! `rank = px + py·DX + pz·DX·DY`.

use halo_core::{Axis, ConfigError, Face, Neighbor, Neighbors, Rank};

/// A `DX × DY × DZ` arrangement of ranks, periodic or bounded per axis.
///
/// # Examples
///
/// ```
/// use halo_core::{Neighbor, Rank};
/// use halo_transport::ProcessGrid;
///
/// let grid = ProcessGrid::new([2, 1, 1], [true, false, false]).unwrap();
/// let n = grid.neighbors(Rank(0));
/// assert_eq!(n.east, Neighbor::Peer(Rank(1)));
/// assert_eq!(n.west, Neighbor::Peer(Rank(1)));
/// assert_eq!(n.north, Neighbor::Boundary);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessGrid {
    dims: [usize; 3],
    periodic: [bool; 3],
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    }
}

impl ProcessGrid {
    /// Create a grid with `dims` ranks along X, Y, Z.
    ///
    /// Every dimension must be at least one and the rank count must fit
    /// in a [`Rank`].
    pub fn new(dims: [usize; 3], periodic: [bool; 3]) -> Result<Self, ConfigError> {
        for axis in Axis::ALL {
            if dims[axis_index(axis)] == 0 {
                return Err(ConfigError::ZeroExtent { axis });
            }
        }
        let size = dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .ok_or(ConfigError::SizeOverflow)?;
        if u32::try_from(size).is_err() {
            return Err(ConfigError::SizeOverflow);
        }
        Ok(Self { dims, periodic })
    }

    /// A grid periodic along every axis.
    pub fn periodic(dims: [usize; 3]) -> Result<Self, ConfigError> {
        Self::new(dims, [true; 3])
    }

    /// A single rank periodic along every axis: it is its own neighbor
    /// on all six faces.
    pub fn single_periodic() -> Self {
        Self {
            dims: [1; 3],
            periodic: [true; 3],
        }
    }

    /// Ranks along X, Y, Z.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Per-axis periodicity.
    pub fn periodicity(&self) -> [bool; 3] {
        self.periodic
    }

    /// Total number of ranks.
    pub fn size(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Grid coordinates of `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is not below [`size`](Self::size).
    pub fn coords(&self, rank: Rank) -> [usize; 3] {
        let r = rank.0 as usize;
        assert!(r < self.size(), "rank {rank} outside a grid of {}", self.size());
        let [dx, dy, _] = self.dims;
        [r % dx, (r / dx) % dy, r / (dx * dy)]
    }

    /// Rank at grid coordinates `c`.
    pub fn rank_at(&self, c: [usize; 3]) -> Rank {
        let [dx, dy, _] = self.dims;
        Rank((c[0] + c[1] * dx + c[2] * dx * dy) as u32)
    }

    /// Neighbor of `rank` across `face`.
    pub fn neighbor(&self, rank: Rank, face: Face) -> Neighbor {
        let mut c = self.coords(rank);
        let a = axis_index(face.axis());
        let d = self.dims[a];
        let pos = c[a];
        let next = if face.is_high() {
            if pos + 1 < d {
                Some(pos + 1)
            } else if self.periodic[a] {
                Some(0)
            } else {
                None
            }
        } else if pos > 0 {
            Some(pos - 1)
        } else if self.periodic[a] {
            Some(d - 1)
        } else {
            None
        };
        match next {
            Some(p) => {
                c[a] = p;
                Neighbor::Peer(self.rank_at(c))
            }
            None => Neighbor::Boundary,
        }
    }

    /// All six neighbors of `rank`.
    pub fn neighbors(&self, rank: Rank) -> Neighbors {
        let mut out = Neighbors::isolated();
        for face in Face::ALL {
            out.set(face, self.neighbor(rank, face));
        }
        out
    }

    /// Every rank in ascending order.
    pub fn ranks(&self) -> impl Iterator<Item = Rank> {
        (0..self.size() as u32).map(Rank)
    }
}
