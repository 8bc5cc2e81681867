//! Padded sub-block geometry and the linear addressing it implies.
//!
//! A process owns `MX × MY × MZ` interior voxels surrounded by `nn`
//! ghost layers on every face. Linear addressing inside the padded
//! block runs X fastest, then Y, then Z:
//!
//! ```text
//! index3d(i, j, k)    = i + j·MXP + k·MXP·MYP
//! index4d(i, j, k, a) = a + index3d(i, j, k)·Q
//! ```
//!
//! The X-fastest order is what makes Z-normal faces contiguous and X-/Y-
//! normal faces strided; the face descriptors depend on it.

use std::ops::Range;

use crate::error::ConfigError;
use crate::face::Axis;

/// Interior voxel counts of one sub-block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridExtents {
    /// Interior voxels along X.
    pub mx: usize,
    /// Interior voxels along Y.
    pub my: usize,
    /// Interior voxels along Z.
    pub mz: usize,
}

impl GridExtents {
    /// Create extents from per-axis voxel counts.
    pub fn new(mx: usize, my: usize, mz: usize) -> Self {
        Self { mx, my, mz }
    }

    /// Equal extents along every axis.
    pub fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    /// Interior extent along `axis`.
    pub fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.mx,
            Axis::Y => self.my,
            Axis::Z => self.mz,
        }
    }

    /// Number of interior voxels.
    pub fn voxels(&self) -> usize {
        self.mx * self.my * self.mz
    }
}

/// Validated geometry of a padded sub-block.
///
/// Construction rejects zero extents, zero ghost thickness, ghost
/// thickness larger than an interior extent, and sizes that overflow
/// `usize`. Every index method assumes in-range coordinates and is
/// checked only in debug builds.
///
/// # Examples
///
/// ```
/// use halo_core::{GridExtents, PaddedGrid};
///
/// let grid = PaddedGrid::new(GridExtents::new(4, 3, 2), 1).unwrap();
/// assert_eq!((grid.mxp(), grid.myp(), grid.mzp()), (6, 5, 4));
/// assert_eq!(grid.padded_voxels(), 120);
/// assert_eq!(grid.index3d(1, 2, 3), 1 + 2 * 6 + 3 * 30);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaddedGrid {
    extents: GridExtents,
    ghost: usize,
    mxp: usize,
    myp: usize,
    mzp: usize,
    padded_voxels: usize,
}

impl PaddedGrid {
    /// Build the padded geometry for `extents` with `ghost` layers per face.
    pub fn new(extents: GridExtents, ghost: usize) -> Result<Self, ConfigError> {
        for axis in Axis::ALL {
            if extents.get(axis) == 0 {
                return Err(ConfigError::ZeroExtent { axis });
            }
        }
        if ghost == 0 {
            return Err(ConfigError::ZeroGhostThickness);
        }
        for axis in Axis::ALL {
            let interior = extents.get(axis);
            if ghost > interior {
                return Err(ConfigError::GhostExceedsInterior {
                    axis,
                    ghost,
                    interior,
                });
            }
        }

        let pad = |m: usize| {
            ghost
                .checked_mul(2)
                .and_then(|g| g.checked_add(m))
                .ok_or(ConfigError::SizeOverflow)
        };
        let mxp = pad(extents.mx)?;
        let myp = pad(extents.my)?;
        let mzp = pad(extents.mz)?;
        let padded_voxels = mxp
            .checked_mul(myp)
            .and_then(|p| p.checked_mul(mzp))
            .ok_or(ConfigError::SizeOverflow)?;

        Ok(Self {
            extents,
            ghost,
            mxp,
            myp,
            mzp,
            padded_voxels,
        })
    }

    /// Interior extents.
    pub fn extents(&self) -> GridExtents {
        self.extents
    }

    /// Ghost thickness `nn`.
    pub fn ghost(&self) -> usize {
        self.ghost
    }

    /// Padded extent along X.
    pub fn mxp(&self) -> usize {
        self.mxp
    }

    /// Padded extent along Y.
    pub fn myp(&self) -> usize {
        self.myp
    }

    /// Padded extent along Z.
    pub fn mzp(&self) -> usize {
        self.mzp
    }

    /// Padded extent along `axis`.
    pub fn padded(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.mxp,
            Axis::Y => self.myp,
            Axis::Z => self.mzp,
        }
    }

    /// Linear distance between neighbouring voxels along `axis`.
    pub fn stride(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => 1,
            Axis::Y => self.mxp,
            Axis::Z => self.plane_len(),
        }
    }

    /// Elements in one fixed-`k` plane, `MXP·MYP`.
    pub fn plane_len(&self) -> usize {
        self.mxp * self.myp
    }

    /// Total padded voxels, `MXP·MYP·MZP`. Size of a scratch buffer.
    pub fn padded_voxels(&self) -> usize {
        self.padded_voxels
    }

    /// Interior coordinate range along `axis` in padded index space.
    pub fn interior_range(&self, axis: Axis) -> Range<usize> {
        self.ghost..self.ghost + self.extents.get(axis)
    }

    /// Linear index of padded voxel `(i, j, k)`.
    #[inline]
    pub fn index3d(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.mxp && j < self.myp && k < self.mzp);
        i + j * self.mxp + k * self.mxp * self.myp
    }

    /// Linear index of component `a` of padded voxel `(i, j, k)` in an
    /// interleaved field with `components` values per voxel.
    #[inline]
    pub fn index4d(&self, i: usize, j: usize, k: usize, a: usize, components: usize) -> usize {
        debug_assert!(a < components);
        a + self.index3d(i, j, k) * components
    }

    /// Inverse of [`index3d`](Self::index3d).
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        debug_assert!(index < self.padded_voxels);
        let plane = self.plane_len();
        let k = index / plane;
        let rem = index % plane;
        (rem % self.mxp, rem / self.mxp, k)
    }

    /// Whether `(i, j, k)` lies in the interior (not in any ghost layer).
    pub fn is_interior(&self, i: usize, j: usize, k: usize) -> bool {
        self.interior_range(Axis::X).contains(&i)
            && self.interior_range(Axis::Y).contains(&j)
            && self.interior_range(Axis::Z).contains(&k)
    }

    /// Elements an interleaved field with `components` values per voxel needs.
    pub fn field_len(&self, components: usize) -> Result<usize, ConfigError> {
        if components == 0 {
            return Err(ConfigError::ZeroComponents);
        }
        self.padded_voxels
            .checked_mul(components)
            .ok_or(ConfigError::SizeOverflow)
    }

    /// Reject a buffer that cannot hold `components` values per padded voxel.
    pub fn check_field(&self, len: usize, components: usize) -> Result<(), ConfigError> {
        let required = self.field_len(components)?;
        if len < required {
            return Err(ConfigError::FieldTooSmall {
                required,
                actual: len,
            });
        }
        Ok(())
    }

    /// All padded voxels in memory order.
    pub fn voxels(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.padded_voxels).map(move |idx| self.coords(idx))
    }
}
