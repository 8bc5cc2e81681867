//! Strided face descriptors: `(count, block_len, stride)`.
//!
//! A [`FaceDescriptor`] anchored at a base offset selects `count` runs
//! of `block_len` consecutive elements, the start of each run `stride`
//! elements after the previous one. Both ends of a transfer apply the
//! same descriptor shape, so the packed element order matches on the
//! sending and receiving side without a separate contiguous staging
//! layout being agreed upon.
//!
//! For a padded block with X fastest:
//!
//! | Face normal | count | block_len | stride |
//! |---|---|---|---|
//! | X | `MYP·MZP` | 1 | `MXP` |
//! | Y | `MZP` | `MXP` | `MXP·MYP` |
//! | Z | 1 | `MXP·MYP` | `MXP·MYP` |

use std::ops::Range;

use crate::error::TransportError;
use crate::face::Axis;
use crate::geometry::PaddedGrid;

/// Shape of a strided set of buffer elements, independent of its base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceDescriptor {
    /// Number of runs.
    pub count: usize,
    /// Elements per run.
    pub block_len: usize,
    /// Distance between the starts of consecutive runs.
    pub stride: usize,
}

impl FaceDescriptor {
    /// A single run of `len` consecutive elements.
    pub fn contiguous(len: usize) -> Self {
        Self {
            count: 1,
            block_len: len,
            stride: len,
        }
    }

    /// One YZ column at fixed `i`: every element `MXP` apart.
    pub fn x_normal(grid: &PaddedGrid) -> Self {
        Self {
            count: grid.myp() * grid.mzp(),
            block_len: 1,
            stride: grid.mxp(),
        }
    }

    /// One XZ slab at fixed `j`: an X-run per Z plane.
    pub fn y_normal(grid: &PaddedGrid) -> Self {
        Self {
            count: grid.mzp(),
            block_len: grid.mxp(),
            stride: grid.plane_len(),
        }
    }

    /// One XY plane at fixed `k`, which is contiguous.
    pub fn z_normal(grid: &PaddedGrid) -> Self {
        Self::contiguous(grid.plane_len())
    }

    /// Descriptor for the face normal to `axis`.
    pub fn for_axis(grid: &PaddedGrid, axis: Axis) -> Self {
        match axis {
            Axis::X => Self::x_normal(grid),
            Axis::Y => Self::y_normal(grid),
            Axis::Z => Self::z_normal(grid),
        }
    }

    /// Number of elements selected.
    pub fn element_count(&self) -> usize {
        self.count * self.block_len
    }

    /// Whether the selection is a single run.
    pub fn is_contiguous(&self) -> bool {
        self.count <= 1 || self.block_len == self.stride
    }

    /// Distance from the base to one past the last selected element.
    pub fn span(&self) -> usize {
        if self.count == 0 || self.block_len == 0 {
            return 0;
        }
        (self.count - 1) * self.stride + self.block_len
    }

    /// Reject a base offset whose selection would leave a buffer of `len`.
    pub fn check_bounds(&self, base: usize, len: usize) -> Result<(), TransportError> {
        let span = self.span();
        match base.checked_add(span) {
            Some(end) if end <= len => Ok(()),
            _ => Err(TransportError::DescriptorOutOfBounds { base, span, len }),
        }
    }

    /// Runs selected when anchored at `base`, in transfer order.
    pub fn blocks(&self, base: usize) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.count).map(move |n| {
            let start = base + n * self.stride;
            start..start + self.block_len
        })
    }

    /// Selected element offsets when anchored at `base`, in transfer order.
    pub fn offsets(&self, base: usize) -> impl Iterator<Item = usize> + '_ {
        self.blocks(base).flatten()
    }

    /// Append the selected elements of `buf` to `out`.
    pub fn pack_into(
        &self,
        buf: &[f64],
        base: usize,
        out: &mut Vec<f64>,
    ) -> Result<(), TransportError> {
        self.check_bounds(base, buf.len())?;
        out.reserve(self.element_count());
        for run in self.blocks(base) {
            out.extend_from_slice(&buf[run]);
        }
        Ok(())
    }

    /// Copy the selected elements of `buf` into a new message payload.
    pub fn pack(&self, buf: &[f64], base: usize) -> Result<Vec<f64>, TransportError> {
        let mut out = Vec::new();
        self.pack_into(buf, base, &mut out)?;
        Ok(out)
    }

    /// Deposit `values` into the selected elements of `buf`.
    ///
    /// `values` must hold exactly [`element_count`](Self::element_count)
    /// elements.
    pub fn unpack(&self, buf: &mut [f64], base: usize, values: &[f64]) -> Result<(), TransportError> {
        if values.len() != self.element_count() {
            return Err(TransportError::CountMismatch {
                expected: self.element_count(),
                actual: values.len(),
            });
        }
        self.check_bounds(base, buf.len())?;
        if self.block_len == 0 {
            return Ok(());
        }
        for (run, chunk) in self.blocks(base).zip(values.chunks_exact(self.block_len)) {
            buf[run].copy_from_slice(chunk);
        }
        Ok(())
    }
}
