//! Field fixtures and cluster runners.

use halo_core::{PaddedGrid, Rank};
use halo_transport::{LocalTransport, ProcessGrid};

/// Every padded voxel outside the interior, in `index3d` order.
pub fn ghost_voxels(grid: &PaddedGrid) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
    grid.voxels().filter(|&(i, j, k)| !grid.is_interior(i, j, k))
}

/// Every interior voxel, in `index3d` order.
pub fn interior_voxels(grid: &PaddedGrid) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
    grid.voxels().filter(|&(i, j, k)| grid.is_interior(i, j, k))
}

/// An interleaved field with `f(i, j, k, a)` at every padded voxel.
pub fn fill_interleaved(
    grid: &PaddedGrid,
    components: usize,
    f: impl Fn(usize, usize, usize, usize) -> f64,
) -> Vec<f64> {
    let mut field = vec![0.0; grid.padded_voxels() * components];
    for (i, j, k) in grid.voxels() {
        for a in 0..components {
            field[grid.index4d(i, j, k, a, components)] = f(i, j, k, a);
        }
    }
    field
}

/// An interleaved field with `f(i, j, k, a)` in the interior and
/// `ghost` everywhere else.
pub fn fill_interior(
    grid: &PaddedGrid,
    components: usize,
    ghost: f64,
    f: impl Fn(usize, usize, usize, usize) -> f64,
) -> Vec<f64> {
    fill_interleaved(grid, components, |i, j, k, a| {
        if grid.is_interior(i, j, k) {
            f(i, j, k, a)
        } else {
            ghost
        }
    })
}

/// A global lattice split into equal sub-blocks, one per rank.
///
/// Maps each rank's padded local coordinates to global lattice
/// coordinates so tests can compare exchanged ghosts against the value
/// the owning rank holds.
#[derive(Clone, Copy, Debug)]
pub struct Decomposition {
    pub grid: PaddedGrid,
    pub procs: ProcessGrid,
}

impl Decomposition {
    pub fn new(grid: PaddedGrid, procs: ProcessGrid) -> Self {
        Self { grid, procs }
    }

    /// Global extents along X, Y, Z.
    pub fn global_extents(&self) -> [usize; 3] {
        let e = self.grid.extents();
        let d = self.procs.dims();
        [e.mx * d[0], e.my * d[1], e.mz * d[2]]
    }

    /// Unwrapped global position of padded local voxel `(i, j, k)` of
    /// `rank`. Ghost voxels may fall outside the lattice.
    pub fn global_position(&self, rank: Rank, i: usize, j: usize, k: usize) -> [isize; 3] {
        let e = self.grid.extents();
        let c = self.procs.coords(rank);
        let nn = self.grid.ghost() as isize;
        [
            (c[0] * e.mx) as isize + i as isize - nn,
            (c[1] * e.my) as isize + j as isize - nn,
            (c[2] * e.mz) as isize + k as isize - nn,
        ]
    }

    /// Wrap `pos` onto the lattice along periodic axes. `None` if it lies
    /// outside along a bounded axis.
    pub fn wrap(&self, pos: [isize; 3]) -> Option<[usize; 3]> {
        let g = self.global_extents();
        let periodic = self.procs.periodicity();
        let mut out = [0usize; 3];
        for a in 0..3 {
            let n = g[a] as isize;
            if (0..n).contains(&pos[a]) {
                out[a] = pos[a] as usize;
            } else if periodic[a] {
                out[a] = pos[a].rem_euclid(n) as usize;
            } else {
                return None;
            }
        }
        Some(out)
    }

    /// Rank's local field seeded from a global function `f(x, y, z, a)`,
    /// with `ghost` in every ghost voxel.
    pub fn seed_field(
        &self,
        rank: Rank,
        components: usize,
        ghost: f64,
        f: impl Fn([usize; 3], usize) -> f64,
    ) -> Vec<f64> {
        fill_interior(&self.grid, components, ghost, |i, j, k, a| {
            let p = self.global_position(rank, i, j, k);
            f([p[0] as usize, p[1] as usize, p[2] as usize], a)
        })
    }
}

/// Run `f` once per rank on scoped threads and collect results in rank
/// order.
///
/// A panic on any rank propagates to the caller.
pub fn run_cluster<R, F>(transports: Vec<LocalTransport>, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(LocalTransport) -> R + Sync,
{
    std::thread::scope(|s| {
        let handles: Vec<_> = transports
            .into_iter()
            .map(|t| {
                let f = &f;
                s.spawn(move || f(t))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(r) => r,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
