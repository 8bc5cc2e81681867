//! Benchmark profiles for halo exchange.
//!
//! - [`d3q19_profile`]: 32³ sub-block, one ghost layer, 19 components
//! - [`deep_halo_profile`]: 24³ sub-block, two ghost layers, 27 components
//! - [`seeded_field`]: deterministic interleaved field contents

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use halo_core::{GridExtents, PaddedGrid};
use halo_exchange::ExchangeConfig;

/// A D3Q19 lattice-Boltzmann sub-block of 32³ interior voxels.
pub fn d3q19_profile() -> ExchangeConfig {
    ExchangeConfig::new(GridExtents::cube(32), 1, 19)
}

/// A D3Q27 sub-block of 24³ interior voxels with a two-voxel halo.
pub fn deep_halo_profile() -> ExchangeConfig {
    ExchangeConfig::new(GridExtents::cube(24), 2, 27)
}

/// An interleaved field whose every element is distinct and finite.
pub fn seeded_field(grid: &PaddedGrid, components: usize, seed: u64) -> Vec<f64> {
    let len = grid.padded_voxels() * components;
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        let g = d3q19_profile().validate().unwrap();
        assert_eq!(g.mxp(), 34);
        let g = deep_halo_profile().validate().unwrap();
        assert_eq!(g.mxp(), 28);
    }

    #[test]
    fn seeded_field_is_deterministic_and_in_unit_range() {
        let g = PaddedGrid::new(GridExtents::cube(2), 1).unwrap();
        let a = seeded_field(&g, 3, 7);
        assert_eq!(a, seeded_field(&g, 3, 7));
        assert_eq!(a.len(), 64 * 3);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
