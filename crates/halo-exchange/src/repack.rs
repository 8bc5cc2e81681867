//! Gather/scatter between an interleaved field and a scratch buffer.
//!
//! The interleaved field stores component `a` of voxel `v` at
//! `a + v·Q`. Gathering component `a` walks the field with stride `Q`
//! starting at `a`, which visits the voxels in exactly the `index3d`
//! order of the scratch buffer, ghosts included.

use halo_core::{ConfigError, PaddedGrid};

fn check(
    grid: &PaddedGrid,
    components: usize,
    component: usize,
    field_len: usize,
    scratch_len: usize,
) -> Result<(), ConfigError> {
    grid.check_field(field_len, components)?;
    if component >= components {
        return Err(ConfigError::ComponentOutOfRange {
            component,
            components,
        });
    }
    if scratch_len < grid.padded_voxels() {
        return Err(ConfigError::FieldTooSmall {
            required: grid.padded_voxels(),
            actual: scratch_len,
        });
    }
    Ok(())
}

/// Copy component `component` of every padded voxel into `scratch`.
///
/// `scratch[index3d(i,j,k)] = field[index4d(i,j,k,component)]`.
pub fn gather(
    grid: &PaddedGrid,
    components: usize,
    component: usize,
    field: &[f64],
    scratch: &mut [f64],
) -> Result<(), ConfigError> {
    check(grid, components, component, field.len(), scratch.len())?;
    let src = field[component..].iter().step_by(components);
    for (dst, &value) in scratch[..grid.padded_voxels()].iter_mut().zip(src) {
        *dst = value;
    }
    Ok(())
}

/// Inverse of [`gather`]: write `scratch` back into component `component`.
pub fn scatter(
    grid: &PaddedGrid,
    components: usize,
    component: usize,
    scratch: &[f64],
    field: &mut [f64],
) -> Result<(), ConfigError> {
    check(grid, components, component, field.len(), scratch.len())?;
    let dst = field[component..].iter_mut().step_by(components);
    for (slot, &value) in dst.zip(&scratch[..grid.padded_voxels()]) {
        *slot = value;
    }
    Ok(())
}
