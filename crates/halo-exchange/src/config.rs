//! Exchange configuration and validation.
//!
//! [`ExchangeConfig`] is the caller-facing description of one rank's
//! sub-block: interior extents, ghost thickness, and components per
//! voxel. [`validate()`](ExchangeConfig::validate) rejects contract
//! violations up front so that no communication is attempted with a
//! geometry the peers could not agree on.

use halo_core::{ConfigError, GridExtents, PaddedGrid};

// ── DescriptorPolicy ───────────────────────────────────────────────

/// Lifetime of the face descriptors within one exchange call.
///
/// Descriptor shape depends only on grid geometry, so caching is always
/// correct. Rebuilding per component exists for transports whose
/// registered datatypes must not outlive one component pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DescriptorPolicy {
    /// Build once and reuse for every component and every later call.
    #[default]
    CacheAcrossComponents,
    /// Build at the start of each component and release after its scatter.
    RebuildPerComponent,
}

// ── ExchangeConfig ─────────────────────────────────────────────────

/// Geometry and layout of one rank's exchanged field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Interior voxel counts `(MX, MY, MZ)`.
    pub extents: GridExtents,
    /// Ghost layers per face, `nn`.
    pub ghost: usize,
    /// Interleaved components per voxel, `Q`. Ignored by the scalar path.
    pub components: usize,
    /// Descriptor lifetime. Default: cache.
    pub descriptor_policy: DescriptorPolicy,
}

impl ExchangeConfig {
    /// Create a config with the default descriptor policy.
    pub fn new(extents: GridExtents, ghost: usize, components: usize) -> Self {
        Self {
            extents,
            ghost,
            components,
            descriptor_policy: DescriptorPolicy::default(),
        }
    }

    /// Override the descriptor policy.
    pub fn with_descriptor_policy(mut self, policy: DescriptorPolicy) -> Self {
        self.descriptor_policy = policy;
        self
    }

    /// Check every invariant and return the padded geometry.
    ///
    /// Rejects zero extents, `nn < 1`, `nn` larger than an interior
    /// extent, `Q < 1`, and sizes that overflow `usize`.
    pub fn validate(&self) -> Result<PaddedGrid, ConfigError> {
        let grid = PaddedGrid::new(self.extents, self.ghost)?;
        grid.field_len(self.components)?;
        Ok(grid)
    }

    /// Elements an interleaved field of this shape occupies.
    pub fn field_len(&self) -> Result<usize, ConfigError> {
        self.validate()?.field_len(self.components)
    }
}
