//! Six-direction ghost-layer exchange for structured-grid lattice fields.
//!
//! Each process owns a padded 3D sub-block. Once per simulation step the
//! caller refreshes the ghost layers of its fields from the six
//! face-neighbors:
//!
//! - [`exchange_multi_component_field`] handles an interleaved field with
//!   `Q` values per voxel. Each component is gathered into a contiguous
//!   scratch buffer, exchanged, and scattered back.
//! - [`exchange_scalar_fields`] handles independent padded scalar fields
//!   (density, velocity components), which need no repacking.
//!
//! [`HaloExchanger`] is the reusable form of both: it keeps the scratch
//! allocation and the face descriptors alive between calls and records
//! [`ExchangeMetrics`] for the most recent call.
//!
//! # Ordering
//!
//! For every ghost layer the engine runs six paired send-receives in the
//! fixed order Z, X, Y (see [`ExchangePair::CANONICAL_ORDER`]). Every
//! process issues the identical sequence, each pair carries its own tag,
//! and each pair is a single blocking send-receive, so no process ever
//! waits on a peer that is itself waiting to send.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod plan;
pub mod repack;
pub mod scratch;

pub use config::{DescriptorPolicy, ExchangeConfig};
pub use engine::{
    exchange_multi_component_field, exchange_scalar_field, exchange_scalar_fields, HaloExchanger,
};
pub use error::{ExchangeError, ExchangePhase};
pub use metrics::ExchangeMetrics;
pub use plan::{ExchangePair, FacePlan};
pub use scratch::ScratchBuffer;
