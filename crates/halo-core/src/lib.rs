//! Core types and traits for ghost-layer (halo) exchange.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: padded
//! grid geometry, rank and neighbor identities, strided face
//! descriptors, error types, and the [`Transport`] trait through which
//! every paired send-receive flows.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod face;
pub mod geometry;
pub mod id;
pub mod traits;

pub use descriptor::FaceDescriptor;
pub use error::{ConfigError, TransportError};
pub use face::{Axis, Face, Neighbor, Neighbors};
pub use geometry::{GridExtents, PaddedGrid};
pub use id::{Rank, Tag};
pub use traits::{Transfer, Transport};
