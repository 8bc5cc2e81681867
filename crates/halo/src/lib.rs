//! Halo: ghost-layer exchange for distributed 3D lattice simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Halo sub-crates. For most users, adding `halo` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use halo::prelude::*;
//!
//! // One rank, periodic on every axis: it is its own neighbor.
//! let procs = ProcessGrid::single_periodic();
//! let mut transport = LocalCluster::new(&procs).into_transports().remove(0);
//!
//! let config = ExchangeConfig::new(GridExtents::new(4, 3, 2), 1, 19);
//! let mut exchanger = HaloExchanger::new(config).unwrap();
//! let grid = *exchanger.grid();
//!
//! let mut field = vec![0.0; exchanger.config().field_len().unwrap()];
//! field[grid.index4d(4, 1, 1, 0, 19)] = 5.0; // eastmost interior column
//! exchanger.exchange_field(&mut transport, &mut field).unwrap();
//!
//! // It wrapped around into the west ghost column.
//! assert_eq!(field[grid.index4d(0, 1, 1, 0, 19)], 5.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `halo-core` | Geometry, ranks and faces, descriptors, errors, `Transport` |
//! | [`exchange`] | `halo-exchange` | Exchange engine, configuration, metrics |
//! | [`transport`] | `halo-transport` | In-process transport and process grids |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core geometry, identities, and the transport trait (`halo-core`).
///
/// Contains [`types::PaddedGrid`], [`types::FaceDescriptor`], the
/// neighbor types, and the [`types::Transport`] trait every transport
/// implements.
pub use halo_core as types;

/// The exchange engine (`halo-exchange`).
///
/// [`exchange::HaloExchanger`] for repeated per-step exchanges, plus the
/// one-shot [`exchange::exchange_multi_component_field`] and
/// [`exchange::exchange_scalar_fields`].
pub use halo_exchange as exchange;

/// In-process transport (`halo-transport`).
///
/// [`transport::LocalCluster`] runs every rank as a thread of one
/// process; [`transport::ProcessGrid`] computes Cartesian neighbor tables.
pub use halo_transport as transport;

/// Common imports for typical Halo usage.
///
/// ```rust
/// use halo::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use halo_core::{
        Axis, Face, FaceDescriptor, GridExtents, Neighbor, Neighbors, PaddedGrid, Rank, Tag,
        Transfer, Transport,
    };

    // Errors
    pub use halo_core::{ConfigError, TransportError};
    pub use halo_exchange::ExchangeError;

    // Exchange
    pub use halo_exchange::{
        exchange_multi_component_field, exchange_scalar_field, exchange_scalar_fields,
        DescriptorPolicy, ExchangeConfig, ExchangeMetrics, HaloExchanger,
    };

    // Transport
    pub use halo_transport::{LocalCluster, LocalTransport, LocalTransportConfig, ProcessGrid};
}
