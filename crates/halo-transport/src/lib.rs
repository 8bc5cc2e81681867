//! In-process transport for the halo exchange.
//!
//! [`LocalCluster`] wires N ranks together with `crossbeam-channel`
//! queues so that a distributed exchange can run on threads of a single
//! process. [`ProcessGrid`] computes the face-neighbor tables of a
//! Cartesian decomposition, periodic or bounded per axis.
//!
//! Sends are buffered and never block, so every rank may issue its
//! paired send-receives in the same order without deadlocking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod local;
pub mod topology;

pub use config::LocalTransportConfig;
pub use local::{LocalCluster, LocalTransport};
pub use topology::ProcessGrid;
