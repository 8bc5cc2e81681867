//! The six-direction exchange engine and its public entry points.
//!
//! Per component the engine walks the state machine
//!
//! ```text
//! Idle → Gathering(a) → BuildingDescriptors(a)
//!      → Exchanging(a, layer 0..nn, pair 1..6)
//!      → Scattering(a) → ReleasingDescriptors(a) → Idle | Done
//! ```
//!
//! Components are processed strictly one after another through a single
//! scratch buffer. The scatter for component `a` runs only after every
//! pair of every ghost layer has completed, so no partially refreshed
//! ghost data is ever written back. A transport failure aborts the whole
//! pass and is reported with the [`ExchangePhase`] it occurred in.

use std::time::Instant;

use halo_core::{ConfigError, Neighbors, PaddedGrid, Transport};
use tracing::{debug, trace};

use crate::config::{DescriptorPolicy, ExchangeConfig};
use crate::error::{ExchangeError, ExchangePhase};
use crate::metrics::ExchangeMetrics;
use crate::plan::{ExchangePair, FacePlan};
use crate::repack;
use crate::scratch::ScratchBuffer;

fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

/// Run every ghost layer's six paired exchanges over one padded buffer.
///
/// `buf` holds a single scalar component in `index3d` order.
fn exchange_layers<T: Transport + ?Sized>(
    grid: &PaddedGrid,
    plan: &FacePlan,
    neighbors: &Neighbors,
    transport: &mut T,
    buf: &mut [f64],
    component: Option<usize>,
    metrics: &mut ExchangeMetrics,
) -> Result<(), ExchangeError> {
    for layer in 0..grid.ghost() {
        for pair in ExchangePair::CANONICAL_ORDER {
            let (send, recv) = pair.transfers(grid, plan, layer, neighbors);
            trace!(
                component = ?component,
                layer,
                pair = %pair,
                tag = %send.tag,
                to = %send.peer,
                from = %recv.peer,
                elements = send.descriptor.element_count(),
                "paired exchange"
            );
            transport
                .sendrecv(buf, send, recv)
                .map_err(|source| ExchangeError::Transport {
                    phase: ExchangePhase {
                        component,
                        layer,
                        pair,
                    },
                    source,
                })?;
            metrics.record_pair(&send, &recv);
        }
    }
    Ok(())
}

/// Reusable ghost-layer exchanger for one rank's geometry.
///
/// Holds the validated geometry, the scratch allocation, and (under
/// [`DescriptorPolicy::CacheAcrossComponents`]) the face descriptors, so
/// that repeated per-step calls allocate nothing after the first.
///
/// # Examples
///
/// ```
/// use halo_core::{GridExtents, Neighbors, Rank};
/// use halo_exchange::{ExchangeConfig, HaloExchanger};
/// # use halo_core::{Transfer, Transport, TransportError};
/// # struct Alone;
/// # impl Transport for Alone {
/// #     fn rank(&self) -> Rank { Rank(0) }
/// #     fn neighbors(&self) -> Neighbors { Neighbors::isolated() }
/// #     fn sendrecv(&mut self, _: &mut [f64], _: Transfer, _: Transfer)
/// #         -> Result<(), TransportError> { Ok(()) }
/// # }
///
/// let config = ExchangeConfig::new(GridExtents::cube(4), 1, 19);
/// let mut exchanger = HaloExchanger::new(config).unwrap();
/// let mut field = vec![0.0; exchanger.config().field_len().unwrap()];
/// exchanger.exchange_field(&mut Alone, &mut field).unwrap();
/// assert_eq!(exchanger.last_metrics().components, 19);
/// ```
#[derive(Debug)]
pub struct HaloExchanger {
    config: ExchangeConfig,
    grid: PaddedGrid,
    plan: Option<FacePlan>,
    scratch: ScratchBuffer,
    metrics: ExchangeMetrics,
}

impl HaloExchanger {
    /// Validate `config` and create an exchanger for it.
    pub fn new(config: ExchangeConfig) -> Result<Self, ConfigError> {
        let grid = config.validate()?;
        Ok(Self {
            config,
            grid,
            plan: None,
            scratch: ScratchBuffer::new(),
            metrics: ExchangeMetrics::default(),
        })
    }

    /// The configuration this exchanger was built from.
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// The validated padded geometry.
    pub fn grid(&self) -> &PaddedGrid {
        &self.grid
    }

    /// Metrics of the most recent successful call.
    pub fn last_metrics(&self) -> &ExchangeMetrics {
        &self.metrics
    }

    /// Drop the scratch allocation and any cached descriptors.
    pub fn release(&mut self) {
        self.scratch.release();
        self.plan = None;
    }

    fn cached_plan(&mut self, metrics: &mut ExchangeMetrics) -> FacePlan {
        let grid = self.grid;
        *self.plan.get_or_insert_with(|| {
            metrics.descriptor_builds += 1;
            FacePlan::build(&grid)
        })
    }

    fn plan_for_pass(&mut self, metrics: &mut ExchangeMetrics) -> Option<FacePlan> {
        match self.config.descriptor_policy {
            DescriptorPolicy::CacheAcrossComponents => Some(self.cached_plan(metrics)),
            DescriptorPolicy::RebuildPerComponent => None,
        }
    }

    /// Refresh every ghost layer of every component of an interleaved field.
    ///
    /// `field` must hold at least `MXP·MYP·MZP·Q` elements laid out as
    /// `a + index3d·Q`. Interior values are never modified. Nothing is
    /// sent if the buffer is too short.
    pub fn exchange_field<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        field: &mut [f64],
    ) -> Result<(), ExchangeError> {
        let started = Instant::now();
        let grid = self.grid;
        let components = self.config.components;
        grid.check_field(field.len(), components)?;

        let rank = transport.rank();
        let neighbors = transport.neighbors();
        debug!(
            rank = %rank,
            components,
            ghost = grid.ghost(),
            isolated = neighbors.is_isolated(),
            "exchanging multi-component field"
        );

        let mut metrics = ExchangeMetrics::default();
        let cached = self.plan_for_pass(&mut metrics);
        let scratch = self.scratch.acquire(grid.padded_voxels())?;

        for component in 0..components {
            let t = Instant::now();
            repack::gather(&grid, components, component, field, scratch)?;
            metrics.gather_us += elapsed_us(t);

            let plan = match cached {
                Some(plan) => plan,
                None => {
                    metrics.descriptor_builds += 1;
                    FacePlan::build(&grid)
                }
            };

            let t = Instant::now();
            exchange_layers(
                &grid,
                &plan,
                &neighbors,
                transport,
                scratch,
                Some(component),
                &mut metrics,
            )?;
            metrics.exchange_us += elapsed_us(t);

            let t = Instant::now();
            repack::scatter(&grid, components, component, scratch, field)?;
            metrics.scatter_us += elapsed_us(t);

            if cached.is_none() {
                trace!(component, "face descriptors released");
            }
            metrics.components += 1;
        }

        metrics.scratch_bytes = self.scratch.memory_bytes();
        metrics.total_us = elapsed_us(started);
        debug!(
            rank = %rank,
            pairs = metrics.pairs_executed,
            sent = metrics.elements_sent,
            received = metrics.elements_received,
            total_us = metrics.total_us,
            "multi-component exchange complete"
        );
        self.metrics = metrics;
        Ok(())
    }

    /// Refresh the ghost layers of one padded scalar field.
    pub fn exchange_scalar_field<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        field: &mut [f64],
    ) -> Result<(), ExchangeError> {
        self.exchange_scalar_fields(transport, &mut [field])
    }

    /// Refresh the ghost layers of several independent padded scalar fields.
    ///
    /// Each field is exchanged in place, in slice order, without any
    /// repacking. All lengths are checked before the first send.
    pub fn exchange_scalar_fields<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        fields: &mut [&mut [f64]],
    ) -> Result<(), ExchangeError> {
        let started = Instant::now();
        let grid = self.grid;
        for field in fields.iter() {
            grid.check_field(field.len(), 1)?;
        }

        let rank = transport.rank();
        let neighbors = transport.neighbors();
        debug!(
            rank = %rank,
            fields = fields.len(),
            ghost = grid.ghost(),
            "exchanging scalar fields"
        );

        let mut metrics = ExchangeMetrics::default();
        let cached = self.plan_for_pass(&mut metrics);
        for field in fields.iter_mut() {
            let plan = match cached {
                Some(plan) => plan,
                None => {
                    metrics.descriptor_builds += 1;
                    FacePlan::build(&grid)
                }
            };
            let t = Instant::now();
            exchange_layers(&grid, &plan, &neighbors, transport, field, None, &mut metrics)?;
            metrics.exchange_us += elapsed_us(t);
            metrics.scalar_fields += 1;
        }

        metrics.scratch_bytes = self.scratch.memory_bytes();
        metrics.total_us = elapsed_us(started);
        self.metrics = metrics;
        Ok(())
    }
}

/// Refresh all ghost layers of all `Q` components of `field`.
///
/// One-shot form of [`HaloExchanger::exchange_field`]: the scratch
/// buffer and descriptors live only for this call.
pub fn exchange_multi_component_field<T: Transport + ?Sized>(
    config: &ExchangeConfig,
    transport: &mut T,
    field: &mut [f64],
) -> Result<(), ExchangeError> {
    HaloExchanger::new(config.clone())?.exchange_field(transport, field)
}

/// Refresh all ghost layers of one padded scalar field.
///
/// `config.components` must still validate but is otherwise unused.
pub fn exchange_scalar_field<T: Transport + ?Sized>(
    config: &ExchangeConfig,
    transport: &mut T,
    field: &mut [f64],
) -> Result<(), ExchangeError> {
    HaloExchanger::new(config.clone())?.exchange_scalar_field(transport, field)
}

/// Refresh all ghost layers of several padded scalar fields, in order.
///
/// Used for macroscopic variables such as density and the velocity
/// components. `config.components` must still validate but is
/// otherwise unused.
pub fn exchange_scalar_fields<T: Transport + ?Sized>(
    config: &ExchangeConfig,
    transport: &mut T,
    fields: &mut [&mut [f64]],
) -> Result<(), ExchangeError> {
    HaloExchanger::new(config.clone())?.exchange_scalar_fields(transport, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{GridExtents, Neighbor, Rank, Tag, TransportError};
    use halo_test_utils::{ghost_voxels, RecordingTransport};

    fn config(nn: usize, q: usize) -> ExchangeConfig {
        ExchangeConfig::new(GridExtents::new(4, 3, 2), nn, q)
    }

    fn connected() -> Neighbors {
        Neighbors::uniform(Neighbor::Peer(Rank(0)))
    }

    #[test]
    fn issues_six_pairs_per_layer_per_component_in_canonical_order() {
        let cfg = config(2, 3);
        let mut field = vec![0.0; cfg.field_len().unwrap()];
        let mut transport = RecordingTransport::new(Rank(0), connected());
        exchange_multi_component_field(&cfg, &mut transport, &mut field).unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 6 * 2 * 3);
        let tags: Vec<u32> = calls.iter().map(|c| c.send.tag.0).collect();
        let one_layer = [111, 222, 333, 444, 555, 666];
        for chunk in tags.chunks(6) {
            assert_eq!(chunk, one_layer);
        }
        for call in calls {
            assert_eq!(call.send.tag, call.recv.tag);
            assert_eq!(call.send.descriptor, call.recv.descriptor);
        }
    }

    #[test]
    fn every_ghost_voxel_is_refreshed_and_interior_untouched() {
        let cfg = config(2, 3);
        let grid = cfg.validate().unwrap();
        let mut field = vec![1.0; cfg.field_len().unwrap()];
        let mut transport = RecordingTransport::new(Rank(0), connected()).with_recv_fill(9.0);
        exchange_multi_component_field(&cfg, &mut transport, &mut field).unwrap();

        for (i, j, k) in grid.voxels() {
            let expect = if grid.is_interior(i, j, k) { 1.0 } else { 9.0 };
            for a in 0..3 {
                assert_eq!(field[grid.index4d(i, j, k, a, 3)], expect, "({i},{j},{k}) a={a}");
            }
        }
    }

    #[test]
    fn isolated_rank_leaves_ghosts_untouched() {
        let cfg = config(1, 2);
        let grid = cfg.validate().unwrap();
        let mut field: Vec<f64> = (0..cfg.field_len().unwrap()).map(|v| v as f64).collect();
        let before = field.clone();
        let mut transport =
            RecordingTransport::new(Rank(0), Neighbors::isolated()).with_recv_fill(-5.0);
        let mut exchanger = HaloExchanger::new(cfg).unwrap();
        exchanger.exchange_field(&mut transport, &mut field).unwrap();

        assert_eq!(field, before);
        assert_eq!(ghost_voxels(&grid).count(), grid.padded_voxels() - 24);
        let m = exchanger.last_metrics();
        assert_eq!(m.pairs_executed, 12);
        assert_eq!(m.legs_skipped, 24);
        assert_eq!(m.elements_sent, 0);
        assert_eq!(m.elements_received, 0);
    }

    #[test]
    fn cached_descriptors_are_built_once_across_calls() {
        let cfg = config(1, 4);
        let mut field = vec![0.0; cfg.field_len().unwrap()];
        let mut transport = RecordingTransport::new(Rank(0), connected());
        let mut exchanger = HaloExchanger::new(cfg).unwrap();

        exchanger.exchange_field(&mut transport, &mut field).unwrap();
        assert_eq!(exchanger.last_metrics().descriptor_builds, 1);
        assert_eq!(exchanger.last_metrics().components, 4);

        exchanger.exchange_field(&mut transport, &mut field).unwrap();
        assert_eq!(exchanger.last_metrics().descriptor_builds, 0);
    }

    #[test]
    fn rebuild_policy_builds_per_component() {
        let cfg = config(1, 4).with_descriptor_policy(DescriptorPolicy::RebuildPerComponent);
        let mut field = vec![0.0; cfg.field_len().unwrap()];
        let mut transport = RecordingTransport::new(Rank(0), connected()).with_recv_fill(2.0);
        let mut exchanger = HaloExchanger::new(cfg).unwrap();
        exchanger.exchange_field(&mut transport, &mut field).unwrap();
        assert_eq!(exchanger.last_metrics().descriptor_builds, 4);
        assert_eq!(transport.calls().len(), 6 * 4);
    }

    #[test]
    fn traffic_matches_face_sizes() {
        let cfg = config(1, 1);
        let grid = cfg.validate().unwrap();
        let mut field = vec![0.0; cfg.field_len().unwrap()];
        let mut transport = RecordingTransport::new(Rank(0), connected());
        let mut exchanger = HaloExchanger::new(cfg).unwrap();
        exchanger.exchange_field(&mut transport, &mut field).unwrap();

        // Two Z planes, two X columns, two Y slabs.
        let per_layer =
            2 * grid.plane_len() + 2 * grid.myp() * grid.mzp() + 2 * grid.mxp() * grid.mzp();
        assert_eq!(exchanger.last_metrics().elements_sent, per_layer as u64);
        assert_eq!(exchanger.last_metrics().elements_received, per_layer as u64);
    }

    #[test]
    fn short_field_is_rejected_before_any_communication() {
        let cfg = config(1, 3);
        let mut field = vec![0.0; 10];
        let mut transport = RecordingTransport::new(Rank(0), connected());
        let err = exchange_multi_component_field(&cfg, &mut transport, &mut field).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Config(ConfigError::FieldTooSmall { actual: 10, .. })
        ));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = ExchangeConfig::new(GridExtents::cube(2), 0, 1);
        let mut transport = RecordingTransport::new(Rank(0), connected());
        let err = exchange_multi_component_field(&cfg, &mut transport, &mut []).unwrap_err();
        assert_eq!(err, ExchangeError::Config(ConfigError::ZeroGhostThickness));
    }

    #[test]
    fn transport_failure_aborts_with_phase() {
        let cfg = config(2, 3);
        let mut field = vec![0.0; cfg.field_len().unwrap()];
        // 12 calls per component; call index 15 is component 1, layer 0, fourth pair.
        let mut transport = RecordingTransport::new(Rank(0), connected()).fail_at(15);
        let err = exchange_multi_component_field(&cfg, &mut transport, &mut field).unwrap_err();
        match err {
            ExchangeError::Transport { phase, source } => {
                assert_eq!(phase.component, Some(1));
                assert_eq!(phase.layer, 0);
                assert_eq!(phase.pair, ExchangePair::SendWest);
                assert_eq!(phase.pair.tag(), Tag(444));
                assert!(matches!(source, TransportError::PeerDisconnected { .. }));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(transport.calls().len(), 15);
    }

    #[test]
    fn scalar_fields_are_exchanged_in_order_without_repacking() {
        let cfg = config(1, 19);
        let grid = cfg.validate().unwrap();
        let n = grid.padded_voxels();
        let mut rho = vec![1.0; n];
        let mut u = vec![2.0; n];
        let mut v = vec![3.0; n];
        let mut w = vec![4.0; n];
        let mut transport = RecordingTransport::new(Rank(0), connected()).with_recv_fill(0.5);
        let mut exchanger = HaloExchanger::new(cfg).unwrap();
        exchanger
            .exchange_scalar_fields(
                &mut transport,
                &mut [
                    rho.as_mut_slice(),
                    u.as_mut_slice(),
                    v.as_mut_slice(),
                    w.as_mut_slice(),
                ],
            )
            .unwrap();

        assert_eq!(transport.calls().len(), 4 * 6);
        assert_eq!(exchanger.last_metrics().scalar_fields, 4);
        assert_eq!(exchanger.last_metrics().components, 0);
        assert_eq!(exchanger.last_metrics().scratch_bytes, 0);
        for (field, interior) in [(&rho, 1.0), (&u, 2.0), (&v, 3.0), (&w, 4.0)] {
            for (i, j, k) in grid.voxels() {
                let expect = if grid.is_interior(i, j, k) { interior } else { 0.5 };
                assert_eq!(field[grid.index3d(i, j, k)], expect);
            }
        }
    }

    #[test]
    fn scalar_lengths_checked_before_first_send() {
        let cfg = config(1, 1);
        let n = cfg.validate().unwrap().padded_voxels();
        let mut good = vec![0.0; n];
        let mut bad = vec![0.0; n - 1];
        let mut transport = RecordingTransport::new(Rank(0), connected());
        let mut fields = [good.as_mut_slice(), bad.as_mut_slice()];
        let err = exchange_scalar_fields(&cfg, &mut transport, &mut fields).unwrap_err();
        assert!(matches!(err, ExchangeError::Config(ConfigError::FieldTooSmall { .. })));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn release_drops_scratch_memory() {
        let cfg = config(1, 2);
        let mut field = vec![0.0; cfg.field_len().unwrap()];
        let mut transport = RecordingTransport::new(Rank(0), connected());
        let mut exchanger = HaloExchanger::new(cfg).unwrap();
        exchanger.exchange_field(&mut transport, &mut field).unwrap();
        assert!(exchanger.last_metrics().scratch_bytes > 0);
        exchanger.release();
        exchanger.exchange_field(&mut transport, &mut field).unwrap();
        assert_eq!(exchanger.last_metrics().descriptor_builds, 1);
    }
}
