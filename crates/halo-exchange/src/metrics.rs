//! Per-call metrics for the exchange engine.
//!
//! [`ExchangeMetrics`] captures timing and traffic data for a single
//! exchange call, for profiling and for checking that a rank moved the
//! amount of data its neighbor table implies.

use halo_core::Transfer;

/// Timing and traffic collected during one exchange call.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeMetrics {
    /// Wall-clock time for the whole call.
    pub total_us: u64,
    /// Time spent gathering components into scratch.
    pub gather_us: u64,
    /// Time spent in paired send-receives.
    pub exchange_us: u64,
    /// Time spent scattering scratch back into the field.
    pub scatter_us: u64,
    /// Interleaved components processed.
    pub components: u32,
    /// Scalar fields processed.
    pub scalar_fields: u32,
    /// Paired send-receives issued.
    pub pairs_executed: u64,
    /// Legs skipped because the peer was a boundary.
    pub legs_skipped: u64,
    /// Elements handed to the transport for sending.
    pub elements_sent: u64,
    /// Elements received into ghost layers.
    pub elements_received: u64,
    /// Face plans built during the call.
    pub descriptor_builds: u32,
    /// Scratch memory held at the end of the call, in bytes.
    pub scratch_bytes: usize,
}

impl ExchangeMetrics {
    /// Account for one completed paired send-receive.
    pub fn record_pair(&mut self, send: &Transfer, recv: &Transfer) {
        self.pairs_executed += 1;
        for leg in [send, recv] {
            if leg.peer.is_boundary() {
                self.legs_skipped += 1;
            }
        }
        self.elements_sent += send.element_count() as u64;
        self.elements_received += recv.element_count() as u64;
    }
}
