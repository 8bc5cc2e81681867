//! Configuration for the in-process transport.

use std::time::Duration;

/// Settings shared by every rank of a [`LocalCluster`](crate::LocalCluster).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalTransportConfig {
    /// Longest a single receive may block. `None` waits indefinitely.
    pub recv_timeout: Option<Duration>,
}

impl LocalTransportConfig {
    /// Bound every blocking receive by `timeout`.
    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = Some(timeout);
        self
    }
}
