//! Exchange-level error type and the phase an exchange aborted in.

use std::error::Error;
use std::fmt;

use halo_core::{ConfigError, TransportError};

use crate::plan::ExchangePair;

/// Where in the per-component state machine a transport failure struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangePhase {
    /// Component being exchanged, or `None` on the scalar-field path.
    pub component: Option<usize>,
    /// Ghost-layer index, `0..nn`.
    pub layer: usize,
    /// The paired send-receive that failed.
    pub pair: ExchangePair,
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(component) = self.component {
            write!(f, "component {component}, ")?;
        }
        write!(
            f,
            "layer {}, pair {} (tag {})",
            self.layer,
            self.pair,
            self.pair.tag()
        )
    }
}

/// Errors from a ghost-layer exchange.
///
/// There is no partial-failure recovery. After a `Transport` error the
/// field is partially updated and must not be used for another step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeError {
    /// The caller's configuration or buffers violate the contract.
    /// Raised before any communication.
    Config(ConfigError),
    /// The scratch buffer could not be allocated.
    AllocationFailed {
        /// Elements requested.
        requested: usize,
    },
    /// A paired send-receive failed.
    Transport {
        /// Where the exchange aborted.
        phase: ExchangePhase,
        /// The transport's failure.
        source: TransportError,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid exchange configuration: {e}"),
            Self::AllocationFailed { requested } => {
                write!(f, "scratch allocation of {requested} elements failed")
            }
            Self::Transport { phase, source } => {
                write!(f, "transport failed at {phase}: {source}")
            }
        }
    }
}

impl Error for ExchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Transport { source, .. } => Some(source),
            Self::AllocationFailed { .. } => None,
        }
    }
}

impl From<ConfigError> for ExchangeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{Neighbor, Rank};

    #[test]
    fn transport_error_names_phase_and_chains_source() {
        let err = ExchangeError::Transport {
            phase: ExchangePhase {
                component: Some(7),
                layer: 1,
                pair: ExchangePair::SendEast,
            },
            source: TransportError::PeerDisconnected {
                peer: Neighbor::Peer(Rank(3)),
            },
        };
        assert_eq!(
            err.to_string(),
            "transport failed at component 7, layer 1, pair send-east (tag 333): peer rank 3 disconnected"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn scalar_phase_omits_component() {
        let phase = ExchangePhase {
            component: None,
            layer: 0,
            pair: ExchangePair::SendTop,
        };
        assert_eq!(phase.to_string(), "layer 0, pair send-top (tag 111)");
    }

    #[test]
    fn config_error_converts() {
        let err: ExchangeError = ConfigError::ZeroComponents.into();
        assert_eq!(err, ExchangeError::Config(ConfigError::ZeroComponents));
    }
}
