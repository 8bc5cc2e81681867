//! Error types shared by the exchange engine and its transports.
//!
//! Split by who is at fault: [`ConfigError`] for caller contract
//! violations detected before any communication, [`TransportError`] for
//! failures of the paired send-receive itself. Neither is retried.

use std::error::Error;
use std::fmt;

use crate::face::{Axis, Neighbor};
use crate::id::Tag;

/// Caller contract violations, rejected before communication starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An interior extent is zero.
    ZeroExtent {
        /// The offending axis.
        axis: Axis,
    },
    /// Ghost thickness `nn` is zero.
    ZeroGhostThickness,
    /// Component count `Q` is zero.
    ZeroComponents,
    /// Ghost thickness exceeds the interior extent along an axis, so a
    /// neighbor could not supply `nn` interior layers.
    GhostExceedsInterior {
        /// The offending axis.
        axis: Axis,
        /// Requested ghost thickness.
        ghost: usize,
        /// Interior extent along `axis`.
        interior: usize,
    },
    /// Padded voxel count (times components) overflows `usize`.
    SizeOverflow,
    /// A component index is not below the component count.
    ComponentOutOfRange {
        /// The requested component.
        component: usize,
        /// Components per voxel.
        components: usize,
    },
    /// The caller's buffer is shorter than the padded layout requires.
    FieldTooSmall {
        /// Elements required by the layout.
        required: usize,
        /// Elements actually supplied.
        actual: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroExtent { axis } => write!(f, "interior extent along {axis} must be >= 1"),
            Self::ZeroGhostThickness => write!(f, "ghost thickness must be >= 1"),
            Self::ZeroComponents => write!(f, "component count must be >= 1"),
            Self::GhostExceedsInterior {
                axis,
                ghost,
                interior,
            } => write!(
                f,
                "ghost thickness {ghost} exceeds interior extent {interior} along {axis}"
            ),
            Self::SizeOverflow => write!(f, "padded field size overflows usize"),
            Self::ComponentOutOfRange {
                component,
                components,
            } => write!(
                f,
                "component {component} out of range for {components} components"
            ),
            Self::FieldTooSmall { required, actual } => write!(
                f,
                "field buffer too small: requires {required} elements, got {actual}"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Failures of a paired send-receive. Always fatal to the exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The peer's end of the channel is gone.
    PeerDisconnected {
        /// The peer that could not be reached.
        peer: Neighbor,
    },
    /// The peer is not part of this transport's cluster.
    UnknownPeer {
        /// The unrecognised peer.
        peer: Neighbor,
    },
    /// Sender and receiver disagree on the element count of a message.
    CountMismatch {
        /// Elements the receive descriptor expects.
        expected: usize,
        /// Elements actually delivered.
        actual: usize,
    },
    /// A descriptor anchored at `base` reaches past the end of the buffer.
    DescriptorOutOfBounds {
        /// Base offset of the transfer.
        base: usize,
        /// Elements spanned from `base` to the last selected element, inclusive.
        span: usize,
        /// Buffer length.
        len: usize,
    },
    /// A blocking receive exceeded the transport's configured timeout.
    Timeout {
        /// The peer being waited on.
        peer: Neighbor,
        /// The tag being waited on.
        tag: Tag,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeerDisconnected { peer } => write!(f, "peer {peer} disconnected"),
            Self::UnknownPeer { peer } => write!(f, "unknown peer {peer}"),
            Self::CountMismatch { expected, actual } => write!(
                f,
                "message count mismatch: expected {expected} elements, got {actual}"
            ),
            Self::DescriptorOutOfBounds { base, span, len } => write!(
                f,
                "descriptor at base {base} spans {span} elements, buffer holds {len}"
            ),
            Self::Timeout { peer, tag } => {
                write!(f, "timed out waiting for tag {tag} from {peer}")
            }
        }
    }
}

impl Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Rank;

    #[test]
    fn display_names_the_axis() {
        let err = ConfigError::GhostExceedsInterior {
            axis: Axis::Y,
            ghost: 3,
            interior: 2,
        };
        assert_eq!(
            err.to_string(),
            "ghost thickness 3 exceeds interior extent 2 along y"
        );
    }

    #[test]
    fn display_names_the_peer() {
        let err = TransportError::Timeout {
            peer: Neighbor::Peer(Rank(2)),
            tag: Tag(333),
        };
        assert_eq!(err.to_string(), "timed out waiting for tag 333 from rank 2");
    }
}
