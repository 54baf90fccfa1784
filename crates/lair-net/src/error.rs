//! Transport error type.

use std::error::Error;
use std::fmt;
use std::io;

use lair_core::PlayerId;

/// Failure of a transport operation.
///
/// [`PeerTimeout`](TransportError::PeerTimeout) is the one recoverable
/// variant: the exchange degrades it to no-action records for the turn.
/// Every other variant propagates and ends the session.
#[derive(Debug)]
pub enum TransportError {
    /// A peer did not deliver its record within the transport's own
    /// deadline.
    PeerTimeout {
        /// The peer that went silent.
        player: PlayerId,
    },
    /// A peer's connection is gone for good.
    Disconnected {
        /// The peer that disconnected.
        player: PlayerId,
    },
    /// The session was torn down underneath the transport.
    SessionClosed,
    /// An underlying I/O failure.
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::PeerTimeout { player } => {
                write!(f, "timed out waiting for player {player}")
            }
            TransportError::Disconnected { player } => {
                write!(f, "player {player} disconnected")
            }
            TransportError::SessionClosed => write!(f, "session closed"),
            TransportError::Io(err) => write!(f, "transport I/O error: {err}"),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> TransportError {
        TransportError::Io(err)
    }
}
