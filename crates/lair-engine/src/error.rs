//! Error type for advancing a lockstep session.

use std::error::Error;
use std::fmt;

use lair_core::SweepError;
use lair_net::TransportError;
use lair_replay::LogError;

use crate::config::ConfigError;

/// Failure of starting or advancing a lockstep session.
#[derive(Debug)]
pub enum StepError {
    /// The session configuration cannot run.
    Config(ConfigError),
    /// The transport failed fatally.
    Transport(TransportError),
    /// The turn log could not be read or written.
    Log(LogError),
    /// The fingerprint sweep aborted (corrupt world).
    Sweep(SweepError),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration rejected: {e}"),
            Self::Transport(e) => write!(f, "transport failure: {e}"),
            Self::Log(e) => write!(f, "turn log failure: {e}"),
            Self::Sweep(e) => write!(f, "fingerprint sweep failure: {e}"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Log(e) => Some(e),
            Self::Sweep(e) => Some(e),
        }
    }
}

impl From<ConfigError> for StepError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<TransportError> for StepError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<LogError> for StepError {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}

impl From<SweepError> for StepError {
    fn from(e: SweepError) -> Self {
        Self::Sweep(e)
    }
}
