//! Error types for the core crate.

use std::error::Error;
use std::fmt;

/// Failure of the bounded world-fingerprint sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepError {
    /// The entity visit exceeded [`StateView::entity_limit`]. This is a
    /// corruption signal: the entity chain is longer than the world is
    /// allowed to be.
    ///
    /// [`StateView::entity_limit`]: crate::StateView::entity_limit
    EntityOverrun {
        /// The configured limit that was exceeded.
        limit: usize,
    },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::EntityOverrun { limit } => {
                write!(f, "entity sweep exceeded limit of {limit} entities")
            }
        }
    }
}

impl Error for SweepError {}
