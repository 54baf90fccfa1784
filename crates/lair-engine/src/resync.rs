//! The resync incident state machine.
//!
//! A confirmed divergence triggers exactly one structured recovery
//! attempt, not one per turn. If the transport's resync handshake
//! succeeds the sticky flags are cleared and the incident ends; if it
//! fails the mismatching peers are downgraded to computer control and
//! the incident stays closed, so a persistent divergence cannot spam
//! recovery passes forever.

use lair_core::TurnId;

/// Where the controller is within the current incident.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResyncPhase {
    /// No divergence outstanding.
    #[default]
    Idle,
    /// A recovery pass ran this incident (successfully or not).
    Attempted {
        /// The turn the pass ran on.
        since: TurnId,
    },
}

/// Tracks one recovery attempt per desync incident.
#[derive(Debug, Default)]
pub struct ResyncController {
    phase: ResyncPhase,
}

impl ResyncController {
    /// Fresh controller in the idle phase.
    pub fn new() -> ResyncController {
        ResyncController::default()
    }

    /// Current phase, for diagnostics.
    pub fn phase(&self) -> ResyncPhase {
        self.phase
    }

    /// Whether a recovery pass should run now.
    pub fn should_attempt(&self) -> bool {
        self.phase == ResyncPhase::Idle
    }

    /// Record that a recovery pass ran on `turn`.
    pub fn note_attempted(&mut self, turn: TurnId) {
        self.phase = ResyncPhase::Attempted { since: turn };
    }

    /// Record that the session is clean again; the next divergence is a
    /// new incident.
    pub fn note_clean(&mut self) {
        self.phase = ResyncPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_attempt_per_incident() {
        let mut resync = ResyncController::new();
        assert!(resync.should_attempt());
        resync.note_attempted(TurnId(5));
        // still desynced on the following turns
        assert!(!resync.should_attempt());
        assert!(!resync.should_attempt());
        // recovery confirmed clean, a later incident gets a fresh pass
        resync.note_clean();
        assert!(resync.should_attempt());
    }
}
