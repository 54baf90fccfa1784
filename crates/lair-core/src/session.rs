//! Session-wide sync and progress state.

use crate::id::TurnId;

/// The lockstep session's externally visible state.
///
/// Read by UI/diagnostics through the accessors; mutated only by the
/// per-turn pipeline. The two desync flags are sticky and independent:
/// once set they stay set until the resync controller explicitly clears
/// them, so a one-turn blip cannot silently heal itself while the
/// underlying divergence persists.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    network_active: bool,
    replay_mode: bool,
    game_desynced: bool,
    seed_desynced: bool,
    paused: bool,
    turn: TurnId,
    turns_stored: u64,
    fast_forward_remaining: u64,
}

impl SessionState {
    /// Fresh state for a session.
    pub fn new(network_active: bool, replay_mode: bool) -> SessionState {
        SessionState {
            network_active,
            replay_mode,
            ..SessionState::default()
        }
    }

    /// Whether a live transport is attached.
    pub fn network_active(&self) -> bool {
        self.network_active
    }

    /// Whether intents are sourced from a turn log.
    pub fn replay_mode(&self) -> bool {
        self.replay_mode
    }

    /// Sticky world-state divergence flag.
    pub fn game_desynced(&self) -> bool {
        self.game_desynced
    }

    /// Sticky random-stream divergence flag.
    pub fn seed_desynced(&self) -> bool {
        self.seed_desynced
    }

    /// Whether either divergence flag is set.
    pub fn desynced(&self) -> bool {
        self.game_desynced || self.seed_desynced
    }

    /// Whether the session is in the agreed paused state.
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// The turn about to be exchanged/applied.
    pub fn turn(&self) -> TurnId {
        self.turn
    }

    /// Turns available in the attached turn log, zero when none.
    pub fn turns_stored(&self) -> u64 {
        self.turns_stored
    }

    /// Turns left to replay without frame pacing.
    pub fn fast_forward_remaining(&self) -> u64 {
        self.fast_forward_remaining
    }

    /// Record that one turn was committed.
    pub fn note_turn_committed(&mut self) {
        self.turn = self.turn.next();
    }

    /// Raise the sticky divergence flags. `false` arguments leave the
    /// corresponding flag untouched.
    pub fn mark_desynced(&mut self, state: bool, seed: bool) {
        self.game_desynced |= state;
        self.seed_desynced |= seed;
    }

    /// Clear both divergence flags after a successful resync pass.
    pub fn clear_desync(&mut self) {
        self.game_desynced = false;
        self.seed_desynced = false;
    }

    /// Set the agreed pause state.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Record the turn-log length.
    pub fn set_turns_stored(&mut self, turns: u64) {
        self.turns_stored = turns;
    }

    /// Record the remaining fast-forward budget.
    pub fn set_fast_forward_remaining(&mut self, turns: u64) {
        self.fast_forward_remaining = turns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desync_flags_are_sticky_and_independent() {
        let mut s = SessionState::new(true, false);
        s.mark_desynced(false, true);
        assert!(!s.game_desynced());
        assert!(s.seed_desynced());
        // a clean turn does not clear them
        s.mark_desynced(false, false);
        assert!(s.seed_desynced());
        s.mark_desynced(true, false);
        assert!(s.game_desynced() && s.seed_desynced());
        s.clear_desync();
        assert!(!s.desynced());
    }

    #[test]
    fn turn_counter_advances_one_per_commit() {
        let mut s = SessionState::new(false, true);
        assert_eq!(s.turn(), TurnId(0));
        s.note_turn_committed();
        s.note_turn_committed();
        assert_eq!(s.turn(), TurnId(2));
    }
}
